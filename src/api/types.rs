use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::{EnrolledStudent, SubmissionRow, User, Withdrawal};
use crate::domain::{Actor, FinalGradeOutcome, Role, RoleKind};
use crate::entities::{announcements, assignments, courses, submissions};

/// A rendered page: the template name plus the context it is rendered with.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    #[serde(skip)]
    pub status: StatusCode,
    pub template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<T>,
}

impl<T> Page<T> {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            template: template.into(),
            success_message: None,
            failure_message: None,
            context: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: T) -> Self {
        self.context = Some(context);
        self
    }

    #[must_use]
    pub fn success(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    #[must_use]
    pub fn failure(mut self, message: impl Into<String>) -> Self {
        self.failure_message = Some(message.into());
        self
    }

    #[must_use]
    pub const fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

/// A page without context.
pub type Blank = Page<()>;

impl<T: Serialize> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

// ============================================================================
// Form bodies
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirmation: String,
    #[serde(rename = "first-name", alias = "first_name")]
    pub first_name: String,
    #[serde(rename = "last-name", alias = "last_name")]
    pub last_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForgotPasswordRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChangeNameRequest {
    #[serde(rename = "first-name", alias = "first_name")]
    pub first_name: String,
    #[serde(rename = "last-name", alias = "last_name")]
    pub last_name: String,
}

/// Student and Instructor forms share one body; each role reads its fields.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RoleRequest {
    pub date_of_birth: String,
    pub major: String,
    pub standing: String,
    pub credits: String,
    pub department: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CourseRequest {
    pub name: String,
    pub department: String,
    pub description: String,
    pub length: String,
    pub credits: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnnouncementRequest {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AssignmentRequest {
    pub title: String,
    pub file: String,
    pub points: String,
    pub due_date: String,
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubmissionRequest {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScoreRequest {
    pub score: String,
}

// ============================================================================
// Page contexts
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: RoleKind,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl From<Actor> for ProfileDto {
    fn from(actor: Actor) -> Self {
        Self {
            id: actor.user_id,
            username: actor.username,
            email: actor.email,
            first_name: actor.first_name,
            last_name: actor.last_name,
            role: actor.role,
        }
    }
}

/// Choices offered by the role and course forms.
#[derive(Debug, Serialize)]
pub struct ChoiceDto {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CourseDto {
    pub id: i32,
    pub name: String,
    pub department: String,
    pub description: String,
    pub length_weeks: i32,
    pub credits: i32,
    pub is_active: bool,
    pub created_at: String,
    pub instructor_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor_name: Option<String>,
}

impl CourseDto {
    #[must_use]
    pub fn new(course: courses::Model, instructor_name: Option<String>) -> Self {
        Self {
            id: course.id,
            name: course.name,
            department: course.department,
            description: course.description,
            length_weeks: course.length_weeks,
            credits: course.credits,
            is_active: course.is_active,
            created_at: course.created_at,
            instructor_id: course.instructor_id,
            instructor_name,
        }
    }
}

impl From<courses::Model> for CourseDto {
    fn from(course: courses::Model) -> Self {
        Self::new(course, None)
    }
}

#[derive(Debug, Serialize)]
pub struct AnnouncementDto {
    pub id: i32,
    pub course_id: i32,
    pub text: String,
    pub created_at: String,
}

impl From<announcements::Model> for AnnouncementDto {
    fn from(a: announcements::Model) -> Self {
        Self {
            id: a.id,
            course_id: a.course_id,
            text: a.text,
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AssignmentDto {
    pub id: i32,
    pub course_id: i32,
    pub title: String,
    pub file_url: Option<String>,
    pub points: i32,
    pub due_date: NaiveDate,
    pub description: String,
    pub created_at: String,
}

impl From<assignments::Model> for AssignmentDto {
    fn from(a: assignments::Model) -> Self {
        Self {
            id: a.id,
            course_id: a.course_id,
            title: a.title,
            file_url: a.file_url,
            points: a.points,
            due_date: a.due_date,
            description: a.description,
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmissionDto {
    pub id: i32,
    pub assignment_id: i32,
    pub assignment_title: String,
    pub points: i32,
    pub student_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    pub text: String,
    pub score: Option<i32>,
    pub submitted_at: String,
}

impl SubmissionDto {
    #[must_use]
    pub fn new(
        submission: submissions::Model,
        assignment: &assignments::Model,
        student_name: Option<String>,
    ) -> Self {
        Self {
            id: submission.id,
            assignment_id: assignment.id,
            assignment_title: assignment.title.clone(),
            points: assignment.points,
            student_id: submission.student_id,
            student_name,
            text: submission.text,
            score: submission.score,
            submitted_at: submission.submitted_at,
        }
    }
}

impl From<SubmissionRow> for SubmissionDto {
    fn from(row: SubmissionRow) -> Self {
        Self::new(row.submission, &row.assignment, Some(row.student_name))
    }
}

#[derive(Debug, Serialize)]
pub struct StudentDto {
    pub user_id: i32,
    pub name: String,
    pub major: String,
    pub standing: String,
    pub credits: i32,
}

impl From<&EnrolledStudent> for StudentDto {
    fn from(row: &EnrolledStudent) -> Self {
        Self {
            user_id: row.student.user_id,
            name: row.full_name(),
            major: row.student.major.clone(),
            standing: row.student.standing.clone(),
            credits: row.student.credits,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CourseDetailDto {
    pub course: CourseDto,
    pub is_owner: bool,
    pub students_enrolled: u64,
    pub announcements: Vec<AnnouncementDto>,
    pub assignments: Vec<AssignmentDto>,
}

#[derive(Debug, Serialize)]
pub struct WithdrawalDto {
    pub course: CourseDto,
    #[serde(flatten)]
    pub removed: Withdrawal,
}

#[derive(Debug, Serialize)]
#[serde(tag = "activity", content = "items", rename_all = "lowercase")]
pub enum ActivityItems {
    Announcements(Vec<AnnouncementDto>),
    Assignments(Vec<AssignmentDto>),
}

#[derive(Debug, Serialize)]
pub struct ActivityListDto {
    pub course: CourseDto,
    #[serde(flatten)]
    pub items: ActivityItems,
}

#[derive(Debug, Serialize)]
pub struct SubmissionFormDto {
    pub course: CourseDto,
    pub assignment: AssignmentDto,
}

#[derive(Debug, Serialize)]
pub struct SubmissionListDto {
    pub course: CourseDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment: Option<AssignmentDto>,
    pub submissions: Vec<SubmissionDto>,
}

#[derive(Debug, Serialize)]
pub struct FinalGradeRowDto {
    pub student: StudentDto,
    pub score: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct FinalsSheetDto {
    pub course: CourseDto,
    pub students: Vec<FinalGradeRowDto>,
}

#[derive(Debug, Serialize)]
pub struct FinalGradeResultDto {
    pub course_id: i32,
    pub student_id: i32,
    pub score: i32,
    pub outcome: FinalGradeOutcome,
}

#[derive(Debug, Serialize)]
pub struct FinalGradeDto {
    pub student_id: i32,
    pub student_name: String,
    pub score: i32,
}

#[derive(Debug, Serialize)]
pub struct FinalsDto {
    pub course: CourseDto,
    pub grades: Vec<FinalGradeDto>,
}

#[derive(Debug, Serialize)]
pub struct AttendanceFormDto {
    pub course: CourseDto,
    pub weeks: Vec<i32>,
    pub students: Vec<StudentDto>,
}

#[derive(Debug, Serialize)]
pub struct AttendanceRecordedDto {
    pub course_id: i32,
    pub week: i32,
    pub marked: usize,
    pub newly_recorded: usize,
}

#[derive(Debug, Serialize)]
pub struct AttendanceRowDto {
    pub student: StudentDto,
    pub weeks_attended: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub struct AttendanceSheetDto {
    pub course: CourseDto,
    pub weeks: Vec<i32>,
    pub rows: Vec<AttendanceRowDto>,
}
