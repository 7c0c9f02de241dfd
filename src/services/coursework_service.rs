//! Domain service for announcements, assignments and submissions.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::api::types::{
    ActivityListDto, AnnouncementDto, AssignmentDto, CourseDto, SubmissionDto, SubmissionFormDto,
    SubmissionListDto,
};
use crate::db::NewAssignment;
use crate::domain::Actor;
use crate::services::CourseError;

/// The kinds of course activity that can be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Activity {
    Announcements,
    Assignments,
}

impl FromStr for Activity {
    type Err = CourseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "announcements" => Ok(Self::Announcements),
            "assignments" => Ok(Self::Assignments),
            other => Err(CourseError::UnknownActivity(other.to_string())),
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Announcements => f.write_str("announcements"),
            Self::Assignments => f.write_str("assignments"),
        }
    }
}

#[async_trait::async_trait]
pub trait CourseworkService: Send + Sync {
    /// Resolves a course the actor owns, for rendering an instructor form.
    async fn owned_course(
        &self,
        actor: &Actor,
        course_id: i32,
        action: &str,
    ) -> Result<CourseDto, CourseError>;

    async fn create_announcement(
        &self,
        actor: &Actor,
        course_id: i32,
        text: String,
    ) -> Result<AnnouncementDto, CourseError>;

    async fn create_assignment(
        &self,
        actor: &Actor,
        course_id: i32,
        assignment: NewAssignment,
    ) -> Result<AssignmentDto, CourseError>;

    /// Lists one kind of activity for a course member.
    async fn view_all(
        &self,
        actor: &Actor,
        activity: Activity,
        course_id: i32,
    ) -> Result<ActivityListDto, CourseError>;

    /// Resolves the course and assignment an enrolled student is submitting to.
    async fn submission_form(
        &self,
        actor: &Actor,
        course_id: i32,
        assignment_id: i32,
    ) -> Result<SubmissionFormDto, CourseError>;

    /// Records a student's submission for an assignment.
    ///
    /// # Errors
    ///
    /// Returns [`CourseError::AssignmentNotFound`] if the assignment is not
    /// part of the course and [`CourseError::Inactive`] once the course has
    /// been deactivated.
    async fn create_submission(
        &self,
        actor: &Actor,
        course_id: i32,
        assignment_id: i32,
        text: String,
    ) -> Result<SubmissionDto, CourseError>;

    /// Every submission for an assignment, for the course owner.
    async fn view_submissions(
        &self,
        actor: &Actor,
        course_id: i32,
        assignment_id: i32,
    ) -> Result<SubmissionListDto, CourseError>;

    /// The acting student's own submissions in a course.
    async fn view_all_submissions(
        &self,
        actor: &Actor,
        course_id: i32,
    ) -> Result<SubmissionListDto, CourseError>;
}
