//! Domain service for the course lifecycle.
//!
//! Instructors create and deactivate courses; students join and leave them.
//! `CourseError` is shared by every course-scoped service.

use thiserror::Error;

use crate::api::types::{CourseDetailDto, CourseDto, WithdrawalDto};
use crate::db::NewCourse;
use crate::domain::Actor;
use crate::services::FailureKind;

/// Errors raised by course-scoped operations.
#[derive(Debug, Error)]
pub enum CourseError {
    #[error("The course you are searching for does not exist")]
    CourseNotFound,

    #[error("The Assignment you are searching for does not exist")]
    AssignmentNotFound,

    #[error("The Submission you are trying to grade does not exist")]
    SubmissionNotFound,

    #[error("Sorry, the activity you tried to access does not exist")]
    UnknownActivity(String),

    #[error("Student {0} is not enrolled in this course")]
    StudentNotEnrolled(i32),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    Validation(String),

    #[error("Sorry, You cannot join the same course twice")]
    AlreadyEnrolled,

    #[error("You are not enrolled in this course")]
    NotEnrolled,

    #[error("Sorry, this course is no longer active")]
    Inactive,

    #[error("This course has already been deactivated")]
    AlreadyInactive,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CourseError {
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::CourseNotFound
            | Self::AssignmentNotFound
            | Self::SubmissionNotFound
            | Self::UnknownActivity(_)
            | Self::StudentNotEnrolled(_) => FailureKind::NotFound,
            Self::PermissionDenied(_) => FailureKind::PermissionDenied,
            Self::Validation(_) | Self::NotEnrolled | Self::Inactive => FailureKind::Validation,
            Self::AlreadyEnrolled | Self::AlreadyInactive => FailureKind::Duplicate,
            Self::Database(_) | Self::Internal(_) => FailureKind::Internal,
        }
    }
}

impl From<sea_orm::DbErr> for CourseError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CourseError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for courses.
#[async_trait::async_trait]
pub trait CourseService: Send + Sync {
    /// Creates a course owned by the acting instructor.
    ///
    /// # Errors
    ///
    /// Returns [`CourseError::PermissionDenied`] unless the actor is an instructor.
    async fn create_course(&self, actor: &Actor, course: NewCourse)
    -> Result<CourseDto, CourseError>;

    /// Lists every active course, alphabetically.
    async fn view_all_courses(&self) -> Result<Vec<CourseDto>, CourseError>;

    /// Looks up a single course without any membership check.
    async fn get_course(&self, course_id: i32) -> Result<CourseDto, CourseError>;

    /// Course page with its announcements and assignments, for members only.
    async fn view_course(&self, actor: &Actor, course_id: i32)
    -> Result<CourseDetailDto, CourseError>;

    /// Enrolls the acting student.
    ///
    /// # Errors
    ///
    /// Returns [`CourseError::AlreadyEnrolled`] on a second join and
    /// [`CourseError::Inactive`] for a deactivated course.
    async fn join_course(&self, actor: &Actor, course_id: i32) -> Result<CourseDto, CourseError>;

    /// Withdraws the acting student, removing their work in the course.
    async fn leave_course(&self, actor: &Actor, course_id: i32)
    -> Result<WithdrawalDto, CourseError>;

    /// Marks a course inactive.
    ///
    /// # Errors
    ///
    /// Returns [`CourseError::AlreadyInactive`] if it was already deactivated.
    async fn deactivate_course(&self, actor: &Actor, course_id: i32)
    -> Result<CourseDto, CourseError>;

    async fn view_joined_courses(&self, actor: &Actor) -> Result<Vec<CourseDto>, CourseError>;

    async fn view_created_courses(&self, actor: &Actor) -> Result<Vec<CourseDto>, CourseError>;
}
