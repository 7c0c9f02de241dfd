//! Domain service for weekly attendance.

use crate::api::types::{AttendanceFormDto, AttendanceRecordedDto, AttendanceSheetDto};
use crate::domain::Actor;
use crate::services::CourseError;

#[async_trait::async_trait]
pub trait AttendanceService: Send + Sync {
    /// Enrolled students and selectable weeks, for the course owner.
    async fn attendance_form(
        &self,
        actor: &Actor,
        course_id: i32,
    ) -> Result<AttendanceFormDto, CourseError>;

    /// Marks the given students present for `week`. Students already marked
    /// for that week are left as they are.
    ///
    /// # Errors
    ///
    /// Returns [`CourseError::Validation`] for an empty class or a week
    /// outside the course length, and [`CourseError::StudentNotEnrolled`] for
    /// an id that is not enrolled.
    async fn create_attendance(
        &self,
        actor: &Actor,
        course_id: i32,
        week: i32,
        student_ids: Vec<i32>,
    ) -> Result<AttendanceRecordedDto, CourseError>;

    /// Attended weeks per student: every student for the owner, only their
    /// own row for an enrolled student.
    async fn view_attendance(
        &self,
        actor: &Actor,
        course_id: i32,
    ) -> Result<AttendanceSheetDto, CourseError>;
}
