//! Domain service for submission scores and final course grades.

use crate::api::types::{FinalGradeResultDto, FinalsDto, FinalsSheetDto, SubmissionDto};
use crate::domain::Actor;
use crate::services::CourseError;

/// Highest final grade an instructor can award.
pub const MAX_FINAL_SCORE: i32 = 100;

#[async_trait::async_trait]
pub trait GradingService: Send + Sync {
    /// The submission an owner is about to score.
    async fn submission_to_grade(
        &self,
        actor: &Actor,
        submission_id: i32,
    ) -> Result<SubmissionDto, CourseError>;

    /// Scores a submission, replacing any earlier score.
    ///
    /// # Errors
    ///
    /// Returns [`CourseError::Validation`] if `score` is outside
    /// `0..=assignment.points`.
    async fn grade_submission(
        &self,
        actor: &Actor,
        submission_id: i32,
        score: i32,
    ) -> Result<SubmissionDto, CourseError>;

    /// Enrolled students with their current final grade, for the owner.
    async fn grade_finals(&self, actor: &Actor, course_id: i32)
    -> Result<FinalsSheetDto, CourseError>;

    /// Sets a student's final grade. The first grade for a student credits
    /// them with the course's credit value; regrading only changes the score.
    async fn grade_final(
        &self,
        actor: &Actor,
        course_id: i32,
        student_id: i32,
        score: i32,
    ) -> Result<FinalGradeResultDto, CourseError>;

    /// Final grades visible to the actor: all of them for the owner, only
    /// their own for an enrolled student.
    async fn view_finals(&self, actor: &Actor, course_id: i32) -> Result<FinalsDto, CourseError>;
}
