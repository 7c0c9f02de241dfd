//! `SeaORM` implementation of the `GradingService` trait.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::info;

use crate::api::types::{
    CourseDto, FinalGradeDto, FinalGradeResultDto, FinalGradeRowDto, FinalsDto, FinalsSheetDto,
    StudentDto, SubmissionDto,
};
use crate::db::Store;
use crate::domain::Actor;
use crate::entities::{assignments, submissions};
use crate::services::access::{self, Membership};
use crate::services::grading_service::{GradingService, MAX_FINAL_SCORE};
use crate::services::CourseError;

pub struct SeaOrmGradingService {
    store: Store,
}

impl SeaOrmGradingService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Loads a submission and checks the actor owns its course.
    async fn owned_submission(
        &self,
        actor: &Actor,
        submission_id: i32,
    ) -> Result<(submissions::Model, assignments::Model), CourseError> {
        let (submission, assignment) = self
            .store
            .coursework_repo()
            .get_submission(submission_id)
            .await?
            .ok_or(CourseError::SubmissionNotFound)?;

        access::instructor_check(&self.store, actor, assignment.course_id, "grade submissions")
            .await?;

        Ok((submission, assignment))
    }
}

#[async_trait]
impl GradingService for SeaOrmGradingService {
    async fn submission_to_grade(
        &self,
        actor: &Actor,
        submission_id: i32,
    ) -> Result<SubmissionDto, CourseError> {
        let (submission, assignment) = self.owned_submission(actor, submission_id).await?;
        let student_name = self
            .store
            .get_user(submission.student_id)
            .await?
            .map(|u| u.full_name());

        Ok(SubmissionDto::new(submission, &assignment, student_name))
    }

    async fn grade_submission(
        &self,
        actor: &Actor,
        submission_id: i32,
        score: i32,
    ) -> Result<SubmissionDto, CourseError> {
        let (_, assignment) = self.owned_submission(actor, submission_id).await?;

        if !(0..=assignment.points).contains(&score) {
            return Err(CourseError::Validation(format!(
                "Score must be between 0 and {}",
                assignment.points
            )));
        }

        let updated = self
            .store
            .coursework_repo()
            .set_score(submission_id, score)
            .await?;

        Ok(SubmissionDto::new(updated, &assignment, None))
    }

    async fn grade_finals(
        &self,
        actor: &Actor,
        course_id: i32,
    ) -> Result<FinalsSheetDto, CourseError> {
        let (course, _) =
            access::instructor_check(&self.store, actor, course_id, "grade this course").await?;

        let students = self.store.enrollment_repo().list_students(course_id).await?;
        let scores: HashMap<i32, i32> = self
            .store
            .grade_repo()
            .list_for_course(course_id)
            .await?
            .into_iter()
            .map(|row| (row.grade.student_id, row.grade.score))
            .collect();

        Ok(FinalsSheetDto {
            course: CourseDto::from(course),
            students: students
                .iter()
                .map(|s| FinalGradeRowDto {
                    student: StudentDto::from(s),
                    score: scores.get(&s.student.user_id).copied(),
                })
                .collect(),
        })
    }

    async fn grade_final(
        &self,
        actor: &Actor,
        course_id: i32,
        student_id: i32,
        score: i32,
    ) -> Result<FinalGradeResultDto, CourseError> {
        let (course, _) =
            access::instructor_check(&self.store, actor, course_id, "grade this course").await?;

        if !(0..=MAX_FINAL_SCORE).contains(&score) {
            return Err(CourseError::Validation(format!(
                "Final grade must be between 0 and {MAX_FINAL_SCORE}"
            )));
        }

        if !self.store.is_enrolled(student_id, course_id).await? {
            return Err(CourseError::StudentNotEnrolled(student_id));
        }

        let outcome = self
            .store
            .grade_repo()
            .award_final(student_id, course_id, score, course.credits)
            .await?
            .ok_or_else(|| {
                CourseError::Validation(format!(
                    "Student {student_id} cannot receive more credits; the final grade was not saved"
                ))
            })?;

        info!(
            "Instructor {} graded student {} in course {}",
            actor.user_id, student_id, course_id
        );

        Ok(FinalGradeResultDto {
            course_id,
            student_id,
            score,
            outcome,
        })
    }

    async fn view_finals(&self, actor: &Actor, course_id: i32) -> Result<FinalsDto, CourseError> {
        let (course, membership) = access::member_check(&self.store, actor, course_id).await?;

        let rows = self.store.grade_repo().list_for_course(course_id).await?;
        let grades = rows
            .into_iter()
            .filter(|row| match membership {
                Membership::Owner(_) => true,
                Membership::Enrolled(student) => row.grade.student_id == student.user_id,
            })
            .map(|row| FinalGradeDto {
                student_id: row.grade.student_id,
                student_name: row.student_name,
                score: row.grade.score,
            })
            .collect();

        Ok(FinalsDto {
            course: CourseDto::from(course),
            grades,
        })
    }
}
