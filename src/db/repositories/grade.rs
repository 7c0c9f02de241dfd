use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{info, warn};

use crate::domain::FinalGradeOutcome;
use crate::entities::{grades, prelude::*, students};

/// A final grade with the student's display name.
#[derive(Debug, Clone)]
pub struct GradeRow {
    pub grade: grades::Model,
    pub student_name: String,
}

pub struct GradeRepository {
    conn: DatabaseConnection,
}

impl GradeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, student_id: i32, course_id: i32) -> Result<Option<grades::Model>> {
        Grades::find()
            .filter(grades::Column::StudentId.eq(student_id))
            .filter(grades::Column::CourseId.eq(course_id))
            .one(&self.conn)
            .await
            .context("Failed to query grade")
    }

    /// Set a student's final grade for a course.
    ///
    /// The first grade for the pair inserts the row and adds `course_credits`
    /// to the student's credit total; later calls only replace the score.
    /// Both writes share one transaction so the credit award happens exactly
    /// once per row. Returns `None`, writing nothing, if the award would
    /// overflow the student's credit total.
    pub async fn award_final(
        &self,
        student_id: i32,
        course_id: i32,
        score: i32,
        course_credits: i32,
    ) -> Result<Option<FinalGradeOutcome>> {
        let txn = self.conn.begin().await?;
        let now = chrono::Utc::now().to_rfc3339();

        let existing = Grades::find()
            .filter(grades::Column::StudentId.eq(student_id))
            .filter(grades::Column::CourseId.eq(course_id))
            .one(&txn)
            .await?;

        let outcome = if let Some(grade) = existing {
            let mut active: grades::ActiveModel = grade.into();
            active.score = Set(score);
            active.updated_at = Set(now);
            active.update(&txn).await?;
            FinalGradeOutcome::Updated
        } else {
            let Some(student) = Students::find_by_id(student_id).one(&txn).await? else {
                txn.rollback().await?;
                anyhow::bail!("Student {student_id} not found while awarding credits");
            };

            let Some(credits) = student.credits.checked_add(course_credits) else {
                txn.rollback().await?;
                warn!(
                    "Credit total of student {} would overflow; final grade for course {} not saved",
                    student_id, course_id
                );
                return Ok(None);
            };

            Grades::insert(grades::ActiveModel {
                student_id: Set(student_id),
                course_id: Set(course_id),
                score: Set(score),
                created_at: Set(now.clone()),
                updated_at: Set(now),
                ..Default::default()
            })
            .exec(&txn)
            .await?;

            let mut active: students::ActiveModel = student.into();
            active.credits = Set(credits);
            active.update(&txn).await?;

            FinalGradeOutcome::Created {
                credits_awarded: course_credits,
            }
        };

        txn.commit().await?;

        info!(
            "Final grade {} for student {} in course {}: {:?}",
            score, student_id, course_id, outcome
        );
        Ok(Some(outcome))
    }

    /// Every final grade in a course, ordered by student.
    pub async fn list_for_course(&self, course_id: i32) -> Result<Vec<GradeRow>> {
        let grades = Grades::find()
            .filter(grades::Column::CourseId.eq(course_id))
            .order_by_asc(grades::Column::StudentId)
            .all(&self.conn)
            .await?;

        let mut rows = Vec::with_capacity(grades.len());
        for grade in grades {
            let student_name = Users::find_by_id(grade.student_id)
                .one(&self.conn)
                .await?
                .map(|u| format!("{} {}", u.first_name, u.last_name))
                .unwrap_or_default();
            rows.push(GradeRow {
                grade,
                student_name,
            });
        }

        Ok(rows)
    }
}
