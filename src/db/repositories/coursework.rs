use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::HashMap;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use crate::entities::{announcements, assignments, prelude::*, submissions, users};

/// Validated input for a new assignment.
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub title: String,
    pub file_url: Option<String>,
    pub points: i32,
    pub due_date: NaiveDate,
    pub description: String,
}

/// A submission joined with its author and assignment.
#[derive(Debug, Clone)]
pub struct SubmissionRow {
    pub submission: submissions::Model,
    pub assignment: assignments::Model,
    pub student_name: String,
}

/// Announcements, assignments and submissions of a course.
pub struct CourseworkRepository {
    conn: DatabaseConnection,
}

impl CourseworkRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Announcements
    // ========================================================================

    pub async fn create_announcement(
        &self,
        course_id: i32,
        text: String,
    ) -> Result<announcements::Model> {
        let model = announcements::ActiveModel {
            course_id: Set(course_id),
            text: Set(text),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert announcement")?;

        info!("Posted announcement {} in course {}", model.id, course_id);
        Ok(model)
    }

    pub async fn list_announcements(&self, course_id: i32) -> Result<Vec<announcements::Model>> {
        Ok(Announcements::find()
            .filter(announcements::Column::CourseId.eq(course_id))
            .order_by_desc(announcements::Column::CreatedAt)
            .order_by_desc(announcements::Column::Id)
            .all(&self.conn)
            .await?)
    }

    // ========================================================================
    // Assignments
    // ========================================================================

    pub async fn create_assignment(
        &self,
        course_id: i32,
        assignment: NewAssignment,
    ) -> Result<assignments::Model> {
        let model = assignments::ActiveModel {
            course_id: Set(course_id),
            title: Set(assignment.title),
            file_url: Set(assignment.file_url),
            points: Set(assignment.points),
            due_date: Set(assignment.due_date),
            description: Set(assignment.description),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert assignment")?;

        info!("Posted assignment {} in course {}", model.id, course_id);
        Ok(model)
    }

    pub async fn get_assignment(&self, id: i32) -> Result<Option<assignments::Model>> {
        Assignments::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query assignment")
    }

    pub async fn list_assignments(&self, course_id: i32) -> Result<Vec<assignments::Model>> {
        Ok(Assignments::find()
            .filter(assignments::Column::CourseId.eq(course_id))
            .order_by_desc(assignments::Column::CreatedAt)
            .order_by_desc(assignments::Column::Id)
            .all(&self.conn)
            .await?)
    }

    // ========================================================================
    // Submissions
    // ========================================================================

    pub async fn create_submission(
        &self,
        assignment_id: i32,
        student_id: i32,
        text: String,
    ) -> Result<submissions::Model> {
        let model = submissions::ActiveModel {
            assignment_id: Set(assignment_id),
            student_id: Set(student_id),
            text: Set(text),
            score: Set(None),
            submitted_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert submission")?;

        info!(
            "Student {} submitted assignment {} (submission {})",
            student_id, assignment_id, model.id
        );
        Ok(model)
    }

    /// A submission together with the assignment it belongs to.
    pub async fn get_submission(
        &self,
        id: i32,
    ) -> Result<Option<(submissions::Model, assignments::Model)>> {
        let row = Submissions::find_by_id(id)
            .find_also_related(Assignments)
            .one(&self.conn)
            .await
            .context("Failed to query submission")?;

        Ok(row.and_then(|(s, a)| a.map(|a| (s, a))))
    }

    /// All submissions for one assignment, oldest first.
    pub async fn list_for_assignment(&self, assignment_id: i32) -> Result<Vec<SubmissionRow>> {
        let Some(assignment) = self.get_assignment(assignment_id).await? else {
            return Ok(Vec::new());
        };

        let rows = Submissions::find()
            .filter(submissions::Column::AssignmentId.eq(assignment_id))
            .order_by_asc(submissions::Column::SubmittedAt)
            .order_by_asc(submissions::Column::Id)
            .all(&self.conn)
            .await?;

        let student_ids: Vec<i32> = rows.iter().map(|s| s.student_id).collect();
        let names: HashMap<i32, String> = Users::find()
            .filter(users::Column::Id.is_in(student_ids))
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|u| (u.id, format!("{} {}", u.first_name, u.last_name)))
            .collect();

        Ok(rows
            .into_iter()
            .map(|submission| SubmissionRow {
                student_name: names
                    .get(&submission.student_id)
                    .cloned()
                    .unwrap_or_default(),
                submission,
                assignment: assignment.clone(),
            })
            .collect())
    }

    /// A student's submissions across one course, newest first.
    pub async fn list_for_student_in_course(
        &self,
        student_id: i32,
        course_id: i32,
    ) -> Result<Vec<(submissions::Model, assignments::Model)>> {
        let rows = Submissions::find()
            .find_also_related(Assignments)
            .filter(submissions::Column::StudentId.eq(student_id))
            .filter(assignments::Column::CourseId.eq(course_id))
            .order_by_desc(submissions::Column::SubmittedAt)
            .order_by_desc(submissions::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(submission, assignment)| assignment.map(|a| (submission, a)))
            .collect())
    }

    /// Overwrite the score of a submission.
    pub async fn set_score(&self, submission_id: i32, score: i32) -> Result<submissions::Model> {
        let submission = Submissions::find_by_id(submission_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Submission not found: {submission_id}"))?;

        let mut active: submissions::ActiveModel = submission.into();
        active.score = Set(Some(score));
        let updated = active.update(&self.conn).await?;

        info!("Scored submission {} with {}", submission_id, score);
        Ok(updated)
    }
}
