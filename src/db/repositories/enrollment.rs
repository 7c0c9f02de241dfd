use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    SqlErr, TransactionTrait,
};
use tracing::info;

use crate::entities::{
    assignments, attendance, enrollments, prelude::*, students, submissions, users,
};

/// A student enrolled in a course, joined with their user record.
#[derive(Debug, Clone)]
pub struct EnrolledStudent {
    pub student: students::Model,
    pub user: users::Model,
    pub joined_at: String,
}

impl EnrolledStudent {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.user.first_name, self.user.last_name)
    }
}

/// Rows removed when a student leaves a course.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct Withdrawal {
    pub submissions_removed: u64,
    pub attendance_removed: u64,
}

pub struct EnrollmentRepository {
    conn: DatabaseConnection,
}

impl EnrollmentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find(&self, student_id: i32, course_id: i32) -> Result<Option<enrollments::Model>> {
        Enrollments::find()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .filter(enrollments::Column::CourseId.eq(course_id))
            .one(&self.conn)
            .await
            .context("Failed to query enrollment")
    }

    /// Enroll a student. Returns `None` if the pair is already enrolled;
    /// the unique index on (student, course) backs the lookup.
    pub async fn enroll(&self, student_id: i32, course_id: i32) -> Result<Option<enrollments::Model>> {
        if self.find(student_id, course_id).await?.is_some() {
            return Ok(None);
        }

        let model = enrollments::ActiveModel {
            student_id: Set(student_id),
            course_id: Set(course_id),
            joined_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        match Enrollments::insert(model).exec(&self.conn).await {
            Ok(res) => {
                info!("Student {} joined course {}", student_id, course_id);
                Ok(Enrollments::find_by_id(res.last_insert_id)
                    .one(&self.conn)
                    .await?)
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Ok(None),
            Err(e) => Err(e).context("Failed to insert enrollment"),
        }
    }

    /// Remove a student from a course together with their submissions and
    /// attendance for that course. Returns `None` if they were not enrolled.
    pub async fn withdraw(&self, student_id: i32, course_id: i32) -> Result<Option<Withdrawal>> {
        let txn = self.conn.begin().await?;

        let removed = Enrollments::delete_many()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .filter(enrollments::Column::CourseId.eq(course_id))
            .exec(&txn)
            .await?;

        if removed.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        let assignment_ids: Vec<i32> = Assignments::find()
            .select_only()
            .column(assignments::Column::Id)
            .filter(assignments::Column::CourseId.eq(course_id))
            .into_tuple()
            .all(&txn)
            .await?;

        let submissions_removed = if assignment_ids.is_empty() {
            0
        } else {
            Submissions::delete_many()
                .filter(submissions::Column::StudentId.eq(student_id))
                .filter(submissions::Column::AssignmentId.is_in(assignment_ids))
                .exec(&txn)
                .await?
                .rows_affected
        };

        let attendance_removed = Attendance::delete_many()
            .filter(attendance::Column::StudentId.eq(student_id))
            .filter(attendance::Column::CourseId.eq(course_id))
            .exec(&txn)
            .await?
            .rows_affected;

        txn.commit().await?;

        info!(
            "Student {} left course {} ({} submissions, {} attendance rows removed)",
            student_id, course_id, submissions_removed, attendance_removed
        );

        Ok(Some(Withdrawal {
            submissions_removed,
            attendance_removed,
        }))
    }

    /// Students enrolled in a course, in the order they joined.
    pub async fn list_students(&self, course_id: i32) -> Result<Vec<EnrolledStudent>> {
        let rows = Enrollments::find()
            .filter(enrollments::Column::CourseId.eq(course_id))
            .order_by_asc(enrollments::Column::JoinedAt)
            .order_by_asc(enrollments::Column::Id)
            .find_also_related(Students)
            .all(&self.conn)
            .await?;

        let mut result = Vec::with_capacity(rows.len());
        for (enrollment, student) in rows {
            let Some(student) = student else { continue };
            let Some(user) = Users::find_by_id(student.user_id).one(&self.conn).await? else {
                continue;
            };
            result.push(EnrolledStudent {
                student,
                user,
                joined_at: enrollment.joined_at,
            });
        }

        Ok(result)
    }

    pub async fn count_students(&self, course_id: i32) -> Result<u64> {
        use sea_orm::PaginatorTrait;

        Ok(Enrollments::find()
            .filter(enrollments::Column::CourseId.eq(course_id))
            .count(&self.conn)
            .await?)
    }
}
