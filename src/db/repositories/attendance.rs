use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::entities::{attendance, prelude::*};

pub struct AttendanceRepository {
    conn: DatabaseConnection,
}

impl AttendanceRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Mark students present for a week. Already recorded (student, week)
    /// pairs are left untouched; returns the number of new rows.
    pub async fn record(&self, course_id: i32, week: i32, student_ids: &[i32]) -> Result<usize> {
        let txn = self.conn.begin().await?;
        let now = chrono::Utc::now().to_rfc3339();
        let mut inserted = 0;

        for &student_id in student_ids {
            let exists = Attendance::find()
                .filter(attendance::Column::StudentId.eq(student_id))
                .filter(attendance::Column::CourseId.eq(course_id))
                .filter(attendance::Column::Week.eq(week))
                .one(&txn)
                .await?
                .is_some();

            if exists {
                continue;
            }

            Attendance::insert(attendance::ActiveModel {
                student_id: Set(student_id),
                course_id: Set(course_id),
                week: Set(week),
                recorded_at: Set(now.clone()),
                ..Default::default()
            })
            .exec(&txn)
            .await?;
            inserted += 1;
        }

        txn.commit().await?;

        info!(
            "Recorded attendance for course {} week {}: {} new of {} marked",
            course_id,
            week,
            inserted,
            student_ids.len()
        );
        Ok(inserted)
    }

    pub async fn list_for_course(&self, course_id: i32) -> Result<Vec<attendance::Model>> {
        Ok(Attendance::find()
            .filter(attendance::Column::CourseId.eq(course_id))
            .order_by_asc(attendance::Column::StudentId)
            .order_by_asc(attendance::Column::Week)
            .all(&self.conn)
            .await?)
    }

    pub async fn list_for_student(
        &self,
        course_id: i32,
        student_id: i32,
    ) -> Result<Vec<attendance::Model>> {
        Ok(Attendance::find()
            .filter(attendance::Column::CourseId.eq(course_id))
            .filter(attendance::Column::StudentId.eq(student_id))
            .order_by_asc(attendance::Column::Week)
            .all(&self.conn)
            .await?)
    }
}
