use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, sea_query::Expr,
};
use std::collections::HashMap;
use tracing::info;

use crate::domain::Department;
use crate::entities::{courses, enrollments, prelude::*, users};

/// Validated input for a new course.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub name: String,
    pub department: Department,
    pub description: String,
    pub length_weeks: i32,
    pub credits: i32,
}

pub struct CourseRepository {
    conn: DatabaseConnection,
}

impl CourseRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, instructor_id: i32, course: NewCourse) -> Result<courses::Model> {
        let model = courses::ActiveModel {
            instructor_id: Set(instructor_id),
            name: Set(course.name),
            department: Set(course.department.as_str().to_string()),
            description: Set(course.description),
            length_weeks: Set(course.length_weeks),
            credits: Set(course.credits),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert course")?;

        info!(
            "Instructor {} created course {} ({})",
            instructor_id, model.id, model.name
        );
        Ok(model)
    }

    pub async fn get(&self, id: i32) -> Result<Option<courses::Model>> {
        Courses::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query course")
    }

    /// Active courses, alphabetical.
    pub async fn list_active(&self) -> Result<Vec<courses::Model>> {
        Ok(Courses::find()
            .filter(courses::Column::IsActive.eq(true))
            .order_by_asc(courses::Column::Name)
            .all(&self.conn)
            .await?)
    }

    /// Courses owned by an instructor, newest first.
    pub async fn list_for_instructor(&self, instructor_id: i32) -> Result<Vec<courses::Model>> {
        Ok(Courses::find()
            .filter(courses::Column::InstructorId.eq(instructor_id))
            .order_by_desc(courses::Column::CreatedAt)
            .order_by_desc(courses::Column::Id)
            .all(&self.conn)
            .await?)
    }

    /// Courses a student is enrolled in, in the order they were joined.
    pub async fn list_for_student(&self, student_id: i32) -> Result<Vec<courses::Model>> {
        Ok(Courses::find()
            .join(JoinType::InnerJoin, courses::Relation::Enrollments.def())
            .filter(enrollments::Column::StudentId.eq(student_id))
            .order_by_asc(enrollments::Column::JoinedAt)
            .order_by_asc(enrollments::Column::Id)
            .all(&self.conn)
            .await?)
    }

    /// Display names of the instructors owning the given courses.
    pub async fn instructor_names(&self, courses: &[courses::Model]) -> Result<HashMap<i32, String>> {
        let ids: Vec<i32> = courses.iter().map(|c| c.instructor_id).collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        Ok(Users::find()
            .filter(users::Column::Id.is_in(ids))
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|u| (u.id, format!("{} {}", u.first_name, u.last_name)))
            .collect())
    }

    /// Mark a course inactive. Returns `false` if it was already inactive.
    pub async fn deactivate(&self, id: i32) -> Result<bool> {
        let result = Courses::update_many()
            .col_expr(courses::Column::IsActive, Expr::value(false))
            .filter(courses::Column::Id.eq(id))
            .filter(courses::Column::IsActive.eq(true))
            .exec(&self.conn)
            .await?;

        if result.rows_affected > 0 {
            info!("Deactivated course {}", id);
        }
        Ok(result.rows_affected > 0)
    }
}
