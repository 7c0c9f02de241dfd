use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const UNIQUE_INDEXES: &[(&str, &str)] = &[
    (
        "idx_enrollments_student_course",
        "enrollments(student_id, course_id)",
    ),
    (
        "idx_attendance_student_course_week",
        "attendance(student_id, course_id, week)",
    ),
    ("idx_grades_student_course", "grades(student_id, course_id)"),
];

const LOOKUP_INDEXES: &[(&str, &str)] = &[
    ("idx_courses_instructor", "courses(instructor_id)"),
    ("idx_assignments_course", "assignments(course_id)"),
    ("idx_announcements_course", "announcements(course_id)"),
    ("idx_submissions_assignment", "submissions(assignment_id)"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        for (name, target) in UNIQUE_INDEXES {
            conn.execute_unprepared(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {name} ON {target}"
            ))
            .await?;
        }

        for (name, target) in LOOKUP_INDEXES {
            conn.execute_unprepared(&format!("CREATE INDEX IF NOT EXISTS {name} ON {target}"))
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        for (name, _) in UNIQUE_INDEXES.iter().chain(LOOKUP_INDEXES) {
            conn.execute_unprepared(&format!("DROP INDEX IF EXISTS {name}"))
                .await?;
        }

        Ok(())
    }
}
