use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::attendance::AttendanceRepository;
pub use repositories::course::{CourseRepository, NewCourse};
pub use repositories::coursework::{CourseworkRepository, NewAssignment, SubmissionRow};
pub use repositories::enrollment::{EnrolledStudent, EnrollmentRepository, Withdrawal};
pub use repositories::grade::{GradeRepository, GradeRow};
pub use repositories::user::{NewUser, User, UserRepository};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        // Every connection to `sqlite::memory:` opens its own empty database,
        // so the pool must hold exactly one connection that never recycles.
        if in_memory {
            opt.max_connections(1).min_connections(1);
        } else {
            opt.max_connections(max_connections)
                .min_connections(min_connections)
                .idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn user_repo(&self) -> UserRepository {
        UserRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn course_repo(&self) -> CourseRepository {
        CourseRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn enrollment_repo(&self) -> EnrollmentRepository {
        EnrollmentRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn coursework_repo(&self) -> CourseworkRepository {
        CourseworkRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn attendance_repo(&self) -> AttendanceRepository {
        AttendanceRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn grade_repo(&self) -> GradeRepository {
        GradeRepository::new(self.conn.clone())
    }

    // ========== Convenience lookups used across services ==========

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_course(&self, id: i32) -> Result<Option<crate::entities::courses::Model>> {
        self.course_repo().get(id).await
    }

    pub async fn is_enrolled(&self, student_id: i32, course_id: i32) -> Result<bool> {
        Ok(self
            .enrollment_repo()
            .find(student_id, course_id)
            .await?
            .is_some())
    }
}
