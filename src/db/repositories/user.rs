use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
    sea_query::Expr,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::domain::{
    Actor, InstructorProfile, Role, RoleKind, RoleRegistration, StudentProfile,
};
use crate::entities::{instructors, prelude::*, students, users};

/// User data returned from repository (without sensitive password hash)
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: RoleKind,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            // The column is only ever written from `RoleKind::as_str`.
            role: model.role.parse().unwrap_or_default(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Input for creating a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Create an unassigned user. The password is hashed off the async runtime.
    pub async fn create(&self, new_user: NewUser, security: &SecurityConfig) -> Result<User> {
        let password = new_user.password.clone();
        let security = security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&security)))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let model = users::ActiveModel {
            username: Set(new_user.username),
            email: Set(new_user.email),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            password_hash: Set(password_hash),
            role: Set(RoleKind::Unassigned.as_str().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert user")?;

        Ok(User::from(model))
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(User::from))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        Ok(self.get_by_username(username).await?.is_some())
    }

    /// Verify password for a user and return it on success.
    /// Note: This uses `spawn_blocking` because Argon2 hashing is CPU-intensive
    /// and would block the async runtime if run directly.
    pub async fn verify_password(&self, username: &str, password: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(None);
        };

        let password_hash = user.password_hash.clone();
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            Ok::<bool, anyhow::Error>(
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid.then(|| User::from(user)))
    }

    /// Find the user whose username and email both match.
    pub async fn find_by_username_and_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by username and email")?;

        Ok(user.map(User::from))
    }

    /// Update password for a user (hashes the new password)
    pub async fn update_password(
        &self,
        user_id: i32,
        new_password: &str,
        security: &SecurityConfig,
    ) -> Result<()> {
        let user = Users::find_by_id(user_id)
            .one(&self.conn)
            .await
            .context("Failed to query user for password update")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {user_id}"))?;

        let password = new_password.to_string();
        let security = security.clone();
        let new_hash = task::spawn_blocking(move || hash_password(&password, Some(&security)))
            .await
            .context("Password hashing task panicked")??;

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(new_hash);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(())
    }

    pub async fn update_name(&self, user_id: i32, first_name: &str, last_name: &str) -> Result<User> {
        let user = Users::find_by_id(user_id)
            .one(&self.conn)
            .await
            .context("Failed to query user for name update")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {user_id}"))?;

        let mut active: users::ActiveModel = user.into();
        active.first_name = Set(first_name.to_string());
        active.last_name = Set(last_name.to_string());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let updated = active.update(&self.conn).await?;

        Ok(User::from(updated))
    }

    /// Load a user together with their role record.
    pub async fn load_actor(&self, user_id: i32) -> Result<Option<Actor>> {
        let Some(user) = self.get_by_id(user_id).await? else {
            return Ok(None);
        };

        let role = match user.role {
            RoleKind::Unassigned => Role::Unassigned,
            RoleKind::Student => {
                let student = Students::find_by_id(user.id)
                    .one(&self.conn)
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("Student record missing for user {}", user.id))?;
                Role::Student(student_profile(student)?)
            }
            RoleKind::Instructor => {
                let instructor = Instructors::find_by_id(user.id)
                    .one(&self.conn)
                    .await?
                    .ok_or_else(|| {
                        anyhow::anyhow!("Instructor record missing for user {}", user.id)
                    })?;
                Role::Instructor(instructor_profile(instructor)?)
            }
        };

        Ok(Some(Actor {
            user_id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role,
        }))
    }

    /// Move an unassigned user into a role and create the role record.
    ///
    /// Returns `false` without writing anything if the user already holds a
    /// role. The role column only changes through a conditional update on
    /// `role = 'unassigned'`, so concurrent registrations cannot both win.
    pub async fn assign_role(&self, user_id: i32, registration: &RoleRegistration) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let updated = Users::update_many()
            .col_expr(
                users::Column::Role,
                Expr::value(registration.kind().as_str()),
            )
            .col_expr(
                users::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(users::Column::Id.eq(user_id))
            .filter(users::Column::Role.eq(RoleKind::Unassigned.as_str()))
            .exec(&txn)
            .await?;

        if updated.rows_affected != 1 {
            txn.rollback().await?;
            return Ok(false);
        }

        match registration {
            RoleRegistration::Student(s) => {
                Students::insert(students::ActiveModel {
                    user_id: Set(user_id),
                    date_of_birth: Set(s.date_of_birth),
                    major: Set(s.major.as_str().to_string()),
                    standing: Set(s.standing.as_str().to_string()),
                    credits: Set(s.credits),
                })
                .exec(&txn)
                .await?;
            }
            RoleRegistration::Instructor(i) => {
                Instructors::insert(instructors::ActiveModel {
                    user_id: Set(user_id),
                    date_of_birth: Set(i.date_of_birth),
                    department: Set(i.department.as_str().to_string()),
                })
                .exec(&txn)
                .await?;
            }
        }

        txn.commit().await?;
        Ok(true)
    }
}

pub(crate) fn student_profile(model: students::Model) -> Result<StudentProfile> {
    Ok(StudentProfile {
        user_id: model.user_id,
        date_of_birth: model.date_of_birth,
        major: model.major.parse()?,
        standing: model.standing.parse()?,
        credits: model.credits,
    })
}

pub(crate) fn instructor_profile(model: instructors::Model) -> Result<InstructorProfile> {
    Ok(InstructorProfile {
        user_id: model.user_id,
        date_of_birth: model.date_of_birth,
        department: model.department.parse()?,
    })
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the argon2 crate defaults.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_with_default_verifier() {
        let config = SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        };
        let hash = hash_password("123", Some(&config)).unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(Argon2::default().verify_password(b"123", &parsed).is_ok());
        assert!(Argon2::default().verify_password(b"124", &parsed).is_err());
    }
}
