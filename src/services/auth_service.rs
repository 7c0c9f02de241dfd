//! Domain service for accounts and role registration.
//!
//! Handles account creation, login, password recovery, name changes, and the
//! one-time choice between a Student and an Instructor role.

use thiserror::Error;

use crate::db::{NewUser, User};
use crate::domain::{Actor, RoleRegistration};
use crate::services::FailureKind;

/// Errors specific to account operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username and/or password.")]
    InvalidCredentials,

    #[error("Sorry, this username is already taken, please try another one!")]
    UsernameTaken,

    #[error("You are already logged in, log out first to create a new user")]
    AlreadyAuthenticated,

    #[error("{0}")]
    NotAuthenticated(String),

    #[error("Sorry, you cannot create another Student/Instructor account")]
    RoleAlreadyAssigned,

    #[error("No account matches that username and email")]
    AccountNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidCredentials | Self::NotAuthenticated(_) => FailureKind::Unauthenticated,
            Self::UsernameTaken | Self::AlreadyAuthenticated | Self::RoleAlreadyAssigned => {
                FailureKind::Duplicate
            }
            Self::AccountNotFound | Self::UserNotFound => FailureKind::NotFound,
            Self::Validation(_) => FailureKind::Validation,
            Self::Database(_) | Self::Internal(_) => FailureKind::Internal,
        }
    }
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for accounts.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account without a role.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UsernameTaken`] if the username is in use.
    async fn register_user(&self, new_user: NewUser) -> Result<User, AuthError>;

    /// Verifies credentials and returns the user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Resets the password of the account matching both username and email.
    async fn forgot_password(
        &self,
        username: &str,
        email: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;

    async fn change_name(
        &self,
        user_id: i32,
        first_name: &str,
        last_name: &str,
    ) -> Result<User, AuthError>;

    /// Loads a user together with their role record.
    async fn load_actor(&self, user_id: i32) -> Result<Option<Actor>, AuthError>;

    /// Gives an unassigned user their Student or Instructor role and returns
    /// the refreshed actor.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::RoleAlreadyAssigned`] if the user already has a role.
    async fn register_role(
        &self,
        actor: &Actor,
        registration: RoleRegistration,
    ) -> Result<Actor, AuthError>;
}
