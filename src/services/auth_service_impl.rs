//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::db::{NewUser, Store, User};
use crate::domain::{Actor, RoleRegistration};
use crate::services::auth_service::{AuthError, AuthService};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register_user(&self, new_user: NewUser) -> Result<User, AuthError> {
        let users = self.store.user_repo();

        if users.username_exists(&new_user.username).await? {
            return Err(AuthError::UsernameTaken);
        }

        let username = new_user.username.clone();
        match users.create(new_user, &self.security).await {
            Ok(user) => Ok(user),
            // Lost a race against another registration for the same name.
            Err(e) => {
                if users.username_exists(&username).await? {
                    Err(AuthError::UsernameTaken)
                } else {
                    Err(e.into())
                }
            }
        }
    }

    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .store
            .user_repo()
            .verify_password(username, password)
            .await?;

        user.ok_or_else(|| {
            warn!("Failed login attempt for '{}'", username);
            AuthError::InvalidCredentials
        })
    }

    async fn forgot_password(
        &self,
        username: &str,
        email: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let users = self.store.user_repo();

        let user = users
            .find_by_username_and_email(username, email)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        users
            .update_password(user.id, new_password, &self.security)
            .await?;

        info!("Password reset for user {}", user.id);
        Ok(())
    }

    async fn change_name(
        &self,
        user_id: i32,
        first_name: &str,
        last_name: &str,
    ) -> Result<User, AuthError> {
        let users = self.store.user_repo();

        if users.get_by_id(user_id).await?.is_none() {
            return Err(AuthError::UserNotFound);
        }

        Ok(users.update_name(user_id, first_name, last_name).await?)
    }

    async fn load_actor(&self, user_id: i32) -> Result<Option<Actor>, AuthError> {
        Ok(self.store.user_repo().load_actor(user_id).await?)
    }

    async fn register_role(
        &self,
        actor: &Actor,
        registration: RoleRegistration,
    ) -> Result<Actor, AuthError> {
        if actor.role.is_assigned() {
            return Err(AuthError::RoleAlreadyAssigned);
        }

        let users = self.store.user_repo();
        if !users.assign_role(actor.user_id, &registration).await? {
            return Err(AuthError::RoleAlreadyAssigned);
        }

        info!(
            "User {} registered as {}",
            actor.user_id,
            registration.kind()
        );

        users
            .load_actor(actor.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
