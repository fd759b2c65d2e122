//! Account domain service.
//!
//! Implements [`AccountService`] over a user repository and a password
//! hasher.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{AccountService, PasswordHasher, UserRepository};
use crate::domain::service_support::{load_user, map_hasher_error, map_user_error};
use crate::domain::{
    Error, LoginCredentials, ProfileUpdate, Registration, User, UserDraft, UserId,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Account service implementing the [`AccountService`] driving port.
#[derive(Clone)]
pub struct AccountServiceImpl<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U, H> AccountServiceImpl<U, H> {
    /// Create a new service with the given repository and hasher.
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl<U, H> AccountService for AccountServiceImpl<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let Registration {
            name,
            email,
            password,
            role,
        } = registration;

        if self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            return Err(Error::conflict("an account with this email already exists"));
        }

        let password_hash = self.hasher.hash(&password).map_err(map_hasher_error)?;
        let user = User::new(UserDraft {
            id: UserId::random(),
            name,
            email,
            password_hash: Some(password_hash),
            role,
            photo_url: None,
            description: None,
        });
        self.users.insert(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id(), role = %user.role(), "account registered");
        Ok(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<User, Error> {
        let user = self
            .users
            .find_by_email(&credentials.email)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;

        let Some(hash) = user.password_hash() else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let matches = self
            .hasher
            .verify(&credentials.password, hash)
            .map_err(map_hasher_error)?;
        if !matches {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        info!(user_id = %user.id(), "login succeeded");
        Ok(user)
    }

    async fn current_user(&self, user_id: &UserId) -> Result<User, Error> {
        load_user(self.users.as_ref(), user_id).await
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<User, Error> {
        if update.is_empty() {
            return Err(Error::invalid_request(
                "name, description or photoUrl is required",
            ));
        }
        let mut user = load_user(self.users.as_ref(), user_id).await?;
        user.apply_profile(update);
        self.users
            .update_profile(&user)
            .await
            .map_err(map_user_error)?;
        Ok(user)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
