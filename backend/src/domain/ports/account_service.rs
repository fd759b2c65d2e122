//! Driving port for account use-cases.
//!
//! Inbound adapters call this to register, authenticate and manage the
//! current user without knowing how accounts are stored or hashed.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, ProfileUpdate, Registration, User, UserId};

/// Account registration, login and profile management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create an account. Duplicate emails are a conflict.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Check credentials and return the matching user.
    async fn login(&self, credentials: LoginCredentials) -> Result<User, Error>;

    /// Load the user behind a session.
    async fn current_user(&self, user_id: &UserId) -> Result<User, Error>;

    /// Apply a profile update. At least one field must be present.
    async fn update_profile(&self, user_id: &UserId, update: ProfileUpdate)
    -> Result<User, Error>;
}
