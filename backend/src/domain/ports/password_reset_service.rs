//! Driving port for password resets by emailed code.

use async_trait::async_trait;

use crate::domain::{Email, Error, Password, ResetCode};

/// Three-step password reset: send a code, confirm it, set a new password.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordResetService: Send + Sync {
    /// Issue a fresh code for `email` and mail it. Unknown emails are not found.
    async fn send_code(&self, email: &Email) -> Result<(), Error>;

    /// Confirm the code sent to `email`.
    async fn verify_code(&self, email: &Email, code: &ResetCode) -> Result<(), Error>;

    /// Replace the password of an account whose code was confirmed.
    async fn reset_password(&self, email: &Email, password: Password) -> Result<(), Error>;
}
