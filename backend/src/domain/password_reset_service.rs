//! Password reset service.
//!
//! Implements [`PasswordResetService`] over the user repository, the password
//! hasher and the mailer. Expiry is judged against the injected clock.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{Mailer, PasswordHasher, PasswordResetService, UserRepository};
use crate::domain::service_support::{map_hasher_error, map_mailer_error, map_user_error};
use crate::domain::{Email, Error, Password, PasswordReset, ResetCode, User};

const INVALID_CODE: &str = "Invalid OTP";
const VERIFICATION_REQUIRED: &str = "OTP verification is required";

/// Reset service implementing the [`PasswordResetService`] driving port.
#[derive(Clone)]
pub struct PasswordResetServiceImpl<U, H, M> {
    users: Arc<U>,
    hasher: Arc<H>,
    mailer: Arc<M>,
    clock: Arc<dyn Clock>,
}

impl<U, H, M> PasswordResetServiceImpl<U, H, M> {
    /// Create a new service.
    pub fn new(users: Arc<U>, hasher: Arc<H>, mailer: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            mailer,
            clock,
        }
    }
}

impl<U, H, M> PasswordResetServiceImpl<U, H, M>
where
    U: UserRepository,
{
    async fn find(&self, email: &Email) -> Result<Option<User>, Error> {
        self.users.find_by_email(email).await.map_err(map_user_error)
    }
}

#[async_trait]
impl<U, H, M> PasswordResetService for PasswordResetServiceImpl<U, H, M>
where
    U: UserRepository,
    H: PasswordHasher,
    M: Mailer,
{
    async fn send_code(&self, email: &Email) -> Result<(), Error> {
        let user = self
            .find(email)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))?;

        let code = ResetCode::generate();
        let reset = PasswordReset::issue(&code, self.clock.utc());
        self.users
            .save_password_reset(user.id(), Some(reset))
            .await
            .map_err(map_user_error)?;
        self.mailer
            .send_reset_code(email, &code)
            .await
            .map_err(map_mailer_error)?;
        info!(user_id = %user.id(), "password reset code sent");
        Ok(())
    }

    async fn verify_code(&self, email: &Email, code: &ResetCode) -> Result<(), Error> {
        let Some(user) = self.find(email).await? else {
            return Err(Error::invalid_request(INVALID_CODE));
        };
        let Some(reset) = user.password_reset() else {
            return Err(Error::invalid_request(INVALID_CODE));
        };
        let verified = reset.confirm(code, self.clock.utc()).map_err(|rejection| {
            debug!(user_id = %user.id(), %rejection, "reset code refused");
            Error::invalid_request(INVALID_CODE)
        })?;
        self.users
            .save_password_reset(user.id(), Some(verified))
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id(), "password reset code verified");
        Ok(())
    }

    async fn reset_password(&self, email: &Email, password: Password) -> Result<(), Error> {
        let user = self
            .find(email)
            .await?
            .filter(|user| user.password_reset().is_some_and(PasswordReset::is_verified))
            .ok_or_else(|| Error::invalid_request(VERIFICATION_REQUIRED))?;

        let hash = self.hasher.hash(&password).map_err(map_hasher_error)?;
        self.users
            .replace_password(user.id(), &hash)
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id(), "password reset completed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "password_reset_service_tests.rs"]
mod tests;
