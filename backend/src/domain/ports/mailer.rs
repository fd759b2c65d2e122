//! Port for outbound account mail.
use async_trait::async_trait;

use crate::domain::{Email, ResetCode};

use super::define_port_error;

define_port_error! {
    /// Errors raised by mail adapters.
    pub enum MailerError {
        /// The message could not be handed to the mail service.
        Delivery { message: String } => "mail delivery failed: {message}",
    }
}

/// Delivery of account mail.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a password-reset code to `to`.
    async fn send_reset_code(&self, to: &Email, code: &ResetCode) -> Result<(), MailerError>;
}
