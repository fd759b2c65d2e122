//! In-process mailer.
//!
//! Messages are logged and kept in an outbox instead of being delivered. The
//! server uses it until a mail transport is configured; handler tests read the
//! outbox to complete a reset.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::ports::{Mailer, MailerError};
use crate::domain::{Email, ResetCode};

/// Mailer double keeping the last code per recipient. Cloning shares the outbox.
#[derive(Debug, Default, Clone)]
pub struct SimulatedMailer {
    outbox: Arc<RwLock<HashMap<Email, ResetCode>>>,
}

impl SimulatedMailer {
    /// Create a mailer with an empty outbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last reset code sent to `to`.
    pub async fn last_code_for(&self, to: &Email) -> Option<ResetCode> {
        self.outbox.read().await.get(to).cloned()
    }
}

#[async_trait]
impl Mailer for SimulatedMailer {
    async fn send_reset_code(&self, to: &Email, code: &ResetCode) -> Result<(), MailerError> {
        self.outbox.write().await.insert(to.clone(), code.clone());
        info!(recipient = %to.as_ref(), "simulated reset mail queued");
        debug!(recipient = %to.as_ref(), code = code.expose(), "simulated reset mail body");
        Ok(())
    }
}
