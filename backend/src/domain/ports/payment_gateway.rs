//! Port for the hosted payment gateway.
use async_trait::async_trait;

use crate::domain::{GatewayOrder, OrderRequest};

use super::define_port_error;

define_port_error! {
    /// Errors raised by payment gateway adapters.
    pub enum PaymentGatewayError {
        /// The gateway did not answer in time.
        Timeout { message: String } => "payment gateway timed out: {message}",
        /// The gateway asked us to slow down.
        RateLimited { message: String } => "payment gateway rate limited: {message}",
        /// The gateway rejected the request, e.g. an unknown order id.
        InvalidRequest { message: String } => "payment gateway rejected request: {message}",
        /// Network or server-side failure.
        Transport { message: String } => "payment gateway transport failed: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "payment gateway response invalid: {message}",
    }
}

impl PaymentGatewayError {
    /// Whether retrying later may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::RateLimited { .. } | Self::Transport { .. }
        )
    }
}

/// Order creation and settlement lookup at the gateway.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payable order.
    async fn create_order(&self, request: &OrderRequest)
    -> Result<GatewayOrder, PaymentGatewayError>;

    /// Fetch an order with its current settlement status.
    async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, PaymentGatewayError>;
}
