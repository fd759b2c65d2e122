//! Driving port for paid enrollment.

use async_trait::async_trait;

use crate::domain::{CourseId, Error, GatewayOrder, User, UserId};

/// Inputs for confirming a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyPaymentRequest {
    /// Paying user.
    pub user_id: UserId,
    /// Purchased course.
    pub course_id: CourseId,
    /// Gateway order to check.
    pub gateway_order_id: String,
}

/// Order creation and payment verification.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentService: Send + Sync {
    /// Ask the gateway for a payable order at the course price.
    ///
    /// Nothing is stored locally; each call creates a fresh order.
    async fn create_order(&self, user_id: &UserId, course_id: &CourseId)
    -> Result<GatewayOrder, Error>;

    /// Enroll the user once the gateway reports the order settled.
    ///
    /// Returns the user with the updated course set. Repeating a successful
    /// verification is a no-op.
    async fn verify_payment(&self, request: VerifyPaymentRequest) -> Result<User, Error>;
}
