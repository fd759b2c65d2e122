//! Paid enrollment service.
//!
//! The gateway's order status is the only trigger for enrollment. A
//! verification that cannot confirm settlement changes nothing. Orders carry
//! the payer in their notes, so a paid order unlocks the course for that user
//! alone.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    CourseRepository, EnrollmentRepository, EnrollmentService, PaymentGateway,
    PaymentGatewayError, UserRepository, VerifyPaymentRequest,
};
use crate::domain::service_support::{
    load_course, load_user, map_enrollment_error, map_gateway_error,
};
use crate::domain::{
    CatalogueCache, CourseId, Enrollment, Error, GatewayOrder, OrderRequest, User, UserId,
};

/// Upper bound on a single gateway call when none is configured.
pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Enrollment service implementing the [`EnrollmentService`] driving port.
#[derive(Clone)]
pub struct EnrollmentServiceImpl<U, C, E, G> {
    users: Arc<U>,
    courses: Arc<C>,
    enrollments: Arc<E>,
    gateway: Arc<G>,
    catalogue: Arc<CatalogueCache>,
    clock: Arc<dyn Clock>,
    gateway_timeout: Duration,
}

impl<U, C, E, G> EnrollmentServiceImpl<U, C, E, G> {
    /// Create a new service with the default gateway timeout.
    pub fn new(
        users: Arc<U>,
        courses: Arc<C>,
        enrollments: Arc<E>,
        gateway: Arc<G>,
        catalogue: Arc<CatalogueCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            courses,
            enrollments,
            gateway,
            catalogue,
            clock,
            gateway_timeout: DEFAULT_GATEWAY_TIMEOUT,
        }
    }

    /// Override the bound on each gateway call.
    #[must_use]
    pub fn with_gateway_timeout(mut self, timeout: Duration) -> Self {
        self.gateway_timeout = timeout;
        self
    }
}

impl<U, C, E, G> EnrollmentServiceImpl<U, C, E, G>
where
    G: PaymentGateway,
{
    async fn bounded<F>(&self, call: F) -> Result<GatewayOrder, Error>
    where
        F: Future<Output = Result<GatewayOrder, PaymentGatewayError>> + Send,
    {
        match tokio::time::timeout(self.gateway_timeout, call).await {
            Ok(result) => result.map_err(|err| {
                warn!(error = %err, retryable = err.is_retryable(), "payment gateway call failed");
                map_gateway_error(err)
            }),
            Err(_) => {
                warn!(timeout_ms = self.gateway_timeout.as_millis(), "payment gateway call timed out");
                Err(Error::service_unavailable(
                    "payment gateway did not respond in time; retry later",
                ))
            }
        }
    }
}

#[async_trait]
impl<U, C, E, G> EnrollmentService for EnrollmentServiceImpl<U, C, E, G>
where
    U: UserRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
    G: PaymentGateway,
{
    async fn create_order(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<GatewayOrder, Error> {
        let course = load_course(self.courses.as_ref(), course_id).await?;
        if !course.is_published() {
            return Err(Error::invalid_request("Course is not available for purchase"));
        }
        let price = course
            .price()
            .filter(|price| price.units() > 0)
            .ok_or_else(|| Error::invalid_request("Course has no price"))?;

        let request = OrderRequest::for_course(course_id, price, user_id);
        let order = self.bounded(self.gateway.create_order(&request)).await?;
        info!(
            user_id = %user_id,
            course_id = %course_id,
            order_id = %order.id,
            amount = order.amount,
            "gateway order created"
        );
        Ok(order)
    }

    async fn verify_payment(&self, request: VerifyPaymentRequest) -> Result<User, Error> {
        let VerifyPaymentRequest {
            user_id,
            course_id,
            gateway_order_id,
        } = request;

        let order = self
            .bounded(self.gateway.fetch_order(&gateway_order_id))
            .await?;
        if !order.status.is_settled() {
            info!(order_id = %order.id, status = ?order.status, "payment not settled");
            return Err(Error::payment_not_settled("Payment failed"));
        }
        if !order.is_for_course(&course_id) {
            warn!(order_id = %order.id, course_id = %course_id, "order receipt does not match course");
            return Err(Error::invalid_request("Order was not raised for this course"));
        }
        if !order.is_paid_by(&user_id) {
            warn!(order_id = %order.id, user_id = %user_id, "order was raised for another user");
            return Err(Error::forbidden("Order was not raised for this user"));
        }

        load_user(self.users.as_ref(), &user_id).await?;
        load_course(self.courses.as_ref(), &course_id).await?;

        let inserted = self
            .enrollments
            .enroll(&Enrollment {
                user_id: user_id.clone(),
                course_id: course_id.clone(),
                gateway_order_id: order.id.clone(),
                enrolled_at: self.clock.utc(),
            })
            .await
            .map_err(map_enrollment_error)?;
        if inserted {
            self.catalogue.invalidate();
        }
        info!(
            user_id = %user_id,
            course_id = %course_id,
            order_id = %order.id,
            newly_enrolled = inserted,
            "payment verified"
        );

        let user = load_user(self.users.as_ref(), &user_id).await?;
        if !user.enroll_courses().contains(&course_id) {
            return Err(Error::internal("enrollment was not visible after commit"));
        }
        Ok(user)
    }
}

#[cfg(test)]
#[path = "enrollment_service_tests.rs"]
mod tests;
