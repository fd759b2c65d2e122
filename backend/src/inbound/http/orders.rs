//! Paid enrollment handlers.
//!
//! ```text
//! POST /api/order/razorpay-order  {"courseId":"..."}
//! POST /api/order/verify-payment  {"courseId":"...","razorpayOrderId":"order_..."}
//! ```
//!
//! The paying user is always the session user. A `userId` in the body is
//! accepted for client compatibility but must match the session. Orders are
//! bound to the user who raised them, so verifying someone else's paid order
//! is forbidden.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::VerifyPaymentRequest;
use crate::domain::{CourseId, Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{self, ApiResponse, ErrorEnvelope};
use crate::inbound::http::schemas::{OrderResponse, UserResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, require};

const USER_ID: FieldName = FieldName::new("userId");
const COURSE_ID: FieldName = FieldName::new("courseId");
const ORDER_ID: FieldName = FieldName::new("razorpayOrderId");

/// Body for `POST /api/order/razorpay-order`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Buyer; defaults to the session user.
    pub user_id: Option<String>,
    /// Course being bought.
    pub course_id: Option<String>,
}

/// Body for `POST /api/order/verify-payment`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentBody {
    /// Buyer; defaults to the session user.
    pub user_id: Option<String>,
    /// Course the order was raised for.
    pub course_id: Option<String>,
    /// Gateway order id returned by `razorpay-order`.
    #[schema(example = "order_IluGWxBm9U8zJ8")]
    pub razorpay_order_id: Option<String>,
}

/// Reject a body `userId` naming someone other than the session user.
fn paying_user(session_user: UserId, claimed: Option<String>) -> Result<UserId, Error> {
    let Some(raw) = claimed else {
        return Ok(session_user);
    };
    let claimed: UserId = parse_id(USER_ID, &raw)?;
    if claimed != session_user {
        return Err(Error::forbidden("cannot purchase on behalf of another user"));
    }
    Ok(session_user)
}

/// Raise a gateway order for a published course.
#[utoipa::path(
    post,
    path = "/api/order/razorpay-order",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Gateway order", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Course not purchasable", body = ErrorEnvelope),
        (status = 401, description = "Not signed in", body = ErrorEnvelope),
        (status = 404, description = "Unknown course", body = ErrorEnvelope),
        (status = 502, description = "Gateway failure", body = ErrorEnvelope),
        (status = 503, description = "Gateway unavailable", body = ErrorEnvelope)
    ),
    tags = ["orders"],
    operation_id = "createOrder"
)]
#[post("/order/razorpay-order")]
pub async fn create_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateOrderRequest>,
) -> ApiResult<HttpResponse> {
    let CreateOrderRequest { user_id, course_id } = payload.into_inner();
    let user_id = paying_user(session.require_user_id()?, user_id)?;
    let course_id: CourseId = parse_id(COURSE_ID, &require(COURSE_ID, course_id)?)?;
    let order = state.enrollments.create_order(&user_id, &course_id).await?;
    Ok(envelope::ok(
        "Order created successfully",
        OrderResponse::from(&order),
    ))
}

/// Confirm settlement with the gateway and enroll the user.
#[utoipa::path(
    post,
    path = "/api/order/verify-payment",
    request_body = VerifyPaymentBody,
    responses(
        (status = 200, description = "Enrolled user", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 402, description = "Payment not settled", body = ErrorEnvelope),
        (status = 403, description = "User mismatch", body = ErrorEnvelope),
        (status = 502, description = "Gateway failure", body = ErrorEnvelope),
        (status = 503, description = "Gateway unavailable", body = ErrorEnvelope)
    ),
    tags = ["orders"],
    operation_id = "verifyPayment"
)]
#[post("/order/verify-payment")]
pub async fn verify_payment(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<VerifyPaymentBody>,
) -> ApiResult<HttpResponse> {
    let VerifyPaymentBody {
        user_id,
        course_id,
        razorpay_order_id,
    } = payload.into_inner();
    let user_id = paying_user(session.require_user_id()?, user_id)?;
    let course_id: CourseId = parse_id(COURSE_ID, &require(COURSE_ID, course_id)?)?;
    let gateway_order_id = require(ORDER_ID, razorpay_order_id)?;
    let user = state
        .enrollments
        .verify_payment(VerifyPaymentRequest {
            user_id,
            course_id,
            gateway_order_id,
        })
        .await?;
    Ok(envelope::ok(
        "Payment verified successfully",
        UserResponse::from(&user),
    ))
}

#[cfg(test)]
#[path = "orders_tests.rs"]
mod tests;
