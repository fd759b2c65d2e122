//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api` handler, the health probes, the request
//! and response DTOs, and the session cookie security scheme. Swagger UI
//! serves it in debug builds.

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth::{
    LoginRequest, RegisterRequest, ResetPasswordRequest, SendOtpRequest, VerifyOtpRequest,
};
use crate::inbound::http::courses::{CreateCourseRequest, EditCourseRequest, SearchRequest};
use crate::inbound::http::envelope::ErrorEnvelope;
use crate::inbound::http::lectures::{CreateLectureRequest, EditLectureRequest};
use crate::inbound::http::orders::{CreateOrderRequest, VerifyPaymentBody};
use crate::inbound::http::reviews::CreateReviewRequest;
use crate::inbound::http::schemas::{
    CourseDetailResponse, CourseResponse, CourseSummaryResponse, LectureResponse, OrderResponse,
    PublicProfileResponse, RatingResponse, ReviewResponse, ReviewWithUserResponse, UserResponse,
};
use crate::inbound::http::users::UpdateProfileRequest;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/register or /api/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "CourseHub API",
        description = "Accounts, course authoring, lectures, reviews and paid enrollment."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::send_otp,
        crate::inbound::http::auth::verify_otp,
        crate::inbound::http::auth::reset_password,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::courses::create_course,
        crate::inbound::http::courses::list_public,
        crate::inbound::http::courses::list_for_educator,
        crate::inbound::http::courses::search,
        crate::inbound::http::courses::get_course,
        crate::inbound::http::courses::edit_course,
        crate::inbound::http::courses::delete_course,
        crate::inbound::http::lectures::create_lecture,
        crate::inbound::http::lectures::list_course_lectures,
        crate::inbound::http::lectures::get_lecture,
        crate::inbound::http::lectures::edit_lecture,
        crate::inbound::http::lectures::delete_lecture,
        crate::inbound::http::orders::create_order,
        crate::inbound::http::orders::verify_payment,
        crate::inbound::http::reviews::create_review,
        crate::inbound::http::reviews::list_reviews,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        ErrorEnvelope,
        RegisterRequest,
        SendOtpRequest,
        VerifyOtpRequest,
        ResetPasswordRequest,
        LoginRequest,
        UpdateProfileRequest,
        CreateCourseRequest,
        EditCourseRequest,
        SearchRequest,
        CreateLectureRequest,
        EditLectureRequest,
        CreateOrderRequest,
        VerifyPaymentBody,
        CreateReviewRequest,
        UserResponse,
        PublicProfileResponse,
        CourseResponse,
        RatingResponse,
        CourseSummaryResponse,
        CourseDetailResponse,
        LectureResponse,
        OrderResponse,
        ReviewResponse,
        ReviewWithUserResponse,
    )),
    tags(
        (name = "auth", description = "Registration and session management"),
        (name = "users", description = "The signed-in user's profile"),
        (name = "courses", description = "Course authoring and catalogue"),
        (name = "lectures", description = "Lectures with per-viewer access"),
        (name = "orders", description = "Gateway orders and payment verification"),
        (name = "reviews", description = "Course reviews and ratings"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
