//! Review handlers.
//!
//! ```text
//! POST /api/review/create {"courseId":"...","rating":5,"comment":"Great"}
//! GET  /api/review/get
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{CourseId, Rating};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{self, ApiResponse, ErrorEnvelope};
use crate::inbound::http::schemas::{ReviewResponse, ReviewWithUserResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error, parse_id, require};

const COURSE_ID: FieldName = FieldName::new("courseId");
const RATING: FieldName = FieldName::new("rating");

/// Body for `POST /api/review/create`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub course_id: Option<String>,
    /// Whole stars, 1 to 5.
    #[schema(example = 5)]
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

/// Review a course as the signed-in user.
#[utoipa::path(
    post,
    path = "/api/review/create",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review stored", body = ApiResponse<ReviewResponse>),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 401, description = "Not signed in", body = ErrorEnvelope),
        (status = 404, description = "Unknown course", body = ErrorEnvelope),
        (status = 409, description = "Already reviewed", body = ErrorEnvelope)
    ),
    tags = ["reviews"],
    operation_id = "createReview"
)]
#[post("/review/create")]
pub async fn create_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateReviewRequest>,
) -> ApiResult<HttpResponse> {
    let author = session.require_user_id()?;
    let CreateReviewRequest {
        course_id,
        rating,
        comment,
    } = payload.into_inner();
    let course_id: CourseId = parse_id(COURSE_ID, &require(COURSE_ID, course_id)?)?;
    let rating = Rating::new(require(RATING, rating)?)
        .map_err(|err| invalid_field_error(RATING, err))?;
    let review = state
        .reviews
        .create(&author, &course_id, rating, comment)
        .await?;
    Ok(envelope::created(
        "Review created successfully",
        ReviewResponse::from(&review),
    ))
}

/// Every review, newest first, with its author. Requires a session.
#[utoipa::path(
    get,
    path = "/api/review/get",
    responses(
        (status = 200, description = "Reviews", body = ApiResponse<Vec<ReviewWithUserResponse>>),
        (status = 401, description = "Not signed in", body = ErrorEnvelope)
    ),
    tags = ["reviews"],
    operation_id = "listReviews"
)]
#[get("/review/get")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let reviews = state.reviews.list().await?;
    let data: Vec<ReviewWithUserResponse> =
        reviews.iter().map(ReviewWithUserResponse::from).collect();
    Ok(envelope::ok("Reviews fetched successfully", data))
}
