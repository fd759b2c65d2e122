//! Course authoring and catalogue handlers.
//!
//! ```text
//! POST   /api/course/create        {"title":"Rust basics","category":"Programming"}
//! GET    /api/course/public
//! GET    /api/course/educator
//! POST   /api/course/search        {"query":"rust"}
//! GET    /api/course/{id}
//! PUT    /api/course/edit/{id}     {"price":499,"isPublished":true}
//! DELETE /api/course/delete/{id}
//! ```
//!
//! `/course/{id}` must be registered after the fixed `/course/*` paths so it
//! does not shadow them.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Category, CourseId, CourseLevel, CoursePatch, CourseTitle, CourseValidationError, Error, Price,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{self, ApiResponse, ErrorEnvelope};
use crate::inbound::http::schemas::{CourseDetailResponse, CourseResponse, CourseSummaryResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error, parse_id, require};

const ID: FieldName = FieldName::new("id");

/// Body for `POST /api/course/create`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub title: Option<String>,
    pub category: Option<String>,
}

/// Body for `PUT /api/course/edit/{id}`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditCourseRequest {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    /// `Beginner`, `Intermediate` or `Advanced`.
    pub level: Option<String>,
    /// Whole currency units.
    pub price: Option<i64>,
    pub thumbnail: Option<String>,
    pub is_published: Option<bool>,
}

/// Body for `POST /api/course/search`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: Option<String>,
}

fn title(raw: &str) -> Result<CourseTitle, Error> {
    CourseTitle::new(raw).map_err(|err| invalid_field_error(FieldName::new("title"), err))
}

fn category(raw: &str) -> Result<Category, Error> {
    Category::new(raw).map_err(|err| invalid_field_error(FieldName::new("category"), err))
}

fn price(raw: i64) -> Result<Price, Error> {
    u32::try_from(raw).map(Price::new).map_err(|_| {
        invalid_field_error(
            FieldName::new("price"),
            "price must be a whole number between 0 and 4294967295",
        )
    })
}

impl TryFrom<EditCourseRequest> for CoursePatch {
    type Error = Error;

    fn try_from(value: EditCourseRequest) -> Result<Self, Self::Error> {
        let patch = Self {
            title: value.title.as_deref().map(title).transpose()?,
            subtitle: value.subtitle,
            description: value.description,
            category: value.category.as_deref().map(category).transpose()?,
            level: value
                .level
                .as_deref()
                .map(str::parse::<CourseLevel>)
                .transpose()
                .map_err(|err| invalid_field_error(FieldName::new("level"), err))?,
            price: value.price.map(price).transpose()?,
            thumbnail: value.thumbnail,
            is_published: value.is_published,
        };
        if patch.is_empty() {
            return Err(Error::invalid_request(
                CourseValidationError::EmptyPatch.to_string(),
            ));
        }
        Ok(patch)
    }
}

/// Create an unpublished course owned by the signed-in educator.
#[utoipa::path(
    post,
    path = "/api/course/create",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = ApiResponse<CourseResponse>),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 401, description = "Not signed in", body = ErrorEnvelope),
        (status = 403, description = "Not an educator", body = ErrorEnvelope)
    ),
    tags = ["courses"],
    operation_id = "createCourse"
)]
#[post("/course/create")]
pub async fn create_course(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateCourseRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let CreateCourseRequest {
        title: raw_title,
        category: raw_category,
    } = payload.into_inner();
    let course_title = title(&require(FieldName::new("title"), raw_title)?)?;
    let course_category = category(&require(FieldName::new("category"), raw_category)?)?;
    let course = state
        .courses
        .create(&actor, course_title, course_category)
        .await?;
    Ok(envelope::created(
        "Course created successfully",
        CourseResponse::from(&course),
    ))
}

/// Published courses with ratings.
#[utoipa::path(
    get,
    path = "/api/course/public",
    responses(
        (status = 200, description = "Published courses", body = ApiResponse<Vec<CourseSummaryResponse>>)
    ),
    tags = ["courses"],
    operation_id = "listPublicCourses",
    security([])
)]
#[get("/course/public")]
pub async fn list_public(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let listings = state.courses.list_public().await?;
    let data: Vec<CourseSummaryResponse> =
        listings.iter().map(CourseSummaryResponse::from).collect();
    Ok(envelope::ok("Published courses fetched successfully", data))
}

/// Courses created by the signed-in user.
#[utoipa::path(
    get,
    path = "/api/course/educator",
    responses(
        (status = 200, description = "Own courses", body = ApiResponse<Vec<CourseResponse>>),
        (status = 401, description = "Not signed in", body = ErrorEnvelope)
    ),
    tags = ["courses"],
    operation_id = "listEducatorCourses"
)]
#[get("/course/educator")]
pub async fn list_for_educator(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let courses = state.courses.list_for_educator(&actor).await?;
    let data: Vec<CourseResponse> = courses.iter().map(CourseResponse::from).collect();
    Ok(envelope::ok("Educator courses fetched successfully", data))
}

/// Keyword search over published courses.
#[utoipa::path(
    post,
    path = "/api/course/search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Matching courses", body = ApiResponse<Vec<CourseSummaryResponse>>),
        (status = 400, description = "Missing query", body = ErrorEnvelope)
    ),
    tags = ["courses"],
    operation_id = "searchCourses",
    security([])
)]
#[post("/course/search")]
pub async fn search(
    state: web::Data<HttpState>,
    payload: web::Json<SearchRequest>,
) -> ApiResult<HttpResponse> {
    let query = require(FieldName::new("query"), payload.into_inner().query)?;
    let listings = state.courses.search(&query).await?;
    let data: Vec<CourseSummaryResponse> =
        listings.iter().map(CourseSummaryResponse::from).collect();
    Ok(envelope::ok("Search completed successfully", data))
}

/// Course detail with creator and rating.
#[utoipa::path(
    get,
    path = "/api/course/{id}",
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course detail", body = ApiResponse<CourseDetailResponse>),
        (status = 400, description = "Malformed id", body = ErrorEnvelope),
        (status = 404, description = "Unknown course", body = ErrorEnvelope)
    ),
    tags = ["courses"],
    operation_id = "getCourse",
    security([])
)]
#[get("/course/{id}")]
pub async fn get_course(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let course_id: CourseId = parse_id(ID, &path)?;
    let detail = state.courses.get(&course_id).await?;
    Ok(envelope::ok(
        "Course fetched successfully",
        CourseDetailResponse::from(&detail),
    ))
}

/// Edit a course the signed-in educator created.
#[utoipa::path(
    put,
    path = "/api/course/edit/{id}",
    params(("id" = String, Path, description = "Course id")),
    request_body = EditCourseRequest,
    responses(
        (status = 200, description = "Updated course", body = ApiResponse<CourseResponse>),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 403, description = "Not the creator", body = ErrorEnvelope),
        (status = 404, description = "Unknown course", body = ErrorEnvelope)
    ),
    tags = ["courses"],
    operation_id = "editCourse"
)]
#[put("/course/edit/{id}")]
pub async fn edit_course(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<EditCourseRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let course_id: CourseId = parse_id(ID, &path)?;
    let patch = CoursePatch::try_from(payload.into_inner())?;
    let course = state.courses.edit(&actor, &course_id, patch).await?;
    Ok(envelope::ok(
        "Course updated successfully",
        CourseResponse::from(&course),
    ))
}

/// Delete a course with its lectures, reviews and enrollments.
#[utoipa::path(
    delete,
    path = "/api/course/delete/{id}",
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Deleted course", body = ApiResponse<CourseResponse>),
        (status = 403, description = "Not the creator", body = ErrorEnvelope),
        (status = 404, description = "Unknown course", body = ErrorEnvelope)
    ),
    tags = ["courses"],
    operation_id = "deleteCourse"
)]
#[delete("/course/delete/{id}")]
pub async fn delete_course(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let course_id: CourseId = parse_id(ID, &path)?;
    let course = state.courses.delete(&actor, &course_id).await?;
    Ok(envelope::ok(
        "Course deleted successfully",
        CourseResponse::from(&course),
    ))
}

#[cfg(test)]
#[path = "courses_tests.rs"]
mod tests;
