//! Lecture handlers.
//!
//! ```text
//! POST   /api/lecture/create/{courseId}          {"lectureTitle":"Ownership"}
//! GET    /api/lecture/course-lectures/{courseId}
//! GET    /api/lecture/get/{lectureId}
//! PUT    /api/lecture/edit/{lectureId}           {"isPreviewFree":true}
//! DELETE /api/lecture/delete/{lectureId}
//! ```
//!
//! Reads require a session so the access gate knows the viewer. Listings
//! null out `videoUrl` for lectures the viewer may not watch; the single
//! lecture read answers 403 instead.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{CourseId, Error, LectureId, LecturePatch, LectureTitle};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{self, ApiResponse, ErrorEnvelope};
use crate::inbound::http::schemas::LectureResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error, parse_id, require};

const COURSE_ID: FieldName = FieldName::new("courseId");
const LECTURE_ID: FieldName = FieldName::new("lectureId");
const LECTURE_TITLE: FieldName = FieldName::new("lectureTitle");

/// Body for `POST /api/lecture/create/{courseId}`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLectureRequest {
    pub lecture_title: Option<String>,
}

/// Body for `PUT /api/lecture/edit/{lectureId}`. At least one field is
/// required.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditLectureRequest {
    pub lecture_title: Option<String>,
    pub video_url: Option<String>,
    pub is_preview_free: Option<bool>,
}

fn lecture_title(raw: &str) -> Result<LectureTitle, Error> {
    LectureTitle::new(raw).map_err(|err| invalid_field_error(LECTURE_TITLE, err))
}

impl TryFrom<EditLectureRequest> for LecturePatch {
    type Error = Error;

    fn try_from(value: EditLectureRequest) -> Result<Self, Self::Error> {
        let video_url = value
            .video_url
            .map(|url| url.trim().to_owned())
            .filter(|url| !url.is_empty());
        let patch = Self {
            title: value.lecture_title.as_deref().map(lecture_title).transpose()?,
            video_url,
            is_preview_free: value.is_preview_free,
        };
        if patch.is_empty() {
            return Err(Error::invalid_request(
                "lectureTitle, isPreviewFree or videoUrl is required",
            ));
        }
        Ok(patch)
    }
}

fn lecture_list(lectures: &[crate::domain::Lecture]) -> Vec<LectureResponse> {
    lectures.iter().map(LectureResponse::from).collect()
}

/// Add a lecture to a course the signed-in educator created.
#[utoipa::path(
    post,
    path = "/api/lecture/create/{courseId}",
    params(("courseId" = String, Path, description = "Course id")),
    request_body = CreateLectureRequest,
    responses(
        (status = 201, description = "Lecture created", body = ApiResponse<LectureResponse>),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 403, description = "Not the creator", body = ErrorEnvelope),
        (status = 404, description = "Unknown course", body = ErrorEnvelope)
    ),
    tags = ["lectures"],
    operation_id = "createLecture"
)]
#[post("/lecture/create/{courseId}")]
pub async fn create_lecture(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CreateLectureRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let course_id: CourseId = parse_id(COURSE_ID, &path)?;
    let title = lecture_title(&require(
        LECTURE_TITLE,
        payload.into_inner().lecture_title,
    )?)?;
    let lecture = state.lectures.create(&actor, &course_id, title).await?;
    Ok(envelope::created(
        "Lecture created successfully",
        LectureResponse::from(&lecture),
    ))
}

/// Lectures of a course in creation order, gated per viewer.
#[utoipa::path(
    get,
    path = "/api/lecture/course-lectures/{courseId}",
    params(("courseId" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Lectures", body = ApiResponse<Vec<LectureResponse>>),
        (status = 401, description = "Not signed in", body = ErrorEnvelope),
        (status = 404, description = "Unknown course", body = ErrorEnvelope)
    ),
    tags = ["lectures"],
    operation_id = "listCourseLectures"
)]
#[get("/lecture/course-lectures/{courseId}")]
pub async fn list_course_lectures(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let viewer = session.require_user_id()?;
    let course_id: CourseId = parse_id(COURSE_ID, &path)?;
    let lectures = state.lectures.list_for_course(&viewer, &course_id).await?;
    Ok(envelope::ok(
        "Lectures fetched successfully",
        lecture_list(&lectures),
    ))
}

/// A single lecture the viewer may watch.
#[utoipa::path(
    get,
    path = "/api/lecture/get/{lectureId}",
    params(("lectureId" = String, Path, description = "Lecture id")),
    responses(
        (status = 200, description = "Lecture", body = ApiResponse<LectureResponse>),
        (status = 403, description = "Not enrolled", body = ErrorEnvelope),
        (status = 404, description = "Unknown lecture", body = ErrorEnvelope)
    ),
    tags = ["lectures"],
    operation_id = "getLecture"
)]
#[get("/lecture/get/{lectureId}")]
pub async fn get_lecture(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let viewer = session.require_user_id()?;
    let lecture_id: LectureId = parse_id(LECTURE_ID, &path)?;
    let lecture = state.lectures.get(&viewer, &lecture_id).await?;
    Ok(envelope::ok(
        "Lecture fetched successfully",
        LectureResponse::from(&lecture),
    ))
}

/// Edit a lecture of a course the signed-in educator created.
#[utoipa::path(
    put,
    path = "/api/lecture/edit/{lectureId}",
    params(("lectureId" = String, Path, description = "Lecture id")),
    request_body = EditLectureRequest,
    responses(
        (status = 200, description = "Updated lecture", body = ApiResponse<LectureResponse>),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 403, description = "Not the creator", body = ErrorEnvelope),
        (status = 404, description = "Unknown lecture", body = ErrorEnvelope)
    ),
    tags = ["lectures"],
    operation_id = "editLecture"
)]
#[put("/lecture/edit/{lectureId}")]
pub async fn edit_lecture(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<EditLectureRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let lecture_id: LectureId = parse_id(LECTURE_ID, &path)?;
    let patch = LecturePatch::try_from(payload.into_inner())?;
    let lecture = state.lectures.edit(&actor, &lecture_id, patch).await?;
    Ok(envelope::ok(
        "Lecture updated successfully",
        LectureResponse::from(&lecture),
    ))
}

/// Remove a lecture from its course.
#[utoipa::path(
    delete,
    path = "/api/lecture/delete/{lectureId}",
    params(("lectureId" = String, Path, description = "Lecture id")),
    responses(
        (status = 200, description = "Deleted lecture", body = ApiResponse<LectureResponse>),
        (status = 403, description = "Not the creator", body = ErrorEnvelope),
        (status = 404, description = "Unknown lecture", body = ErrorEnvelope)
    ),
    tags = ["lectures"],
    operation_id = "deleteLecture"
)]
#[delete("/lecture/delete/{lectureId}")]
pub async fn delete_lecture(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let lecture_id: LectureId = parse_id(LECTURE_ID, &path)?;
    let lecture = state.lectures.delete(&actor, &lecture_id).await?;
    Ok(envelope::ok(
        "Lecture deleted successfully",
        LectureResponse::from(&lecture),
    ))
}

#[cfg(test)]
#[path = "lectures_tests.rs"]
mod tests;
