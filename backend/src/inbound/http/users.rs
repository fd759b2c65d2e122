//! Current-user handlers.
//!
//! ```text
//! GET /api/user/getCurrentUser
//! PUT /api/user/updateProfile {"name":"Ada L.","description":"Maths"}
//! ```

use actix_web::{HttpResponse, get, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, ProfileUpdate, UserName};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::map_user_validation_error;
use crate::inbound::http::envelope::{self, ApiResponse, ErrorEnvelope};
use crate::inbound::http::schemas::UserResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Profile update body; at least one field is required.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
}

impl TryFrom<UpdateProfileRequest> for ProfileUpdate {
    type Error = Error;

    fn try_from(value: UpdateProfileRequest) -> Result<Self, Self::Error> {
        let name = value
            .name
            .map(UserName::new)
            .transpose()
            .map_err(map_user_validation_error)?;
        Ok(Self {
            name,
            description: value.description,
            photo_url: value.photo_url,
        })
    }
}

/// Return the signed-in user.
#[utoipa::path(
    get,
    path = "/api/user/getCurrentUser",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserResponse>),
        (status = 401, description = "Not signed in", body = ErrorEnvelope),
        (status = 404, description = "Account no longer exists", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "getCurrentUser"
)]
#[get("/user/getCurrentUser")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let user = state.accounts.current_user(&user_id).await?;
    Ok(envelope::ok("User fetched successfully", UserResponse::from(&user)))
}

/// Update name, description or photo of the signed-in user.
#[utoipa::path(
    put,
    path = "/api/user/updateProfile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated user", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 401, description = "Not signed in", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "updateProfile"
)]
#[put("/user/updateProfile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let update = ProfileUpdate::try_from(payload.into_inner())?;
    let user = state.accounts.update_profile(&user_id, update).await?;
    Ok(envelope::ok("Profile updated successfully", UserResponse::from(&user)))
}
