//! Uniform JSON envelope wrapped around every response body.
//!
//! Success bodies look like
//! `{"statusCode":200,"message":"...","success":true,"data":...}`. Error
//! bodies carry the same `statusCode`/`success` pair with the domain error
//! fields flattened alongside. The HTTP status always equals `statusCode`.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;

/// Successful response envelope.
///
/// # Examples
/// ```
/// use actix_web::http::StatusCode;
/// use coursehub::inbound::http::envelope::ApiResponse;
///
/// let body = ApiResponse::new(StatusCode::CREATED, "created", 7_u8);
/// assert!(body.success);
/// assert_eq!(body.status_code, 201);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Mirrors the HTTP status.
    #[schema(example = 200)]
    pub status_code: u16,
    /// Human-readable outcome.
    pub message: String,
    /// `statusCode < 400`.
    pub success: bool,
    /// Endpoint-specific payload.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Build an envelope for `status`.
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            status_code: status.as_u16(),
            message: message.into(),
            success: status.as_u16() < 400,
            data,
        }
    }

    /// Render the envelope with a matching HTTP status.
    pub fn into_response(self) -> HttpResponse {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        HttpResponse::build(status).json(self)
    }
}

/// `200 OK` envelope.
pub fn ok<T: Serialize>(message: impl Into<String>, data: T) -> HttpResponse {
    ApiResponse::new(StatusCode::OK, message, data).into_response()
}

/// `201 Created` envelope.
pub fn created<T: Serialize>(message: impl Into<String>, data: T) -> HttpResponse {
    ApiResponse::new(StatusCode::CREATED, message, data).into_response()
}

/// Failure envelope. The domain error's fields sit at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// Mirrors the HTTP status.
    #[schema(example = 404)]
    pub status_code: u16,
    /// Always `false`.
    pub success: bool,
    /// Code, message, trace id and details.
    #[serde(flatten)]
    pub error: Error,
}

impl ErrorEnvelope {
    /// Wrap `error` for `status`.
    #[must_use]
    pub fn new(status: StatusCode, error: Error) -> Self {
        Self {
            status_code: status.as_u16(),
            success: false,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case(StatusCode::OK, true)]
    #[case(StatusCode::CREATED, true)]
    #[case(StatusCode::PAYMENT_REQUIRED, false)]
    fn success_flag_follows_status(#[case] status: StatusCode, #[case] success: bool) {
        assert_eq!(ApiResponse::new(status, "m", ()).success, success);
    }

    #[actix_web::test]
    async fn success_body_uses_camel_case_fields() {
        let response = created("Course created", json!({"id": "c1"}));
        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = to_bytes(response.into_body()).await.expect("body");
        let value: Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(
            value,
            json!({
                "statusCode": 201,
                "message": "Course created",
                "success": true,
                "data": {"id": "c1"}
            })
        );
    }

    #[rstest]
    fn error_fields_are_flattened() {
        let envelope =
            ErrorEnvelope::new(StatusCode::NOT_FOUND, Error::not_found("course not found"));
        let value = serde_json::to_value(&envelope).expect("serialises");
        assert_eq!(value["statusCode"], 404);
        assert_eq!(value["success"], false);
        assert_eq!(value["code"], "not_found");
        assert_eq!(value["message"], "course not found");
        assert!(value.get("error").is_none());
    }
}
