//! Tests for HTTP error mapping.

use super::*;
use crate::domain::Error;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn internal_error_case(expected_trace_id: String) -> Error {
    Error::internal("connection string leaked")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"secret": "x"}))
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::payment_not_settled("payment failed"), StatusCode::PAYMENT_REQUIRED)]
#[case(Error::upstream_failure("gateway"), StatusCode::BAD_GATEWAY)]
#[case(Error::service_unavailable("later"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn render(error: Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(&error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("trace id is ASCII").to_owned());
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body = serde_json::from_slice(&bytes).expect("envelope JSON");
    (status, header, body)
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(internal_error_case: Error, expected_trace_id: String) {
    let (status, header, body) = render(internal_error_case).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(expected_trace_id.as_str()));
    assert_eq!(body["statusCode"], 500);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "internal_error");
    assert_eq!(body["message"], "Internal server error");
    assert_eq!(body["traceId"], TRACE_ID);
    assert!(body.get("details").is_none());
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details() {
    let error = Error::invalid_request("rating must be between 1 and 5")
        .with_details(json!({"field": "rating"}));

    let (status, header, body) = render(error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(header.is_none(), "no trace id outside a request scope");
    assert_eq!(body["statusCode"], 400);
    assert_eq!(body["message"], "rating must be between 1 and 5");
    assert_eq!(body["details"], json!({"field": "rating"}));
    assert!(body.get("traceId").is_none());
}

#[rstest]
#[actix_web::test]
async fn envelope_status_matches_http_status_for_payment_errors() {
    let (status, _, body) = render(Error::payment_not_settled("payment failed")).await;
    assert_eq!(u64::from(status.as_u16()), body["statusCode"].as_u64().expect("number"));
    assert_eq!(body["code"], "payment_not_settled");
}

#[rstest]
fn redaction_leaves_other_codes_untouched() {
    let error = Error::forbidden("not the owner").with_trace_id(TRACE_ID);
    assert_eq!(client_view(&error), error);
}

#[rstest]
fn client_view_of_internal_error_keeps_only_trace_id(internal_error_case: Error) {
    let view = client_view(&internal_error_case);
    assert_eq!(view.code(), ErrorCode::InternalError);
    assert_eq!(view.message(), "Internal server error");
    assert_eq!(view.trace_id(), Some(TRACE_ID));
    assert_eq!(view.details(), None);
}

#[test]
fn from_actix_error_is_redacted_internal_error() {
    use actix_web::error;

    let actix_err = error::ErrorBadRequest("boom");
    let err: Error = actix_err.into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.trace_id(), None);
    assert_eq!(err.details(), None);
}
