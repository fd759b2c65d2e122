//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejection is an `invalid_request` error whose `details` name the
//! offending field and a stable code, so clients can highlight the input.

use actix_web::HttpRequest;
use actix_web::error::{JsonPayloadError, PathError};
use serde_json::json;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidId,
    InvalidValue,
    MalformedBody,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidId => "invalid_id",
            Self::InvalidValue => "invalid_value",
            Self::MalformedBody => "malformed_body",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {name}"),
    )
}

/// Wrap a domain validation failure with the field it came from.
pub(crate) fn invalid_field_error(field: FieldName, error: impl std::fmt::Display) -> Error {
    field_error(field, ErrorCode::InvalidValue, error.to_string())
}

/// Parse an identifier, naming `field` on failure.
pub(crate) fn parse_id<T, E>(field: FieldName, raw: &str) -> Result<T, Error>
where
    T: TryFrom<String, Error = E>,
    E: std::fmt::Display,
{
    T::try_from(raw.to_owned())
        .map_err(|error| field_error(field, ErrorCode::InvalidId, error.to_string()))
}

/// Unwrap a required body field.
pub(crate) fn require<T>(field: FieldName, value: Option<T>) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Turn JSON extractor failures into enveloped `invalid_request` errors.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "expected an application/json body".to_owned(),
        JsonPayloadError::Deserialize(inner) => format!("malformed JSON body: {inner}"),
        other => format!("unreadable request body: {other}"),
    };
    Error::invalid_request(message)
        .with_details(json!({ "code": ErrorCode::MalformedBody.as_str() }))
        .into()
}

/// Turn path extractor failures into enveloped `invalid_request` errors.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("invalid path: {err}")).into()
}
