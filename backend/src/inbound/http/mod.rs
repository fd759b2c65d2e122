//! HTTP inbound adapter exposing the REST API under `/api`.
//!
//! Handlers translate JSON bodies into domain values, call a driving port
//! from [`state::HttpState`] and wrap the result in the
//! [`envelope::ApiResponse`] shape.

pub mod auth;
pub mod courses;
pub mod envelope;
pub mod error;
pub mod health;
pub mod lectures;
pub mod orders;
pub mod reviews;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
