//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed entities for accounts, courses, lectures,
//! reviews and paid enrollment, plus the services that implement the
//! driving ports in [`ports`]. Types validate on construction; adapters never
//! see unchecked input.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User, Course, Lecture, Review: aggregates read from storage.
//! - `is_enrolled` / `may_view_lecture`: the lecture access gate.
//! - CatalogueCache: versioned cache of the public course list.
//! - PasswordReset: emailed-code reset progress stored on a user.

pub mod catalogue_cache;
pub mod course;
pub mod enrollment;
pub mod error;
pub mod ids;
pub mod lecture;
pub mod order;
pub mod password_reset;
pub mod ports;
pub mod review;
pub mod trace_id;
pub mod user;

mod account_service;
mod course_service;
mod enrollment_service;
mod lecture_service;
mod password_reset_service;
mod review_service;
mod service_support;

pub use self::account_service::AccountServiceImpl;
pub use self::catalogue_cache::CatalogueCache;
pub use self::course::{
    Category, Course, CourseDraft, CourseLevel, CourseListing, CoursePatch, CourseTitle,
    CourseValidationError, Price,
};
pub use self::course_service::CourseServiceImpl;
pub use self::enrollment::{Enrollment, Viewer, is_enrolled, may_view_lecture};
pub use self::enrollment_service::{DEFAULT_GATEWAY_TIMEOUT, EnrollmentServiceImpl};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{CourseId, IdValidationError, LectureId, ReviewId, UserId};
pub use self::lecture::{Lecture, LecturePatch, LectureTitle, LectureValidationError};
pub use self::lecture_service::LectureServiceImpl;
pub use self::order::{CURRENCY, GatewayOrder, OrderRequest, OrderStatus, receipt_for};
pub use self::password_reset::{
    PasswordReset, RESET_CODE_TTL_SECONDS, ResetCode, ResetCodeError, ResetRejection,
};
pub use self::password_reset_service::PasswordResetServiceImpl;
pub use self::review::{
    PublicProfile, Rating, RatingSummary, Review, ReviewValidationError, ReviewWithUser,
};
pub use self::review_service::ReviewServiceImpl;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, LoginCredentials, Password, PasswordHash, ProfileUpdate, Registration, Role, User,
    UserDraft, UserName, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use coursehub::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
