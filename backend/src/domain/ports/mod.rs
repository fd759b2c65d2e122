//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Service`) are called by inbound adapters. Driven ports
//! (repositories, the payment gateway, the password hasher, the mailer) are
//! implemented by outbound adapters and expose typed errors the services map
//! into [`crate::domain::Error`].

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod course_repository;
mod course_service;
mod enrollment_repository;
mod enrollment_service;
mod lecture_repository;
mod lecture_service;
mod mailer;
mod password_hasher;
mod password_reset_service;
mod payment_gateway;
mod review_repository;
mod review_service;
mod user_repository;

#[cfg(test)]
pub use account_service::MockAccountService;
pub use account_service::AccountService;
#[cfg(test)]
pub use course_repository::MockCourseRepository;
pub use course_repository::{CoursePersistenceError, CourseRepository};
#[cfg(test)]
pub use course_service::MockCourseService;
pub use course_service::{CourseDetail, CourseService};
#[cfg(test)]
pub use enrollment_repository::MockEnrollmentRepository;
pub use enrollment_repository::{EnrollmentPersistenceError, EnrollmentRepository};
#[cfg(test)]
pub use enrollment_service::MockEnrollmentService;
pub use enrollment_service::{EnrollmentService, VerifyPaymentRequest};
#[cfg(test)]
pub use lecture_repository::MockLectureRepository;
pub use lecture_repository::{LecturePersistenceError, LectureRepository};
#[cfg(test)]
pub use lecture_service::MockLectureService;
pub use lecture_service::LectureService;
#[cfg(test)]
pub use mailer::MockMailer;
pub use mailer::{Mailer, MailerError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use password_reset_service::MockPasswordResetService;
pub use password_reset_service::PasswordResetService;
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::{PaymentGateway, PaymentGatewayError};
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewPersistenceError, ReviewRepository};
#[cfg(test)]
pub use review_service::MockReviewService;
pub use review_service::ReviewService;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
