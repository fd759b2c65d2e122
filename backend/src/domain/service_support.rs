//! Internal helpers shared by the domain services.

use crate::domain::ports::{
    CoursePersistenceError, CourseRepository, EnrollmentPersistenceError, LecturePersistenceError,
    MailerError, PasswordHasherError, PaymentGatewayError, ReviewPersistenceError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{Course, CourseId, Error, Role, User, UserId};

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => {
            Error::conflict("an account with this email already exists")
        }
    }
}

pub(crate) fn map_course_error(error: CoursePersistenceError) -> Error {
    match error {
        CoursePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("course repository unavailable: {message}"))
        }
        CoursePersistenceError::Query { message } => {
            Error::internal(format!("course repository error: {message}"))
        }
    }
}

pub(crate) fn map_lecture_error(error: LecturePersistenceError) -> Error {
    match error {
        LecturePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("lecture repository unavailable: {message}"))
        }
        LecturePersistenceError::Query { message } => {
            Error::internal(format!("lecture repository error: {message}"))
        }
    }
}

pub(crate) fn map_review_error(error: ReviewPersistenceError) -> Error {
    match error {
        ReviewPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("review repository unavailable: {message}"))
        }
        ReviewPersistenceError::Query { message } => {
            Error::internal(format!("review repository error: {message}"))
        }
        ReviewPersistenceError::Duplicate => {
            Error::conflict("you have already reviewed this course")
        }
    }
}

pub(crate) fn map_enrollment_error(error: EnrollmentPersistenceError) -> Error {
    match error {
        EnrollmentPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("enrollment repository unavailable: {message}"))
        }
        EnrollmentPersistenceError::Query { message } => {
            Error::internal(format!("enrollment repository error: {message}"))
        }
    }
}

pub(crate) fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

pub(crate) fn map_mailer_error(error: MailerError) -> Error {
    match error {
        MailerError::Delivery { message } => {
            Error::upstream_failure(format!("could not send mail: {message}"))
        }
    }
}

pub(crate) fn map_gateway_error(error: PaymentGatewayError) -> Error {
    match error {
        PaymentGatewayError::Timeout { message } | PaymentGatewayError::RateLimited { message } => {
            Error::service_unavailable(format!("payment gateway unavailable: {message}"))
        }
        PaymentGatewayError::InvalidRequest { message } => {
            Error::invalid_request(format!("payment gateway rejected the request: {message}"))
        }
        PaymentGatewayError::Transport { message } | PaymentGatewayError::Decode { message } => {
            Error::upstream_failure(format!("payment gateway failed: {message}"))
        }
    }
}

pub(crate) async fn load_user<U>(users: &U, id: &UserId) -> Result<User, Error>
where
    U: UserRepository + ?Sized,
{
    users
        .find_by_id(id)
        .await
        .map_err(map_user_error)?
        .ok_or_else(|| Error::not_found("User not found"))
}

pub(crate) async fn load_course<C>(courses: &C, id: &CourseId) -> Result<Course, Error>
where
    C: CourseRepository + ?Sized,
{
    courses
        .find_by_id(id)
        .await
        .map_err(map_course_error)?
        .ok_or_else(|| Error::not_found("Course not found"))
}

pub(crate) async fn require_educator<U>(users: &U, id: &UserId) -> Result<User, Error>
where
    U: UserRepository + ?Sized,
{
    let user = load_user(users, id).await?;
    if user.role() != Role::Educator {
        return Err(Error::forbidden("only educators may do this"));
    }
    Ok(user)
}

pub(crate) fn require_creator(course: &Course, actor: &UserId) -> Result<(), Error> {
    if course.creator() != actor {
        return Err(Error::forbidden("only the course creator may do this"));
    }
    Ok(())
}
