//! Port abstraction for review persistence.
use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{CourseId, RatingSummary, Review, ReviewWithUser};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by review repository adapters.
    pub enum ReviewPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "review repository query failed: {message}",
        /// The user already reviewed the course.
        Duplicate => "review already exists for this course and user",
    }
}

/// Storage for reviews.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert a review. At most one per `(course, user)`.
    async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError>;

    /// All reviews, newest first, with their authors.
    async fn list_with_users(&self) -> Result<Vec<ReviewWithUser>, ReviewPersistenceError>;

    /// Rating totals for each listed course. Missing courses have no reviews.
    async fn summaries_for(
        &self,
        course_ids: &[CourseId],
    ) -> Result<HashMap<CourseId, RatingSummary>, ReviewPersistenceError>;
}
