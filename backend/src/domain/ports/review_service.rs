//! Driving port for course reviews.

use async_trait::async_trait;

use crate::domain::{CourseId, Error, Rating, Review, ReviewWithUser, UserId};

/// Review use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Review a course. One review per user and course.
    async fn create(
        &self,
        author: &UserId,
        course_id: &CourseId,
        rating: Rating,
        comment: Option<String>,
    ) -> Result<Review, Error>;

    /// All reviews, newest first.
    async fn list(&self) -> Result<Vec<ReviewWithUser>, Error>;
}
