//! Review domain service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{CourseRepository, ReviewRepository, ReviewService};
use crate::domain::service_support::{load_course, map_review_error};
use crate::domain::{
    CatalogueCache, CourseId, Error, Rating, Review, ReviewId, ReviewWithUser, UserId,
};

/// Review service implementing the [`ReviewService`] driving port.
#[derive(Clone)]
pub struct ReviewServiceImpl<C, R> {
    courses: Arc<C>,
    reviews: Arc<R>,
    catalogue: Arc<CatalogueCache>,
    clock: Arc<dyn Clock>,
}

impl<C, R> ReviewServiceImpl<C, R> {
    /// Create a new service.
    pub fn new(
        courses: Arc<C>,
        reviews: Arc<R>,
        catalogue: Arc<CatalogueCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            courses,
            reviews,
            catalogue,
            clock,
        }
    }
}

#[async_trait]
impl<C, R> ReviewService for ReviewServiceImpl<C, R>
where
    C: CourseRepository,
    R: ReviewRepository,
{
    async fn create(
        &self,
        author: &UserId,
        course_id: &CourseId,
        rating: Rating,
        comment: Option<String>,
    ) -> Result<Review, Error> {
        load_course(self.courses.as_ref(), course_id).await?;

        let review = Review {
            id: ReviewId::random(),
            course_id: course_id.clone(),
            user_id: author.clone(),
            rating,
            comment: comment.filter(|text| !text.trim().is_empty()),
            reviewed_at: self.clock.utc(),
        };
        self.reviews
            .insert(&review)
            .await
            .map_err(map_review_error)?;
        self.catalogue.invalidate();
        info!(review_id = %review.id, course_id = %course_id, rating = rating.stars(), "review created");
        Ok(review)
    }

    async fn list(&self) -> Result<Vec<ReviewWithUser>, Error> {
        self.reviews
            .list_with_users()
            .await
            .map_err(map_review_error)
    }
}
