//! PostgreSQL-backed `ReviewRepository` implementation using Diesel ORM.
//!
//! The one-review-per-user rule is enforced by the `reviews_course_user_key`
//! unique constraint; a violation surfaces as
//! [`ReviewPersistenceError::Duplicate`].

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::{count_star, sum};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ReviewPersistenceError, ReviewRepository};
use crate::domain::{CourseId, PublicProfile, RatingSummary, Review, ReviewWithUser, UserId};

use super::conversions::review_from_row;
use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewReviewRow, ReviewRow};
use super::pool::{DbPool, PoolError};
use super::schema::{reviews, users};

const UNIQUE_REVIEW_CONSTRAINT: &str = "reviews_course_user_key";

/// Diesel-backed implementation of the `ReviewRepository` port.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReviewPersistenceError {
    map_basic_pool_error(error, ReviewPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ReviewPersistenceError {
    if is_unique_violation(&error, Some(UNIQUE_REVIEW_CONSTRAINT)) {
        return ReviewPersistenceError::duplicate();
    }
    map_basic_diesel_error(
        error,
        ReviewPersistenceError::query,
        ReviewPersistenceError::connection,
    )
}

/// Convert aggregate totals, clamping values no real table can reach.
fn summary_from_totals(count: i64, total: Option<i64>) -> RatingSummary {
    RatingSummary::from_totals(
        u32::try_from(count).unwrap_or(u32::MAX),
        total.and_then(|sum| u64::try_from(sum).ok()).unwrap_or(0),
    )
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewReviewRow {
            id: *review.id.as_uuid(),
            course_id: *review.course_id.as_uuid(),
            user_id: *review.user_id.as_uuid(),
            rating: i16::from(review.rating.stars()),
            comment: review.comment.as_deref(),
            reviewed_at: review.reviewed_at,
        };
        diesel::insert_into(reviews::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn list_with_users(&self) -> Result<Vec<ReviewWithUser>, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ReviewRow> = reviews::table
            .order_by((reviews::reviewed_at.desc(), reviews::id.asc()))
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let reviewer_ids: Vec<Uuid> = rows.iter().map(|row| row.user_id).collect();
        let profiles: HashMap<Uuid, PublicProfile> = users::table
            .filter(users::id.eq_any(&reviewer_ids))
            .select((users::id, users::name, users::photo_url))
            .load::<(Uuid, String, Option<String>)>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(|(id, name, photo_url)| {
                let profile = PublicProfile {
                    id: UserId::from_uuid(id),
                    name,
                    photo_url,
                };
                (id, profile)
            })
            .collect();

        rows.into_iter()
            .map(|row| {
                let reviewer = profiles.get(&row.user_id).cloned();
                review_from_row(row)
                    .map(|review| ReviewWithUser { review, reviewer })
                    .map_err(ReviewPersistenceError::query)
            })
            .collect()
    }

    async fn summaries_for(
        &self,
        course_ids: &[CourseId],
    ) -> Result<HashMap<CourseId, RatingSummary>, ReviewPersistenceError> {
        if course_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let ids: Vec<Uuid> = course_ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let totals: Vec<(Uuid, i64, Option<i64>)> = reviews::table
            .filter(reviews::course_id.eq_any(&ids))
            .group_by(reviews::course_id)
            .select((reviews::course_id, count_star(), sum(reviews::rating)))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut summaries: HashMap<CourseId, RatingSummary> = course_ids
            .iter()
            .map(|id| (id.clone(), RatingSummary::default()))
            .collect();
        for (course_id, count, total) in totals {
            summaries.insert(
                CourseId::from_uuid(course_id),
                summary_from_totals(count, total),
            );
        }
        Ok(summaries)
    }
}
