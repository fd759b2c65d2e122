//! Course reviews and rating aggregation.

use chrono::{DateTime, Utc};

use super::{CourseId, ReviewId, User, UserId};

/// Validation errors raised while building review values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewValidationError {
    /// Rating fell outside 1..=5.
    #[error("rating must be between 1 and 5")]
    RatingOutOfRange,
}

/// Star rating between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

impl Rating {
    /// Validate a rating.
    pub fn new(value: i64) -> Result<Self, ReviewValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|stars| (1..=5).contains(stars))
            .map(Self)
            .ok_or(ReviewValidationError::RatingOutOfRange)
    }

    /// Number of stars.
    #[must_use]
    pub const fn stars(self) -> u8 {
        self.0
    }
}

/// A stored review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    /// Identifier.
    pub id: ReviewId,
    /// Reviewed course.
    pub course_id: CourseId,
    /// Reviewer.
    pub user_id: UserId,
    /// Stars awarded.
    pub rating: Rating,
    /// Optional free text.
    pub comment: Option<String>,
    /// When the review was written.
    pub reviewed_at: DateTime<Utc>,
}

/// Public user details embedded in listings and course details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicProfile {
    /// User id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Profile photo URL.
    pub photo_url: Option<String>,
}

impl From<&User> for PublicProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().clone(),
            name: user.name().as_ref().to_owned(),
            photo_url: user.photo_url().map(ToOwned::to_owned),
        }
    }
}

/// Review joined with its author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewWithUser {
    /// The review.
    pub review: Review,
    /// The author, absent when the account has been removed.
    pub reviewer: Option<PublicProfile>,
}

/// Review count and average for a course.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingSummary {
    count: u32,
    sum: u64,
}

impl RatingSummary {
    /// Aggregate the given ratings.
    pub fn from_ratings(ratings: impl IntoIterator<Item = Rating>) -> Self {
        ratings
            .into_iter()
            .fold(Self::default(), |acc, rating| Self {
                count: acc.count.saturating_add(1),
                sum: acc.sum.saturating_add(u64::from(rating.stars())),
            })
    }

    /// Summary from precomputed totals, as returned by aggregate queries.
    #[must_use]
    pub const fn from_totals(count: u32, sum: u64) -> Self {
        Self { count, sum }
    }

    /// Number of reviews.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.count
    }

    /// Mean rating in tenths, rounded half up. Zero when there are no reviews.
    #[must_use]
    pub fn average_tenths(self) -> u64 {
        let count = u64::from(self.count);
        let denominator = count.saturating_mul(2);
        self.sum
            .saturating_mul(20)
            .saturating_add(count)
            .checked_div(denominator)
            .unwrap_or(0)
    }

    /// Mean rating to one decimal place, `"0.0"` without reviews.
    ///
    /// # Examples
    /// ```
    /// use coursehub::domain::{Rating, RatingSummary};
    ///
    /// let ratings = [5, 4, 3].map(|r| Rating::new(r).expect("valid rating"));
    /// assert_eq!(RatingSummary::from_ratings(ratings).average_display(), "4.0");
    /// ```
    #[must_use]
    pub fn average_display(self) -> String {
        let tenths = self.average_tenths();
        let whole = tenths.checked_div(10).unwrap_or(0);
        let fraction = tenths.checked_rem(10).unwrap_or(0);
        format!("{whole}.{fraction}")
    }
}
