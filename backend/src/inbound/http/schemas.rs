//! Wire representations of domain aggregates.
//!
//! Domain types stay free of serde and OpenAPI concerns; handlers convert
//! into these camelCase DTOs before wrapping them in the response envelope.
//! Password hashes have no field here and so can never be serialised.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Course, CourseListing, GatewayOrder, Lecture, PublicProfile, RatingSummary, Review,
    ReviewWithUser, User, ports::CourseDetail,
};

/// Account as returned to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "student")]
    pub role: String,
    pub photo_url: Option<String>,
    pub description: Option<String>,
    /// Ids of courses the user has paid for.
    pub enroll_courses: Vec<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().as_ref().to_owned(),
            email: user.email().as_ref().to_owned(),
            role: user.role().as_str().to_owned(),
            photo_url: user.photo_url().map(str::to_owned),
            description: user.description().map(str::to_owned),
            enroll_courses: user.enroll_courses().iter().map(ToString::to_string).collect(),
        }
    }
}

/// Name and avatar shown next to courses and reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfileResponse {
    pub id: String,
    pub name: String,
    pub photo_url: Option<String>,
}

impl From<&PublicProfile> for PublicProfileResponse {
    fn from(profile: &PublicProfile) -> Self {
        Self {
            id: profile.id.to_string(),
            name: profile.name.clone(),
            photo_url: profile.photo_url.clone(),
        }
    }
}

/// Full course record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: String,
    #[schema(example = "Beginner")]
    pub level: Option<String>,
    /// Whole currency units.
    #[schema(example = 499)]
    pub price: Option<u32>,
    pub thumbnail: Option<String>,
    pub is_published: bool,
    /// Creator user id.
    pub creator: String,
    pub enrolled_students: Vec<String>,
    /// Lecture ids in display order.
    pub lectures: Vec<String>,
    pub reviews: Vec<String>,
}

impl From<&Course> for CourseResponse {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id().to_string(),
            title: course.title().as_ref().to_owned(),
            subtitle: course.subtitle().map(str::to_owned),
            description: course.description().map(str::to_owned),
            category: course.category().as_ref().to_owned(),
            level: course.level().map(|level| level.as_str().to_owned()),
            price: course.price().map(|price| price.units()),
            thumbnail: course.thumbnail().map(str::to_owned),
            is_published: course.is_published(),
            creator: course.creator().to_string(),
            enrolled_students: course
                .enrolled_students()
                .iter()
                .map(ToString::to_string)
                .collect(),
            lectures: course.lectures().iter().map(ToString::to_string).collect(),
            reviews: course.reviews().iter().map(ToString::to_string).collect(),
        }
    }
}

/// Review count and one-decimal average.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    #[schema(example = "4.5")]
    pub average_rating: String,
    pub review_count: u32,
}

impl From<RatingSummary> for RatingResponse {
    fn from(summary: RatingSummary) -> Self {
        Self {
            average_rating: summary.average_display(),
            review_count: summary.count(),
        }
    }
}

/// Catalogue entry: course plus rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummaryResponse {
    #[serde(flatten)]
    pub course: CourseResponse,
    #[serde(flatten)]
    pub rating: RatingResponse,
}

impl From<&CourseListing> for CourseSummaryResponse {
    fn from(listing: &CourseListing) -> Self {
        Self {
            course: CourseResponse::from(&listing.course),
            rating: RatingResponse::from(listing.rating),
        }
    }
}

/// Course page: course, creator and rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetailResponse {
    #[serde(flatten)]
    pub course: CourseResponse,
    /// Absent when the creator account no longer exists.
    pub creator_profile: Option<PublicProfileResponse>,
    #[serde(flatten)]
    pub rating: RatingResponse,
}

impl From<&CourseDetail> for CourseDetailResponse {
    fn from(detail: &CourseDetail) -> Self {
        Self {
            course: CourseResponse::from(&detail.course),
            creator_profile: detail.creator.as_ref().map(PublicProfileResponse::from),
            rating: RatingResponse::from(detail.rating),
        }
    }
}

/// Lecture; `videoUrl` is null when the viewer may not watch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LectureResponse {
    pub id: String,
    pub course_id: String,
    pub lecture_title: String,
    pub video_url: Option<String>,
    pub is_preview_free: bool,
}

impl From<&Lecture> for LectureResponse {
    fn from(lecture: &Lecture) -> Self {
        Self {
            id: lecture.id.to_string(),
            course_id: lecture.course_id.to_string(),
            lecture_title: lecture.title.as_ref().to_owned(),
            video_url: lecture.video_url.clone(),
            is_preview_free: lecture.is_preview_free,
        }
    }
}

/// Gateway order handle passed to the checkout widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    #[schema(example = "order_IluGWxBm9U8zJ8")]
    pub id: String,
    /// Minor currency units.
    #[schema(example = 49900)]
    pub amount: u64,
    #[schema(example = "INR")]
    pub currency: String,
    pub receipt: String,
}

impl From<&GatewayOrder> for OrderResponse {
    fn from(order: &GatewayOrder) -> Self {
        Self {
            id: order.id.clone(),
            amount: order.amount,
            currency: order.currency.clone(),
            receipt: order.receipt.clone(),
        }
    }
}

/// A stored review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: String,
    pub course_id: String,
    pub user_id: String,
    #[schema(example = 5)]
    pub rating: u8,
    pub comment: Option<String>,
    pub reviewed_at: DateTime<Utc>,
}

impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id.to_string(),
            course_id: review.course_id.to_string(),
            user_id: review.user_id.to_string(),
            rating: review.rating.stars(),
            comment: review.comment.clone(),
            reviewed_at: review.reviewed_at,
        }
    }
}

/// Review with its author embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithUserResponse {
    #[serde(flatten)]
    pub review: ReviewResponse,
    /// Absent when the author account no longer exists.
    pub user: Option<PublicProfileResponse>,
}

impl From<&ReviewWithUser> for ReviewWithUserResponse {
    fn from(entry: &ReviewWithUser) -> Self {
        Self {
            review: ReviewResponse::from(&entry.review),
            user: entry.reviewer.as_ref().map(PublicProfileResponse::from),
        }
    }
}
