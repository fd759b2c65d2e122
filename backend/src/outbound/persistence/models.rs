//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions to domain types live in
//! [`super::conversions`].

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{courses, enrollments, lectures, reviews, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub role: String,
    pub photo_url: Option<String>,
    pub description: Option<String>,
    pub reset_code_digest: Option<String>,
    pub reset_expires_at: Option<DateTime<Utc>>,
    pub reset_verified: bool,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: Option<&'a str>,
    pub role: &'a str,
    pub photo_url: Option<&'a str>,
    pub description: Option<&'a str>,
}

/// Changeset for profile edits. `None` columns are written as NULL.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserProfileUpdate<'a> {
    pub name: &'a str,
    pub photo_url: Option<&'a str>,
    pub description: Option<&'a str>,
}

/// Password-reset columns, written together so a row never mixes states.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct PasswordResetColumns<'a> {
    pub reset_code_digest: Option<&'a str>,
    pub reset_expires_at: Option<DateTime<Utc>>,
    pub reset_verified: bool,
}

impl PasswordResetColumns<'_> {
    /// Columns for an account with no reset in progress.
    pub(crate) const fn cleared() -> Self {
        Self {
            reset_code_digest: None,
            reset_expires_at: None,
            reset_verified: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Courses
// ---------------------------------------------------------------------------

/// Row struct for reading from the courses table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CourseRow {
    pub id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: String,
    pub level: Option<String>,
    pub price: Option<i32>,
    pub thumbnail: Option<String>,
    pub is_published: bool,
    pub creator_id: Uuid,
}

/// Insertable and changeset struct for course scalars.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = courses)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CourseValues<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub subtitle: Option<&'a str>,
    pub description: Option<&'a str>,
    pub category: &'a str,
    pub level: Option<&'a str>,
    pub price: Option<i32>,
    pub thumbnail: Option<&'a str>,
    pub is_published: bool,
    pub creator_id: Uuid,
}

// ---------------------------------------------------------------------------
// Lectures
// ---------------------------------------------------------------------------

/// Row struct for reading from the lectures table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = lectures)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LectureRow {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub video_url: Option<String>,
    pub is_preview_free: bool,
}

/// Insertable struct for lectures; `position` comes from the sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = lectures)]
pub(crate) struct NewLectureRow<'a> {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: &'a str,
    pub video_url: Option<&'a str>,
    pub is_preview_free: bool,
}

/// Changeset for lecture edits.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = lectures)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct LectureUpdate<'a> {
    pub title: &'a str,
    pub video_url: Option<&'a str>,
    pub is_preview_free: bool,
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// Row struct for reading from the reviews table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub course_id: Uuid,
    pub user_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub reviewed_at: DateTime<Utc>,
}

/// Insertable struct for reviews.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub id: Uuid,
    pub course_id: Uuid,
    pub user_id: Uuid,
    pub rating: i16,
    pub comment: Option<&'a str>,
    pub reviewed_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Enrollments
// ---------------------------------------------------------------------------

/// Insertable struct for enrollments.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = enrollments)]
pub(crate) struct NewEnrollmentRow<'a> {
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub gateway_order_id: &'a str,
    pub enrolled_at: DateTime<Utc>,
}
