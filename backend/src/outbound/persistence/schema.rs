//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        /// Lower-cased; unique.
        email -> Varchar,
        /// PHC-encoded Argon2 hash. Absent for social sign-in accounts.
        password_hash -> Nullable<Text>,
        role -> Varchar,
        photo_url -> Nullable<Text>,
        description -> Nullable<Text>,
        created_at -> Timestamptz,
        /// Hex SHA-256 of the outstanding reset code.
        reset_code_digest -> Nullable<Text>,
        reset_expires_at -> Nullable<Timestamptz>,
        reset_verified -> Bool,
    }
}

diesel::table! {
    /// Courses authored by educators.
    courses (id) {
        id -> Uuid,
        title -> Varchar,
        subtitle -> Nullable<Text>,
        description -> Nullable<Text>,
        category -> Varchar,
        level -> Nullable<Varchar>,
        /// Whole currency units.
        price -> Nullable<Int4>,
        thumbnail -> Nullable<Text>,
        is_published -> Bool,
        creator_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Lectures; `position` is assigned by a sequence and fixes display order.
    lectures (id) {
        id -> Uuid,
        course_id -> Uuid,
        position -> Int8,
        title -> Varchar,
        video_url -> Nullable<Text>,
        is_preview_free -> Bool,
    }
}

diesel::table! {
    /// One review per (course, user).
    reviews (id) {
        id -> Uuid,
        course_id -> Uuid,
        user_id -> Uuid,
        rating -> Int2,
        comment -> Nullable<Text>,
        reviewed_at -> Timestamptz,
    }
}

diesel::table! {
    /// Paid enrollments keyed by (user, course).
    enrollments (user_id, course_id) {
        user_id -> Uuid,
        course_id -> Uuid,
        gateway_order_id -> Varchar,
        enrolled_at -> Timestamptz,
    }
}

diesel::joinable!(courses -> users (creator_id));
diesel::joinable!(lectures -> courses (course_id));
diesel::joinable!(reviews -> courses (course_id));
diesel::joinable!(reviews -> users (user_id));
diesel::joinable!(enrollments -> courses (course_id));
diesel::joinable!(enrollments -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(courses, enrollments, lectures, reviews, users);
