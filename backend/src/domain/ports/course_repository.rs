//! Port abstraction for course persistence.
use async_trait::async_trait;

use crate::domain::{Course, CourseDraft, CourseId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by course repository adapters.
    pub enum CoursePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "course repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "course repository query failed: {message}",
    }
}

/// Storage for courses.
///
/// Returned courses carry their enrolled students, ordered lecture ids and
/// review ids.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Insert a new course.
    async fn insert(&self, draft: &CourseDraft) -> Result<(), CoursePersistenceError>;

    /// Overwrite the scalar fields of an existing course.
    async fn update(&self, draft: &CourseDraft) -> Result<(), CoursePersistenceError>;

    /// Remove a course with its lectures, reviews and enrollments.
    ///
    /// Returns `false` when the course did not exist.
    async fn delete(&self, id: &CourseId) -> Result<bool, CoursePersistenceError>;

    /// Fetch a course by identifier.
    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, CoursePersistenceError>;

    /// All published courses.
    async fn list_published(&self) -> Result<Vec<Course>, CoursePersistenceError>;

    /// Courses authored by `creator`, published or not.
    async fn list_by_creator(&self, creator: &UserId)
    -> Result<Vec<Course>, CoursePersistenceError>;
}
