//! Port abstraction for lecture persistence.
use async_trait::async_trait;

use crate::domain::{CourseId, Lecture, LectureId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by lecture repository adapters.
    pub enum LecturePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "lecture repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "lecture repository query failed: {message}",
    }
}

/// Storage for lectures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LectureRepository: Send + Sync {
    /// Append a lecture to the end of its course's lecture list.
    async fn insert(&self, lecture: &Lecture) -> Result<(), LecturePersistenceError>;

    /// Overwrite an existing lecture.
    async fn update(&self, lecture: &Lecture) -> Result<(), LecturePersistenceError>;

    /// Remove a lecture and its course link. Returns `false` when absent.
    async fn delete(&self, id: &LectureId) -> Result<bool, LecturePersistenceError>;

    /// Fetch a lecture by identifier.
    async fn find_by_id(&self, id: &LectureId) -> Result<Option<Lecture>, LecturePersistenceError>;

    /// Lectures of a course in creation order.
    async fn list_for_course(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<Lecture>, LecturePersistenceError>;
}
