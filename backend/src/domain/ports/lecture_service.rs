//! Driving port for lecture authoring and gated viewing.

use async_trait::async_trait;

use crate::domain::{CourseId, Error, Lecture, LectureId, LecturePatch, LectureTitle, UserId};

/// Lecture use-cases.
///
/// Reads re-check enrollment on every call; the client-side check is only a
/// convenience.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LectureService: Send + Sync {
    /// Append a lecture to a course the educator created.
    async fn create(
        &self,
        actor: &UserId,
        course_id: &CourseId,
        title: LectureTitle,
    ) -> Result<Lecture, Error>;

    /// Edit a lecture of a course the educator created.
    async fn edit(
        &self,
        actor: &UserId,
        lecture_id: &LectureId,
        patch: LecturePatch,
    ) -> Result<Lecture, Error>;

    /// Delete a lecture of a course the educator created.
    async fn delete(&self, actor: &UserId, lecture_id: &LectureId) -> Result<Lecture, Error>;

    /// Lectures of a course in order. Videos the viewer may not watch are
    /// redacted.
    async fn list_for_course(
        &self,
        viewer: &UserId,
        course_id: &CourseId,
    ) -> Result<Vec<Lecture>, Error>;

    /// A single lecture. Forbidden when the viewer may not watch it.
    async fn get(&self, viewer: &UserId, lecture_id: &LectureId) -> Result<Lecture, Error>;
}
