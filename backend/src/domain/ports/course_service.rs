//! Driving port for course authoring and browsing.

use async_trait::async_trait;

use crate::domain::{
    Category, Course, CourseId, CourseListing, CoursePatch, CourseTitle, Error, PublicProfile,
    RatingSummary, UserId,
};

/// Course with creator profile and rating summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDetail {
    /// The course.
    pub course: Course,
    /// Creator profile, absent if the account no longer exists.
    pub creator: Option<PublicProfile>,
    /// Review count and average.
    pub rating: RatingSummary,
}

/// Course use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseService: Send + Sync {
    /// Create an unpublished course owned by `actor`, who must be an educator.
    async fn create(
        &self,
        actor: &UserId,
        title: CourseTitle,
        category: Category,
    ) -> Result<Course, Error>;

    /// Edit a course. Only its creator may do so.
    async fn edit(
        &self,
        actor: &UserId,
        course_id: &CourseId,
        patch: CoursePatch,
    ) -> Result<Course, Error>;

    /// Delete a course with its lectures, reviews and enrollments.
    async fn delete(&self, actor: &UserId, course_id: &CourseId) -> Result<Course, Error>;

    /// Published courses with ratings.
    async fn list_public(&self) -> Result<Vec<CourseListing>, Error>;

    /// Courses created by `actor`.
    async fn list_for_educator(&self, actor: &UserId) -> Result<Vec<Course>, Error>;

    /// Published courses matching a keyword.
    async fn search(&self, query: &str) -> Result<Vec<CourseListing>, Error>;

    /// A single course with its creator and rating.
    async fn get(&self, course_id: &CourseId) -> Result<CourseDetail, Error>;
}
