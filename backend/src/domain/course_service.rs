//! Course domain service.
//!
//! Authoring operations check the caller's role and ownership; every write
//! that changes the public list invalidates the [`CatalogueCache`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    CourseDetail, CourseRepository, CourseService, ReviewRepository, UserRepository,
};
use crate::domain::service_support::{
    load_course, map_course_error, map_review_error, map_user_error, require_creator,
    require_educator,
};
use crate::domain::{
    CatalogueCache, Category, Course, CourseDraft, CourseId, CourseListing, CoursePatch,
    CourseTitle, Error, PublicProfile, RatingSummary, UserId,
};

/// Course service implementing the [`CourseService`] driving port.
#[derive(Clone)]
pub struct CourseServiceImpl<U, C, R> {
    users: Arc<U>,
    courses: Arc<C>,
    reviews: Arc<R>,
    catalogue: Arc<CatalogueCache>,
}

impl<U, C, R> CourseServiceImpl<U, C, R> {
    /// Create a new service.
    pub fn new(
        users: Arc<U>,
        courses: Arc<C>,
        reviews: Arc<R>,
        catalogue: Arc<CatalogueCache>,
    ) -> Self {
        Self {
            users,
            courses,
            reviews,
            catalogue,
        }
    }
}

impl<U, C, R> CourseServiceImpl<U, C, R>
where
    U: UserRepository,
    C: CourseRepository,
    R: ReviewRepository,
{
    async fn with_ratings(&self, courses: Vec<Course>) -> Result<Vec<CourseListing>, Error> {
        let ids: Vec<CourseId> = courses.iter().map(|course| course.id().clone()).collect();
        let mut summaries: HashMap<CourseId, RatingSummary> = self
            .reviews
            .summaries_for(&ids)
            .await
            .map_err(map_review_error)?;
        Ok(courses
            .into_iter()
            .map(|course| {
                let rating = summaries.remove(course.id()).unwrap_or_default();
                CourseListing { course, rating }
            })
            .collect())
    }

    async fn published_listings(&self) -> Result<Vec<CourseListing>, Error> {
        let courses = self
            .courses
            .list_published()
            .await
            .map_err(map_course_error)?;
        self.with_ratings(courses).await
    }

    async fn owned_course(&self, actor: &UserId, course_id: &CourseId) -> Result<Course, Error> {
        require_educator(self.users.as_ref(), actor).await?;
        let course = load_course(self.courses.as_ref(), course_id).await?;
        require_creator(&course, actor)?;
        Ok(course)
    }
}

#[async_trait]
impl<U, C, R> CourseService for CourseServiceImpl<U, C, R>
where
    U: UserRepository,
    C: CourseRepository,
    R: ReviewRepository,
{
    async fn create(
        &self,
        actor: &UserId,
        title: CourseTitle,
        category: Category,
    ) -> Result<Course, Error> {
        require_educator(self.users.as_ref(), actor).await?;
        let draft = CourseDraft::new_unpublished(title, category, actor.clone());
        self.courses
            .insert(&draft)
            .await
            .map_err(map_course_error)?;
        self.catalogue.invalidate();
        info!(course_id = %draft.id, creator = %actor, "course created");
        Ok(Course::new(draft))
    }

    async fn edit(
        &self,
        actor: &UserId,
        course_id: &CourseId,
        patch: CoursePatch,
    ) -> Result<Course, Error> {
        if patch.is_empty() {
            return Err(Error::invalid_request("at least one field must be provided"));
        }
        let course = self.owned_course(actor, course_id).await?;
        let mut draft = course.to_draft();
        patch.apply_to(&mut draft);
        self.courses
            .update(&draft)
            .await
            .map_err(map_course_error)?;
        self.catalogue.invalidate();
        load_course(self.courses.as_ref(), course_id).await
    }

    async fn delete(&self, actor: &UserId, course_id: &CourseId) -> Result<Course, Error> {
        let course = self.owned_course(actor, course_id).await?;
        let removed = self
            .courses
            .delete(course_id)
            .await
            .map_err(map_course_error)?;
        if !removed {
            return Err(Error::not_found("Course not found"));
        }
        self.catalogue.invalidate();
        info!(course_id = %course_id, "course deleted");
        Ok(course)
    }

    async fn list_public(&self) -> Result<Vec<CourseListing>, Error> {
        let listings = self
            .catalogue
            .get_or_load(|| self.published_listings())
            .await?;
        Ok(listings.as_ref().clone())
    }

    async fn list_for_educator(&self, actor: &UserId) -> Result<Vec<Course>, Error> {
        self.courses
            .list_by_creator(actor)
            .await
            .map_err(map_course_error)
    }

    async fn search(&self, query: &str) -> Result<Vec<CourseListing>, Error> {
        if query.trim().is_empty() {
            return Err(Error::invalid_request("search query is required"));
        }
        let matches = self
            .courses
            .list_published()
            .await
            .map_err(map_course_error)?
            .into_iter()
            .filter(|course| course.matches_keyword(query))
            .collect();
        self.with_ratings(matches).await
    }

    async fn get(&self, course_id: &CourseId) -> Result<CourseDetail, Error> {
        let course = load_course(self.courses.as_ref(), course_id).await?;
        let creator = self
            .users
            .find_by_id(course.creator())
            .await
            .map_err(map_user_error)?
            .as_ref()
            .map(PublicProfile::from);
        let rating = self
            .reviews
            .summaries_for(std::slice::from_ref(course.id()))
            .await
            .map_err(map_review_error)?
            .remove(course.id())
            .unwrap_or_default();
        Ok(CourseDetail {
            course,
            creator,
            rating,
        })
    }
}

#[cfg(test)]
#[path = "course_service_tests.rs"]
mod tests;
