//! Lecture domain service.
//!
//! Reads run the enrollment gate server-side: listings redact videos the
//! viewer may not watch and single-lecture reads refuse them outright.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{CourseRepository, LectureRepository, LectureService, UserRepository};
use crate::domain::service_support::{
    load_course, load_user, map_lecture_error, require_creator, require_educator,
};
use crate::domain::{
    CatalogueCache, Course, CourseId, Error, Lecture, LectureId, LecturePatch, LectureTitle,
    UserId, Viewer, may_view_lecture,
};

/// Lecture service implementing the [`LectureService`] driving port.
#[derive(Clone)]
pub struct LectureServiceImpl<U, C, L> {
    users: Arc<U>,
    courses: Arc<C>,
    lectures: Arc<L>,
    catalogue: Arc<CatalogueCache>,
}

impl<U, C, L> LectureServiceImpl<U, C, L> {
    /// Create a new service.
    pub fn new(
        users: Arc<U>,
        courses: Arc<C>,
        lectures: Arc<L>,
        catalogue: Arc<CatalogueCache>,
    ) -> Self {
        Self {
            users,
            courses,
            lectures,
            catalogue,
        }
    }
}

impl<U, C, L> LectureServiceImpl<U, C, L>
where
    U: UserRepository,
    C: CourseRepository,
    L: LectureRepository,
{
    async fn load_lecture(&self, id: &LectureId) -> Result<Lecture, Error> {
        self.lectures
            .find_by_id(id)
            .await
            .map_err(map_lecture_error)?
            .ok_or_else(|| Error::not_found("Lecture not found"))
    }

    /// Load a lecture the educator may modify, along with its course.
    async fn owned_lecture(
        &self,
        actor: &UserId,
        lecture_id: &LectureId,
    ) -> Result<(Lecture, Course), Error> {
        require_educator(self.users.as_ref(), actor).await?;
        let lecture = self.load_lecture(lecture_id).await?;
        let course = load_course(self.courses.as_ref(), &lecture.course_id).await?;
        require_creator(&course, actor)?;
        Ok((lecture, course))
    }
}

#[async_trait]
impl<U, C, L> LectureService for LectureServiceImpl<U, C, L>
where
    U: UserRepository,
    C: CourseRepository,
    L: LectureRepository,
{
    async fn create(
        &self,
        actor: &UserId,
        course_id: &CourseId,
        title: LectureTitle,
    ) -> Result<Lecture, Error> {
        require_educator(self.users.as_ref(), actor).await?;
        let course = load_course(self.courses.as_ref(), course_id).await?;
        require_creator(&course, actor)?;

        let lecture = Lecture::new(course_id.clone(), title);
        self.lectures
            .insert(&lecture)
            .await
            .map_err(map_lecture_error)?;
        self.catalogue.invalidate();
        info!(lecture_id = %lecture.id, course_id = %course_id, "lecture created");
        Ok(lecture)
    }

    async fn edit(
        &self,
        actor: &UserId,
        lecture_id: &LectureId,
        patch: LecturePatch,
    ) -> Result<Lecture, Error> {
        if patch.is_empty() {
            return Err(Error::invalid_request(
                "lectureTitle, isPreviewFree or videoUrl is required",
            ));
        }
        let (mut lecture, _) = self.owned_lecture(actor, lecture_id).await?;
        patch.apply_to(&mut lecture);
        self.lectures
            .update(&lecture)
            .await
            .map_err(map_lecture_error)?;
        Ok(lecture)
    }

    async fn delete(&self, actor: &UserId, lecture_id: &LectureId) -> Result<Lecture, Error> {
        let (lecture, _) = self.owned_lecture(actor, lecture_id).await?;
        let removed = self
            .lectures
            .delete(lecture_id)
            .await
            .map_err(map_lecture_error)?;
        if !removed {
            return Err(Error::not_found("Lecture not found"));
        }
        self.catalogue.invalidate();
        info!(lecture_id = %lecture_id, "lecture deleted");
        Ok(lecture)
    }

    async fn list_for_course(
        &self,
        viewer: &UserId,
        course_id: &CourseId,
    ) -> Result<Vec<Lecture>, Error> {
        let user = load_user(self.users.as_ref(), viewer).await?;
        let course = load_course(self.courses.as_ref(), course_id).await?;
        let lectures = self
            .lectures
            .list_for_course(course_id)
            .await
            .map_err(map_lecture_error)?;

        let gate = Viewer {
            user_id: user.id(),
            enrolled_courses: user.enroll_courses(),
            course_creator: course.creator(),
        };
        Ok(lectures
            .into_iter()
            .map(|lecture| {
                if may_view_lecture(gate, &lecture) {
                    lecture
                } else {
                    lecture.redacted()
                }
            })
            .collect())
    }

    async fn get(&self, viewer: &UserId, lecture_id: &LectureId) -> Result<Lecture, Error> {
        let user = load_user(self.users.as_ref(), viewer).await?;
        let lecture = self.load_lecture(lecture_id).await?;
        let course = load_course(self.courses.as_ref(), &lecture.course_id).await?;

        let gate = Viewer {
            user_id: user.id(),
            enrolled_courses: user.enroll_courses(),
            course_creator: course.creator(),
        };
        if !may_view_lecture(gate, &lecture) {
            debug!(user_id = %viewer, lecture_id = %lecture_id, "lecture access denied");
            return Err(Error::forbidden("enroll in this course to watch the lecture"));
        }
        Ok(lecture)
    }
}

#[cfg(test)]
#[path = "lecture_service_tests.rs"]
mod tests;
