//! In-process store implementing every repository port.
//!
//! Used when no database URL is configured and by handler tests. All tables
//! live behind one lock, so multi-table writes such as course deletion or
//! enrollment are atomic with respect to other requests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{
    CoursePersistenceError, CourseRepository, EnrollmentPersistenceError, EnrollmentRepository,
    LecturePersistenceError, LectureRepository, ReviewPersistenceError, ReviewRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Course, CourseDraft, CourseId, Email, Enrollment, Lecture, LectureId, PasswordHash,
    PasswordReset, PublicProfile, RatingSummary, Review, ReviewWithUser, User, UserId,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    courses: HashMap<CourseId, CourseDraft>,
    lectures: Vec<Lecture>,
    reviews: Vec<Review>,
    enrollments: BTreeMap<(UserId, CourseId), Enrollment>,
}

impl Tables {
    fn hydrate_user(&self, user: &User) -> User {
        let courses = self
            .enrollments
            .keys()
            .filter(|(user_id, _)| user_id == user.id())
            .map(|(_, course_id)| course_id.clone());
        user.clone().with_enrollments(courses)
    }

    fn hydrate_course(&self, draft: &CourseDraft) -> Course {
        let students = self
            .enrollments
            .keys()
            .filter(|(_, course_id)| *course_id == draft.id)
            .map(|(user_id, _)| user_id.clone());
        let lectures = self
            .lectures
            .iter()
            .filter(|lecture| lecture.course_id == draft.id)
            .map(|lecture| lecture.id.clone())
            .collect();
        let reviews = self
            .reviews
            .iter()
            .filter(|review| review.course_id == draft.id)
            .map(|review| review.id.clone());
        Course::new(draft.clone()).with_relations(students, lectures, reviews)
    }

    fn courses_where(&self, keep: impl Fn(&CourseDraft) -> bool) -> Vec<Course> {
        let mut drafts: Vec<&CourseDraft> = self.courses.values().filter(|d| keep(d)).collect();
        drafts.sort_by(|a, b| a.title.as_ref().cmp(b.title.as_ref()).then(a.id.cmp(&b.id)));
        drafts
            .into_iter()
            .map(|draft| self.hydrate_course(draft))
            .collect()
    }
}

/// Shared in-memory tables. Cloning shares the same data.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|existing| existing.email() == user.email())
        {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        tables
            .users
            .insert(user.id().clone(), user.clone().with_enrollments([]));
        Ok(())
    }

    async fn update_profile(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables.users.get_mut(user.id()) else {
            return Err(UserPersistenceError::query("user not found"));
        };
        let reset = stored.password_reset().cloned();
        *stored = user.clone().with_enrollments([]).with_password_reset(reset);
        Ok(())
    }

    async fn save_password_reset(
        &self,
        id: &UserId,
        reset: Option<PasswordReset>,
    ) -> Result<(), UserPersistenceError> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables.users.remove(id) else {
            return Err(UserPersistenceError::query("user not found"));
        };
        tables
            .users
            .insert(id.clone(), stored.with_password_reset(reset));
        Ok(())
    }

    async fn replace_password(
        &self,
        id: &UserId,
        hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables.users.remove(id) else {
            return Err(UserPersistenceError::query("user not found"));
        };
        let updated = stored
            .with_password_hash(hash.clone())
            .with_password_reset(None);
        tables.users.insert(id.clone(), updated);
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(id).map(|user| tables.hydrate_user(user)))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.email() == email)
            .map(|user| tables.hydrate_user(user)))
    }
}

#[async_trait]
impl CourseRepository for InMemoryStore {
    async fn insert(&self, draft: &CourseDraft) -> Result<(), CoursePersistenceError> {
        let mut tables = self.tables.write().await;
        tables.courses.insert(draft.id.clone(), draft.clone());
        Ok(())
    }

    async fn update(&self, draft: &CourseDraft) -> Result<(), CoursePersistenceError> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables.courses.get_mut(&draft.id) else {
            return Err(CoursePersistenceError::query("course not found"));
        };
        *stored = draft.clone();
        Ok(())
    }

    async fn delete(&self, id: &CourseId) -> Result<bool, CoursePersistenceError> {
        let mut tables = self.tables.write().await;
        if tables.courses.remove(id).is_none() {
            return Ok(false);
        }
        tables.lectures.retain(|lecture| &lecture.course_id != id);
        tables.reviews.retain(|review| &review.course_id != id);
        tables
            .enrollments
            .retain(|(_, course_id), _| course_id != id);
        Ok(true)
    }

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, CoursePersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables
            .courses
            .get(id)
            .map(|draft| tables.hydrate_course(draft)))
    }

    async fn list_published(&self) -> Result<Vec<Course>, CoursePersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables.courses_where(|draft| draft.is_published))
    }

    async fn list_by_creator(
        &self,
        creator: &UserId,
    ) -> Result<Vec<Course>, CoursePersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables.courses_where(|draft| &draft.creator == creator))
    }
}

#[async_trait]
impl LectureRepository for InMemoryStore {
    async fn insert(&self, lecture: &Lecture) -> Result<(), LecturePersistenceError> {
        let mut tables = self.tables.write().await;
        if !tables.courses.contains_key(&lecture.course_id) {
            return Err(LecturePersistenceError::query("course not found"));
        }
        tables.lectures.push(lecture.clone());
        Ok(())
    }

    async fn update(&self, lecture: &Lecture) -> Result<(), LecturePersistenceError> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables
            .lectures
            .iter_mut()
            .find(|stored| stored.id == lecture.id)
        else {
            return Err(LecturePersistenceError::query("lecture not found"));
        };
        *stored = lecture.clone();
        Ok(())
    }

    async fn delete(&self, id: &LectureId) -> Result<bool, LecturePersistenceError> {
        let mut tables = self.tables.write().await;
        let before = tables.lectures.len();
        tables.lectures.retain(|lecture| &lecture.id != id);
        Ok(tables.lectures.len() != before)
    }

    async fn find_by_id(&self, id: &LectureId) -> Result<Option<Lecture>, LecturePersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables
            .lectures
            .iter()
            .find(|lecture| &lecture.id == id)
            .cloned())
    }

    async fn list_for_course(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<Lecture>, LecturePersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables
            .lectures
            .iter()
            .filter(|lecture| &lecture.course_id == course_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError> {
        let mut tables = self.tables.write().await;
        if !tables.courses.contains_key(&review.course_id) {
            return Err(ReviewPersistenceError::query("course not found"));
        }
        if tables
            .reviews
            .iter()
            .any(|r| r.course_id == review.course_id && r.user_id == review.user_id)
        {
            return Err(ReviewPersistenceError::duplicate());
        }
        tables.reviews.push(review.clone());
        Ok(())
    }

    async fn list_with_users(&self) -> Result<Vec<ReviewWithUser>, ReviewPersistenceError> {
        let tables = self.tables.read().await;
        let mut reviews: Vec<ReviewWithUser> = tables
            .reviews
            .iter()
            .map(|review| ReviewWithUser {
                review: review.clone(),
                reviewer: tables.users.get(&review.user_id).map(PublicProfile::from),
            })
            .collect();
        reviews.sort_by(|a, b| b.review.reviewed_at.cmp(&a.review.reviewed_at));
        Ok(reviews)
    }

    async fn summaries_for(
        &self,
        course_ids: &[CourseId],
    ) -> Result<HashMap<CourseId, RatingSummary>, ReviewPersistenceError> {
        let tables = self.tables.read().await;
        Ok(course_ids
            .iter()
            .map(|course_id| {
                let summary = RatingSummary::from_ratings(
                    tables
                        .reviews
                        .iter()
                        .filter(|review| &review.course_id == course_id)
                        .map(|review| review.rating),
                );
                (course_id.clone(), summary)
            })
            .collect())
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryStore {
    async fn enroll(&self, enrollment: &Enrollment) -> Result<bool, EnrollmentPersistenceError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&enrollment.user_id) {
            return Err(EnrollmentPersistenceError::query("user not found"));
        }
        if !tables.courses.contains_key(&enrollment.course_id) {
            return Err(EnrollmentPersistenceError::query("course not found"));
        }
        let key = (enrollment.user_id.clone(), enrollment.course_id.clone());
        if tables.enrollments.contains_key(&key) {
            return Ok(false);
        }
        tables.enrollments.insert(key, enrollment.clone());
        Ok(true)
    }
}

#[cfg(test)]
mod tests;
