//! Enrollment records and the lecture access gate.
//!
//! A user's enrolled courses and a course's enrolled students are two views
//! of the same relation. Adapters store one record per `(user, course)` pair
//! and derive both sides from it.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::{CourseId, Lecture, UserId};

/// One paid enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    /// Enrolled student.
    pub user_id: UserId,
    /// Purchased course.
    pub course_id: CourseId,
    /// Gateway order that settled the purchase.
    pub gateway_order_id: String,
    /// When the enrollment was committed.
    pub enrolled_at: DateTime<Utc>,
}

/// Whether `course_id` is among the user's enrolled courses.
///
/// # Examples
/// ```
/// use std::collections::BTreeSet;
/// use coursehub::domain::{CourseId, is_enrolled};
///
/// let course = CourseId::random();
/// let enrolled = BTreeSet::from([course.clone()]);
/// assert!(is_enrolled(&enrolled, &course));
/// assert!(!is_enrolled(&BTreeSet::new(), &course));
/// ```
#[must_use]
pub fn is_enrolled(enrolled_courses: &BTreeSet<CourseId>, course_id: &CourseId) -> bool {
    enrolled_courses.contains(course_id)
}

/// Who is asking to see a lecture, relative to its course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer<'a> {
    /// Requesting user.
    pub user_id: &'a UserId,
    /// Courses the user is enrolled in.
    pub enrolled_courses: &'a BTreeSet<CourseId>,
    /// Creator of the lecture's course.
    pub course_creator: &'a UserId,
}

/// Whether the viewer may see the lecture's video.
///
/// Enrolled students, the course creator and anyone for free previews.
#[must_use]
pub fn may_view_lecture(viewer: Viewer<'_>, lecture: &Lecture) -> bool {
    lecture.is_preview_free
        || viewer.user_id == viewer.course_creator
        || is_enrolled(viewer.enrolled_courses, &lecture.course_id)
}
