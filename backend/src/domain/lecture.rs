//! Lectures belonging to a course.

use super::{CourseId, LectureId};

/// Validation errors raised while building lecture values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LectureValidationError {
    /// Title was blank once trimmed.
    #[error("lecture title must not be empty")]
    EmptyTitle,
    /// An edit carried no fields.
    #[error("at least one field must be provided")]
    EmptyPatch,
}

/// Trimmed, non-empty lecture title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LectureTitle(String);

impl LectureTitle {
    /// Validate and construct a title.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, LectureValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(LectureValidationError::EmptyTitle);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for LectureTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A single lecture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lecture {
    /// Identifier.
    pub id: LectureId,
    /// Owning course.
    pub course_id: CourseId,
    /// Title.
    pub title: LectureTitle,
    /// Hosted video URL, if uploaded.
    pub video_url: Option<String>,
    /// Whether non-enrolled users may watch it.
    pub is_preview_free: bool,
}

impl Lecture {
    /// A new lecture with no video that is not a free preview.
    #[must_use]
    pub fn new(course_id: CourseId, title: LectureTitle) -> Self {
        Self {
            id: LectureId::random(),
            course_id,
            title,
            video_url: None,
            is_preview_free: false,
        }
    }

    /// Copy with the video URL removed, for viewers without access.
    #[must_use]
    pub fn redacted(mut self) -> Self {
        self.video_url = None;
        self
    }
}

/// Partial lecture edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LecturePatch {
    /// Replacement title.
    pub title: Option<LectureTitle>,
    /// Replacement video URL.
    pub video_url: Option<String>,
    /// Replacement preview flag.
    pub is_preview_free: Option<bool>,
}

impl LecturePatch {
    /// Whether the patch carries no changes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.video_url.is_none() && self.is_preview_free.is_none()
    }

    /// Apply the patch to a lecture.
    pub fn apply_to(self, lecture: &mut Lecture) {
        if let Some(title) = self.title {
            lecture.title = title;
        }
        if self.video_url.is_some() {
            lecture.video_url = self.video_url;
        }
        if let Some(flag) = self.is_preview_free {
            lecture.is_preview_free = flag;
        }
    }
}
