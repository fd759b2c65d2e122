//! Course aggregate and its value types.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{CourseId, LectureId, RatingSummary, ReviewId, UserId};

/// Minimum course title length.
pub const TITLE_MIN: usize = 3;
/// Maximum course title length.
pub const TITLE_MAX: usize = 100;

/// Validation errors raised while building course values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CourseValidationError {
    /// Title length fell outside the accepted range once trimmed.
    #[error("title must be between {min} and {max} characters")]
    TitleLength {
        /// Lower bound.
        min: usize,
        /// Upper bound.
        max: usize,
    },
    /// Category was blank.
    #[error("category must not be empty")]
    EmptyCategory,
    /// Level was not one of the known levels.
    #[error("level must be Beginner, Intermediate or Advanced")]
    UnknownLevel,
    /// An edit carried no fields.
    #[error("at least one field must be provided")]
    EmptyPatch,
}

/// Trimmed course title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseTitle(String);

impl CourseTitle {
    /// Validate and construct a title.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CourseValidationError> {
        let trimmed = raw.as_ref().trim();
        let length = trimmed.chars().count();
        if !(TITLE_MIN..=TITLE_MAX).contains(&length) {
            return Err(CourseValidationError::TitleLength {
                min: TITLE_MIN,
                max: TITLE_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for CourseTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<CourseTitle> for String {
    fn from(value: CourseTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for CourseTitle {
    type Error = CourseValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Free-text category, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Validate and construct a category.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CourseValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CourseValidationError::EmptyCategory);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.0
    }
}

impl TryFrom<String> for Category {
    type Error = CourseValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseLevel {
    /// No prior knowledge assumed.
    Beginner,
    /// Some prior knowledge assumed.
    Intermediate,
    /// Substantial prior knowledge assumed.
    Advanced,
}

impl CourseLevel {
    /// Storage and wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CourseLevel {
    type Err = CourseValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(CourseValidationError::UnknownLevel),
        }
    }
}

/// Course price in whole currency units (rupees).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u32);

/// Minor units per whole currency unit (paisa per rupee).
pub const MINOR_UNITS_PER_UNIT: u64 = 100;

impl Price {
    /// Wrap a whole-unit price.
    #[must_use]
    pub const fn new(units: u32) -> Self {
        Self(units)
    }

    /// Whole currency units.
    #[must_use]
    pub const fn units(self) -> u32 {
        self.0
    }

    /// Amount in the gateway's minor unit.
    ///
    /// # Examples
    /// ```
    /// use coursehub::domain::Price;
    ///
    /// assert_eq!(Price::new(499).to_minor_units(), 49_900);
    /// ```
    #[must_use]
    pub const fn to_minor_units(self) -> u64 {
        // u32::MAX * 100 fits comfortably in u64.
        self.0 as u64 * MINOR_UNITS_PER_UNIT
    }
}

/// Course aggregate as read from storage.
///
/// `enrolled_students` and `reviews` are derived from their own relations;
/// `lectures` keeps creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    title: CourseTitle,
    subtitle: Option<String>,
    description: Option<String>,
    category: Category,
    level: Option<CourseLevel>,
    price: Option<Price>,
    thumbnail: Option<String>,
    is_published: bool,
    creator: UserId,
    enrolled_students: BTreeSet<UserId>,
    lectures: Vec<LectureId>,
    reviews: BTreeSet<ReviewId>,
}

/// Scalar course fields used to build or persist a [`Course`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDraft {
    /// Identifier.
    pub id: CourseId,
    /// Title.
    pub title: CourseTitle,
    /// Optional subtitle.
    pub subtitle: Option<String>,
    /// Optional long description.
    pub description: Option<String>,
    /// Category.
    pub category: Category,
    /// Optional level.
    pub level: Option<CourseLevel>,
    /// Optional price.
    pub price: Option<Price>,
    /// Optional thumbnail URL.
    pub thumbnail: Option<String>,
    /// Whether the course is listed publicly.
    pub is_published: bool,
    /// Authoring educator.
    pub creator: UserId,
}

impl CourseDraft {
    /// Draft for a freshly created, unpublished course.
    #[must_use]
    pub fn new_unpublished(title: CourseTitle, category: Category, creator: UserId) -> Self {
        Self {
            id: CourseId::random(),
            title,
            subtitle: None,
            description: None,
            category,
            level: None,
            price: None,
            thumbnail: None,
            is_published: false,
            creator,
        }
    }
}

/// Partial course edit. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoursePatch {
    /// Replacement title.
    pub title: Option<CourseTitle>,
    /// Replacement subtitle.
    pub subtitle: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement category.
    pub category: Option<Category>,
    /// Replacement level.
    pub level: Option<CourseLevel>,
    /// Replacement price.
    pub price: Option<Price>,
    /// Replacement thumbnail URL.
    pub thumbnail: Option<String>,
    /// Replacement publish flag.
    pub is_published: Option<bool>,
}

impl CoursePatch {
    /// Whether the patch carries no changes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.subtitle.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.level.is_none()
            && self.price.is_none()
            && self.thumbnail.is_none()
            && self.is_published.is_none()
    }

    /// Apply the patch to a draft.
    pub fn apply_to(self, draft: &mut CourseDraft) {
        let Self {
            title,
            subtitle,
            description,
            category,
            level,
            price,
            thumbnail,
            is_published,
        } = self;
        if let Some(title) = title {
            draft.title = title;
        }
        if subtitle.is_some() {
            draft.subtitle = subtitle;
        }
        if description.is_some() {
            draft.description = description;
        }
        if let Some(category) = category {
            draft.category = category;
        }
        if level.is_some() {
            draft.level = level;
        }
        if price.is_some() {
            draft.price = price;
        }
        if thumbnail.is_some() {
            draft.thumbnail = thumbnail;
        }
        if let Some(is_published) = is_published {
            draft.is_published = is_published;
        }
    }
}

impl Course {
    /// Build a course with empty relations.
    #[must_use]
    pub fn new(draft: CourseDraft) -> Self {
        let CourseDraft {
            id,
            title,
            subtitle,
            description,
            category,
            level,
            price,
            thumbnail,
            is_published,
            creator,
        } = draft;
        Self {
            id,
            title,
            subtitle,
            description,
            category,
            level,
            price,
            thumbnail,
            is_published,
            creator,
            enrolled_students: BTreeSet::new(),
            lectures: Vec::new(),
            reviews: BTreeSet::new(),
        }
    }

    /// Attach relation data loaded from storage.
    #[must_use]
    pub fn with_relations(
        mut self,
        enrolled_students: impl IntoIterator<Item = UserId>,
        lectures: Vec<LectureId>,
        reviews: impl IntoIterator<Item = ReviewId>,
    ) -> Self {
        self.enrolled_students = enrolled_students.into_iter().collect();
        self.lectures = lectures;
        self.reviews = reviews.into_iter().collect();
        self
    }

    /// Scalar fields as a draft, for edits.
    #[must_use]
    pub fn to_draft(&self) -> CourseDraft {
        CourseDraft {
            id: self.id.clone(),
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            level: self.level,
            price: self.price,
            thumbnail: self.thumbnail.clone(),
            is_published: self.is_published,
            creator: self.creator.clone(),
        }
    }

    /// Case-insensitive keyword match over the searchable text fields.
    #[must_use]
    pub fn matches_keyword(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        let level = self.level.map(CourseLevel::as_str);
        [
            Some(self.title.as_ref()),
            self.subtitle.as_deref(),
            self.description.as_deref(),
            Some(self.category.as_ref()),
            level,
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Identifier.
    #[must_use]
    pub const fn id(&self) -> &CourseId {
        &self.id
    }

    /// Title.
    #[must_use]
    pub const fn title(&self) -> &CourseTitle {
        &self.title
    }

    /// Subtitle.
    #[must_use]
    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    /// Long description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Category.
    #[must_use]
    pub const fn category(&self) -> &Category {
        &self.category
    }

    /// Level.
    #[must_use]
    pub const fn level(&self) -> Option<CourseLevel> {
        self.level
    }

    /// Price.
    #[must_use]
    pub const fn price(&self) -> Option<Price> {
        self.price
    }

    /// Thumbnail URL.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.thumbnail.as_deref()
    }

    /// Whether the course is publicly listed.
    #[must_use]
    pub const fn is_published(&self) -> bool {
        self.is_published
    }

    /// Authoring educator.
    #[must_use]
    pub const fn creator(&self) -> &UserId {
        &self.creator
    }

    /// Students holding an enrollment.
    #[must_use]
    pub const fn enrolled_students(&self) -> &BTreeSet<UserId> {
        &self.enrolled_students
    }

    /// Lectures in creation order.
    #[must_use]
    pub fn lectures(&self) -> &[LectureId] {
        &self.lectures
    }

    /// Reviews linked to the course.
    #[must_use]
    pub const fn reviews(&self) -> &BTreeSet<ReviewId> {
        &self.reviews
    }
}

/// Course paired with its rating summary, as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseListing {
    /// The course.
    pub course: Course,
    /// Review count and average.
    pub rating: RatingSummary,
}
