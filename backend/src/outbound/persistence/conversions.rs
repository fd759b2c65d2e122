//! Row to domain conversions shared by the Diesel repositories.
//!
//! Rows are re-validated on the way out; a failure means the table holds data
//! the domain would never have written, reported as a query error by callers.

use std::fmt::Display;
use std::str::FromStr;

use uuid::Uuid;

use crate::domain::{
    Category, Course, CourseDraft, CourseId, CourseLevel, CourseTitle, Email, Lecture, LectureId,
    LectureTitle, PasswordHash, PasswordReset, Price, Rating, Review, ReviewId, Role, User,
    UserDraft, UserId, UserName,
};

use super::models::{
    CourseRow, CourseValues, LectureRow, PasswordResetColumns, ReviewRow, UserRow,
};

fn corrupted(table: &str, id: Uuid, err: impl Display) -> String {
    format!("corrupted {table} row {id}: {err}")
}

/// Convert a user row, attaching the enrollment set read alongside it.
pub(crate) fn user_from_row(
    row: UserRow,
    enrolled: impl IntoIterator<Item = Uuid>,
) -> Result<User, String> {
    let id = row.id;
    let reset = match (row.reset_verified, row.reset_code_digest, row.reset_expires_at) {
        (true, _, _) => Some(PasswordReset::Verified),
        (false, Some(code_digest), Some(expires_at)) => Some(PasswordReset::Pending {
            code_digest,
            expires_at,
        }),
        (false, None, None) => None,
        (false, _, _) => return Err(corrupted("users", id, "incomplete password reset")),
    };
    let draft = UserDraft {
        id: UserId::from_uuid(id),
        name: UserName::new(&row.name).map_err(|err| corrupted("users", id, err))?,
        email: Email::new(&row.email).map_err(|err| corrupted("users", id, err))?,
        password_hash: row.password_hash.map(PasswordHash::new),
        role: Role::from_str(&row.role).map_err(|err| corrupted("users", id, err))?,
        photo_url: row.photo_url,
        description: row.description,
    };
    Ok(User::new(draft)
        .with_enrollments(enrolled.into_iter().map(CourseId::from_uuid))
        .with_password_reset(reset))
}

/// Column values storing `reset`.
pub(crate) fn reset_columns(reset: Option<&PasswordReset>) -> PasswordResetColumns<'_> {
    match reset {
        None => PasswordResetColumns::cleared(),
        Some(PasswordReset::Verified) => PasswordResetColumns {
            reset_verified: true,
            ..PasswordResetColumns::cleared()
        },
        Some(PasswordReset::Pending {
            code_digest,
            expires_at,
        }) => PasswordResetColumns {
            reset_code_digest: Some(code_digest),
            reset_expires_at: Some(*expires_at),
            reset_verified: false,
        },
    }
}

/// Convert a course row into its scalar draft.
pub(crate) fn draft_from_row(row: CourseRow) -> Result<CourseDraft, String> {
    let id = row.id;
    let level = row
        .level
        .as_deref()
        .map(CourseLevel::from_str)
        .transpose()
        .map_err(|err| corrupted("courses", id, err))?;
    let price = row
        .price
        .map(u32::try_from)
        .transpose()
        .map_err(|err| corrupted("courses", id, err))?
        .map(Price::new);
    Ok(CourseDraft {
        id: CourseId::from_uuid(id),
        title: CourseTitle::new(&row.title).map_err(|err| corrupted("courses", id, err))?,
        subtitle: row.subtitle,
        description: row.description,
        category: Category::new(&row.category).map_err(|err| corrupted("courses", id, err))?,
        level,
        price,
        thumbnail: row.thumbnail,
        is_published: row.is_published,
        creator: UserId::from_uuid(row.creator_id),
    })
}

/// Related ids loaded for a course.
#[derive(Debug, Default)]
pub(crate) struct CourseRelations {
    pub students: Vec<Uuid>,
    pub lectures: Vec<Uuid>,
    pub reviews: Vec<Uuid>,
}

/// Combine a course row with its relations.
pub(crate) fn course_from_row(row: CourseRow, relations: CourseRelations) -> Result<Course, String> {
    let CourseRelations {
        students,
        lectures,
        reviews,
    } = relations;
    Ok(Course::new(draft_from_row(row)?).with_relations(
        students.into_iter().map(UserId::from_uuid),
        lectures.into_iter().map(LectureId::from_uuid).collect(),
        reviews.into_iter().map(ReviewId::from_uuid),
    ))
}

/// Borrow a draft as insertable/changeset values.
pub(crate) fn course_values(draft: &CourseDraft) -> Result<CourseValues<'_>, String> {
    let price = draft
        .price
        .map(|price| i32::try_from(price.units()))
        .transpose()
        .map_err(|_| format!("price of course {} exceeds the storable range", draft.id))?;
    Ok(CourseValues {
        id: *draft.id.as_uuid(),
        title: draft.title.as_ref(),
        subtitle: draft.subtitle.as_deref(),
        description: draft.description.as_deref(),
        category: draft.category.as_ref(),
        level: draft.level.map(CourseLevel::as_str),
        price,
        thumbnail: draft.thumbnail.as_deref(),
        is_published: draft.is_published,
        creator_id: *draft.creator.as_uuid(),
    })
}

pub(crate) fn lecture_from_row(row: LectureRow) -> Result<Lecture, String> {
    let id = row.id;
    Ok(Lecture {
        id: LectureId::from_uuid(id),
        course_id: CourseId::from_uuid(row.course_id),
        title: LectureTitle::new(&row.title).map_err(|err| corrupted("lectures", id, err))?,
        video_url: row.video_url,
        is_preview_free: row.is_preview_free,
    })
}

pub(crate) fn review_from_row(row: ReviewRow) -> Result<Review, String> {
    let id = row.id;
    Ok(Review {
        id: ReviewId::from_uuid(id),
        course_id: CourseId::from_uuid(row.course_id),
        user_id: UserId::from_uuid(row.user_id),
        rating: Rating::new(i64::from(row.rating)).map_err(|err| corrupted("reviews", id, err))?,
        comment: row.comment,
        reviewed_at: row.reviewed_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn course_row() -> CourseRow {
        CourseRow {
            id: Uuid::new_v4(),
            title: "Compilers".to_owned(),
            subtitle: None,
            description: Some("Parsing to codegen".to_owned()),
            category: "Computer Science".to_owned(),
            level: Some("Advanced".to_owned()),
            price: Some(1_299),
            thumbnail: None,
            is_published: true,
            creator_id: Uuid::new_v4(),
        }
    }

    #[rstest]
    fn course_row_round_trips_through_values() {
        let row = course_row();
        let draft = draft_from_row(row.clone()).expect("valid row");
        let values = course_values(&draft).expect("storable");
        assert_eq!(values.id, row.id);
        assert_eq!(values.price, Some(1_299));
        assert_eq!(values.level, Some("Advanced"));
        assert_eq!(values.creator_id, row.creator_id);
    }

    #[rstest]
    #[case::negative_price(|row: &mut CourseRow| row.price = Some(-1))]
    #[case::unknown_level(|row: &mut CourseRow| row.level = Some("Expert".to_owned()))]
    #[case::short_title(|row: &mut CourseRow| row.title = "ab".to_owned())]
    fn corrupted_course_rows_are_reported(#[case] corrupt: fn(&mut CourseRow)) {
        let mut row = course_row();
        corrupt(&mut row);
        let err = draft_from_row(row).expect_err("corrupted");
        assert!(err.starts_with("corrupted courses row"), "{err}");
    }

    fn user_row() -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            name: "Grace".to_owned(),
            email: "grace@example.com".to_owned(),
            password_hash: None,
            role: "educator".to_owned(),
            photo_url: None,
            description: None,
            reset_code_digest: None,
            reset_expires_at: None,
            reset_verified: false,
        }
    }

    #[rstest]
    fn user_row_carries_enrollments() {
        let course = Uuid::new_v4();
        let user = user_from_row(user_row(), [course]).expect("valid row");
        assert_eq!(user.role(), Role::Educator);
        assert!(user.enroll_courses().contains(&CourseId::from_uuid(course)));
        assert_eq!(user.password_reset(), None);
    }

    #[rstest]
    #[case::pending(Some(PasswordReset::Pending {
        code_digest: "ab".repeat(32),
        expires_at: chrono::Utc::now(),
    }))]
    #[case::verified(Some(PasswordReset::Verified))]
    #[case::none(None)]
    fn reset_state_is_stored_in_columns(#[case] reset: Option<PasswordReset>) {
        let columns = reset_columns(reset.as_ref());
        let row = UserRow {
            reset_code_digest: columns.reset_code_digest.map(str::to_owned),
            reset_expires_at: columns.reset_expires_at,
            reset_verified: columns.reset_verified,
            ..user_row()
        };
        let user = user_from_row(row, []).expect("valid row");
        assert_eq!(user.password_reset(), reset.as_ref());
    }

    #[rstest]
    fn digest_without_expiry_is_reported() {
        let row = UserRow {
            reset_code_digest: Some("ab".repeat(32)),
            ..user_row()
        };
        let err = user_from_row(row, []).expect_err("corrupted");
        assert!(err.contains("incomplete password reset"), "{err}");
    }

    #[rstest]
    fn out_of_range_rating_is_reported() {
        let err = review_from_row(ReviewRow {
            id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            rating: 9,
            comment: None,
            reviewed_at: chrono::Utc::now(),
        })
        .expect_err("rating out of range");
        assert!(err.contains("reviews"));
    }
}
