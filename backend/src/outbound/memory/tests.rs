//! Behavioural coverage for the in-memory store.

use chrono::Utc;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{
    Category, CourseTitle, LectureTitle, Price, ProfileUpdate, Rating, ReviewId, Role, UserDraft,
    UserName,
};

fn user(email: &str) -> User {
    User::new(UserDraft {
        id: UserId::random(),
        name: UserName::new("Barbara").expect("name"),
        email: Email::new(email).expect("email"),
        password_hash: None,
        role: Role::Student,
        photo_url: None,
        description: None,
    })
}

fn draft(creator: &UserId, title: &str) -> CourseDraft {
    let mut draft = CourseDraft::new_unpublished(
        CourseTitle::new(title).expect("title"),
        Category::new("Computer Science").expect("category"),
        creator.clone(),
    );
    draft.price = Some(Price::new(499));
    draft.is_published = true;
    draft
}

fn enrollment(user_id: &UserId, course_id: &CourseId) -> Enrollment {
    Enrollment {
        user_id: user_id.clone(),
        course_id: course_id.clone(),
        gateway_order_id: "order_1".to_owned(),
        enrolled_at: Utc::now(),
    }
}

struct Seeded {
    store: InMemoryStore,
    student: User,
    course: CourseDraft,
}

#[fixture]
async fn seeded() -> Seeded {
    let store = InMemoryStore::new();
    let student = user("barbara@example.com");
    let course = draft(&UserId::random(), "Abstract Data Types");
    UserRepository::insert(&store, &student)
        .await
        .expect("user stored");
    CourseRepository::insert(&store, &course)
        .await
        .expect("course stored");
    Seeded {
        store,
        student,
        course,
    }
}

#[rstest]
#[tokio::test]
async fn duplicate_email_is_rejected(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    let err = UserRepository::insert(&seeded.store, &user("BARBARA@example.com"))
        .await
        .expect_err("duplicate");
    assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));
}

#[rstest]
#[tokio::test]
async fn enrollment_is_visible_from_both_sides(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    let inserted = seeded
        .store
        .enroll(&enrollment(seeded.student.id(), &seeded.course.id))
        .await
        .expect("enrolled");
    assert!(inserted);

    let user = UserRepository::find_by_id(&seeded.store, seeded.student.id())
        .await
        .expect("query")
        .expect("user");
    let course = CourseRepository::find_by_id(&seeded.store, &seeded.course.id)
        .await
        .expect("query")
        .expect("course");
    assert!(user.enroll_courses().contains(&seeded.course.id));
    assert!(course.enrolled_students().contains(seeded.student.id()));
}

#[rstest]
#[tokio::test]
async fn concurrent_enrollments_leave_one_record(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    let attempts = (0..16).map(|_| {
        let store = seeded.store.clone();
        let record = enrollment(seeded.student.id(), &seeded.course.id);
        tokio::spawn(async move { store.enroll(&record).await })
    });
    let mut inserted = 0;
    for handle in attempts.collect::<Vec<_>>() {
        if handle.await.expect("join").expect("enroll") {
            inserted += 1;
        }
    }
    assert_eq!(inserted, 1);

    let course = CourseRepository::find_by_id(&seeded.store, &seeded.course.id)
        .await
        .expect("query")
        .expect("course");
    assert_eq!(course.enrolled_students().len(), 1);
}

#[rstest]
#[tokio::test]
async fn deleting_course_cascades(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    let course_id = seeded.course.id.clone();
    let lecture = Lecture::new(course_id.clone(), LectureTitle::new("Stacks").expect("title"));
    LectureRepository::insert(&seeded.store, &lecture)
        .await
        .expect("lecture stored");
    ReviewRepository::insert(
        &seeded.store,
        &Review {
            id: ReviewId::random(),
            course_id: course_id.clone(),
            user_id: seeded.student.id().clone(),
            rating: Rating::new(4).expect("rating"),
            comment: None,
            reviewed_at: Utc::now(),
        },
    )
    .await
    .expect("review stored");
    seeded
        .store
        .enroll(&enrollment(seeded.student.id(), &course_id))
        .await
        .expect("enrolled");

    assert!(CourseRepository::delete(&seeded.store, &course_id).await.expect("delete"));
    assert!(
        LectureRepository::find_by_id(&seeded.store, &lecture.id)
            .await
            .expect("query")
            .is_none()
    );
    assert!(
        seeded
            .store
            .list_with_users()
            .await
            .expect("reviews")
            .is_empty()
    );
    let user = UserRepository::find_by_id(&seeded.store, seeded.student.id())
        .await
        .expect("query")
        .expect("user");
    assert!(user.enroll_courses().is_empty());
}

#[rstest]
#[tokio::test]
async fn duplicate_review_is_rejected(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    let review = |rating| Review {
        id: ReviewId::random(),
        course_id: seeded.course.id.clone(),
        user_id: seeded.student.id().clone(),
        rating: Rating::new(rating).expect("rating"),
        comment: None,
        reviewed_at: Utc::now(),
    };
    ReviewRepository::insert(&seeded.store, &review(5))
        .await
        .expect("first review");
    let err = ReviewRepository::insert(&seeded.store, &review(3))
        .await
        .expect_err("duplicate");
    assert_eq!(err, ReviewPersistenceError::Duplicate);
}

#[rstest]
#[tokio::test]
async fn lectures_keep_creation_order(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    let titles = ["Lists", "Trees", "Graphs"];
    for title in titles {
        let lecture = Lecture::new(
            seeded.course.id.clone(),
            LectureTitle::new(title).expect("title"),
        );
        LectureRepository::insert(&seeded.store, &lecture)
            .await
            .expect("lecture stored");
    }
    let listed: Vec<String> = seeded
        .store
        .list_for_course(&seeded.course.id)
        .await
        .expect("list")
        .into_iter()
        .map(|lecture| lecture.title.as_ref().to_owned())
        .collect();
    assert_eq!(listed, titles);
}

#[rstest]
#[tokio::test]
async fn password_reset_survives_profile_edits_and_clears_on_replace(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    let id = seeded.student.id().clone();
    seeded
        .store
        .save_password_reset(&id, Some(PasswordReset::Verified))
        .await
        .expect("reset saved");

    let mut edited = seeded.student.clone();
    edited.apply_profile(ProfileUpdate {
        name: Some(UserName::new("Barbara L.").expect("name")),
        description: None,
        photo_url: None,
    });
    seeded
        .store
        .update_profile(&edited)
        .await
        .expect("profile saved");
    let stored = UserRepository::find_by_id(&seeded.store, &id)
        .await
        .expect("query")
        .expect("user");
    assert_eq!(stored.password_reset(), Some(&PasswordReset::Verified));

    let hash = PasswordHash::new("$argon2id$replaced");
    seeded
        .store
        .replace_password(&id, &hash)
        .await
        .expect("password replaced");
    let stored = UserRepository::find_by_id(&seeded.store, &id)
        .await
        .expect("query")
        .expect("user");
    assert_eq!(stored.password_hash(), Some(&hash));
    assert_eq!(stored.password_reset(), None);
}

#[rstest]
#[tokio::test]
async fn password_reset_for_unknown_user_fails(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    let err = seeded
        .store
        .save_password_reset(&UserId::random(), None)
        .await
        .expect_err("unknown user");
    assert!(matches!(err, UserPersistenceError::Query { .. }));
}
