//! Tests for the lecture service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockCourseRepository, MockLectureRepository, MockUserRepository};
use crate::domain::{
    Category, CourseDraft, CourseTitle, Email, ErrorCode, Role, User, UserDraft, UserName,
};
use rstest::{fixture, rstest};

struct Fixture {
    creator: UserId,
    course: Course,
    paid: Lecture,
    preview: Lecture,
}

#[fixture]
fn setup() -> Fixture {
    let creator = UserId::random();
    let course = Course::new(CourseDraft::new_unpublished(
        CourseTitle::new("Compilers").expect("title"),
        Category::new("Computer Science").expect("category"),
        creator.clone(),
    ));
    let mut paid = Lecture::new(course.id().clone(), LectureTitle::new("Parsing").expect("title"));
    paid.video_url = Some("https://cdn.example.com/parsing.mp4".to_owned());
    let mut preview = Lecture::new(course.id().clone(), LectureTitle::new("Intro").expect("title"));
    preview.video_url = Some("https://cdn.example.com/intro.mp4".to_owned());
    preview.is_preview_free = true;
    Fixture {
        creator,
        course,
        paid,
        preview,
    }
}

fn user(id: &UserId, role: Role, enrolled: &[CourseId]) -> User {
    User::new(UserDraft {
        id: id.clone(),
        name: UserName::new("Linus").expect("name"),
        email: Email::new("linus@example.com").expect("email"),
        password_hash: None,
        role,
        photo_url: None,
        description: None,
    })
    .with_enrollments(enrolled.iter().cloned())
}

fn service(
    viewer: User,
    course: Course,
    lectures: MockLectureRepository,
) -> LectureServiceImpl<MockUserRepository, MockCourseRepository, MockLectureRepository> {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(viewer.clone())));
    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_by_id()
        .returning(move |_| Ok(Some(course.clone())));
    LectureServiceImpl::new(
        Arc::new(users),
        Arc::new(courses),
        Arc::new(lectures),
        Arc::new(CatalogueCache::new()),
    )
}

fn listing_repo(lectures: Vec<Lecture>) -> MockLectureRepository {
    let mut repo = MockLectureRepository::new();
    repo.expect_list_for_course()
        .return_once(move |_| Ok(lectures));
    repo
}

#[rstest]
#[tokio::test]
async fn listing_redacts_paid_videos_for_strangers(setup: Fixture) {
    let viewer_id = UserId::random();
    let lectures = vec![setup.preview.clone(), setup.paid.clone()];
    let svc = service(
        user(&viewer_id, Role::Student, &[]),
        setup.course.clone(),
        listing_repo(lectures),
    );

    let listed = svc
        .list_for_course(&viewer_id, setup.course.id())
        .await
        .expect("listing");
    let videos: Vec<bool> = listed.iter().map(|l| l.video_url.is_some()).collect();
    assert_eq!(videos, vec![true, false]);
}

#[rstest]
#[tokio::test]
async fn listing_shows_all_videos_to_enrolled_students(setup: Fixture) {
    let viewer_id = UserId::random();
    let lectures = vec![setup.preview.clone(), setup.paid.clone()];
    let svc = service(
        user(&viewer_id, Role::Student, &[setup.course.id().clone()]),
        setup.course.clone(),
        listing_repo(lectures),
    );

    let listed = svc
        .list_for_course(&viewer_id, setup.course.id())
        .await
        .expect("listing");
    assert!(listed.iter().all(|l| l.video_url.is_some()));
}

#[rstest]
#[tokio::test]
async fn get_paid_lecture_without_enrollment_is_forbidden(setup: Fixture) {
    let viewer_id = UserId::random();
    let paid = setup.paid.clone();
    let mut repo = MockLectureRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(paid)));
    let svc = service(user(&viewer_id, Role::Student, &[]), setup.course, repo);

    let err = svc
        .get(&viewer_id, &setup.paid.id)
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn creator_can_watch_own_lecture(setup: Fixture) {
    let paid = setup.paid.clone();
    let mut repo = MockLectureRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(paid)));
    let svc = service(
        user(&setup.creator, Role::Educator, &[]),
        setup.course,
        repo,
    );

    let lecture = svc
        .get(&setup.creator, &setup.paid.id)
        .await
        .expect("creator access");
    assert!(lecture.video_url.is_some());
}

#[rstest]
#[tokio::test]
async fn create_by_non_creator_is_forbidden(setup: Fixture) {
    let other = UserId::random();
    let mut repo = MockLectureRepository::new();
    repo.expect_insert().never();
    let svc = service(user(&other, Role::Educator, &[]), setup.course.clone(), repo);

    let err = svc
        .create(
            &other,
            setup.course.id(),
            LectureTitle::new("Borrowing").expect("title"),
        )
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn create_appends_lecture(setup: Fixture) {
    let mut repo = MockLectureRepository::new();
    repo.expect_insert()
        .withf(|lecture| !lecture.is_preview_free && lecture.video_url.is_none())
        .times(1)
        .return_once(|_| Ok(()));
    let svc = service(
        user(&setup.creator, Role::Educator, &[]),
        setup.course.clone(),
        repo,
    );

    let lecture = svc
        .create(
            &setup.creator,
            setup.course.id(),
            LectureTitle::new("Borrowing").expect("title"),
        )
        .await
        .expect("created");
    assert_eq!(&lecture.course_id, setup.course.id());
}

#[rstest]
#[tokio::test]
async fn edit_requires_a_field(setup: Fixture) {
    let svc = service(
        user(&setup.creator, Role::Educator, &[]),
        setup.course,
        MockLectureRepository::new(),
    );
    let err = svc
        .edit(&setup.creator, &setup.paid.id, LecturePatch::default())
        .await
        .expect_err("empty patch");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}
