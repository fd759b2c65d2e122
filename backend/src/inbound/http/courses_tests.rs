//! Handler tests for course endpoints.

use super::*;
use crate::inbound::http::auth::register as register_handler;
use crate::inbound::http::test_utils::{TestBackend, register, send, test_app};
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register_handler)
        .service(create_course)
        .service(list_public)
        .service(list_for_educator)
        .service(search)
        .service(edit_course)
        .service(delete_course)
        .service(get_course);
}

async fn create<S>(app: &S, cookie: &Cookie<'static>, title: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/course/create")
            .cookie(cookie.clone())
            .set_json(json!({"title": title, "category": "Programming"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_str().expect("course id").to_owned()
}

async fn publish<S>(app: &S, cookie: &Cookie<'static>, id: &str)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/course/edit/{id}"))
            .cookie(cookie.clone())
            .set_json(json!({"isPublished": true, "price": 499, "level": "beginner"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
}

#[actix_web::test]
async fn educators_create_unpublished_courses() {
    let app = actix_test::init_service(test_app(TestBackend::new().state, routes)).await;
    let (cookie, educator_id) = register(&app, "edu@example.com", "educator").await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/course/create")
            .cookie(cookie)
            .set_json(json!({"title": "  Rust basics  ", "category": "Programming"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Course created successfully");
    assert_eq!(body["data"]["title"], "Rust basics");
    assert_eq!(body["data"]["isPublished"], false);
    assert_eq!(body["data"]["creator"], educator_id.as_str());
    assert_eq!(body["data"]["lectures"], json!([]));
}

#[actix_web::test]
async fn students_cannot_create_courses() {
    let app = actix_test::init_service(test_app(TestBackend::new().state, routes)).await;
    let (cookie, _) = register(&app, "student@example.com", "student").await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/course/create")
            .cookie(cookie)
            .set_json(json!({"title": "Rust basics", "category": "Programming"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["statusCode"], 403);
}

#[rstest]
#[case(json!({"category": "Programming"}), "title")]
#[case(json!({"title": "Rs", "category": "Programming"}), "title")]
#[case(json!({"title": "Rust basics", "category": " "}), "category")]
#[actix_web::test]
async fn create_validates_fields(#[case] payload: Value, #[case] field: &str) {
    let app = actix_test::init_service(test_app(TestBackend::new().state, routes)).await;
    let (cookie, _) = register(&app, "edu@example.com", "educator").await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/course/create")
            .cookie(cookie)
            .set_json(payload),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], field);
}

#[actix_web::test]
async fn public_list_shows_only_published_courses_with_ratings() {
    let app = actix_test::init_service(test_app(TestBackend::new().state, routes)).await;
    let (cookie, _) = register(&app, "edu@example.com", "educator").await;
    let draft = create(&app, &cookie, "Draft course").await;
    let live = create(&app, &cookie, "Live course").await;
    publish(&app, &cookie, &live).await;

    let (status, body) = send(&app, actix_test::TestRequest::get().uri("/api/course/public")).await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<&str> = body["data"]
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|course| course["id"].as_str())
        .collect();
    assert_eq!(listed, vec![live.as_str()]);
    assert!(!listed.contains(&draft.as_str()));
    assert_eq!(body["data"][0]["averageRating"], "0.0");
    assert_eq!(body["data"][0]["reviewCount"], 0);
    assert_eq!(body["data"][0]["price"], 499);
    assert_eq!(body["data"][0]["level"], "Beginner");
}

#[actix_web::test]
async fn educator_list_includes_drafts() {
    let app = actix_test::init_service(test_app(TestBackend::new().state, routes)).await;
    let (cookie, _) = register(&app, "edu@example.com", "educator").await;
    let id = create(&app, &cookie, "Draft course").await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/course/educator")
            .cookie(cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], id.as_str());
}

#[actix_web::test]
async fn fixed_paths_are_not_captured_as_ids() {
    let app = actix_test::init_service(test_app(TestBackend::new().state, routes)).await;
    let (status, _) = send(&app, actix_test::TestRequest::get().uri("/api/course/public")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        actix_test::TestRequest::get().uri("/api/course/not-a-uuid"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "id");

    let (status, _) = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/course/3fa85f64-5717-4562-b3fc-2c963f66afa6"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn course_detail_embeds_creator() {
    let app = actix_test::init_service(test_app(TestBackend::new().state, routes)).await;
    let (cookie, educator_id) = register(&app, "edu@example.com", "educator").await;
    let id = create(&app, &cookie, "Rust basics").await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::get().uri(&format!("/api/course/{id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["creatorProfile"]["id"], educator_id.as_str());
    assert_eq!(body["data"]["creatorProfile"]["name"], "Test User");
    assert_eq!(body["data"]["averageRating"], "0.0");
}

#[actix_web::test]
async fn only_the_creator_may_edit_or_delete() {
    let app = actix_test::init_service(test_app(TestBackend::new().state, routes)).await;
    let (owner, _) = register(&app, "owner@example.com", "educator").await;
    let (other, _) = register(&app, "other@example.com", "educator").await;
    let id = create(&app, &owner, "Rust basics").await;

    let (status, _) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/course/edit/{id}"))
            .cookie(other.clone())
            .set_json(json!({"subtitle": "hijacked"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/course/delete/{id}"))
            .cookie(other),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[rstest]
#[case(json!({}))]
#[case(json!({"price": -1}))]
#[case(json!({"level": "Expert"}))]
#[actix_web::test]
async fn edit_rejects_invalid_patches(#[case] payload: Value) {
    let app = actix_test::init_service(test_app(TestBackend::new().state, routes)).await;
    let (cookie, _) = register(&app, "edu@example.com", "educator").await;
    let id = create(&app, &cookie, "Rust basics").await;

    let (status, _) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/course/edit/{id}"))
            .cookie(cookie)
            .set_json(payload),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn deleted_courses_are_gone() {
    let app = actix_test::init_service(test_app(TestBackend::new().state, routes)).await;
    let (cookie, _) = register(&app, "edu@example.com", "educator").await;
    let id = create(&app, &cookie, "Rust basics").await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/course/delete/{id}"))
            .cookie(cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id.as_str());

    let (status, _) = send(
        &app,
        actix_test::TestRequest::get().uri(&format!("/api/course/{id}")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn search_matches_published_courses_case_insensitively() {
    let app = actix_test::init_service(test_app(TestBackend::new().state, routes)).await;
    let (cookie, _) = register(&app, "edu@example.com", "educator").await;
    let rust = create(&app, &cookie, "Rust basics").await;
    publish(&app, &cookie, &rust).await;
    let hidden = create(&app, &cookie, "Rust internals").await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/course/search")
            .set_json(json!({"query": "RUST"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["data"]
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|course| course["id"].as_str())
        .collect();
    assert_eq!(ids, vec![rust.as_str()]);
    assert!(!ids.contains(&hidden.as_str()));

    let (status, _) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/course/search")
            .set_json(json!({"query": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
