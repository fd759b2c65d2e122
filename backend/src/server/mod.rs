//! Server construction and middleware wiring.

mod config;
pub mod settings;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use coursehub::Trace;
#[cfg(debug_assertions)]
use coursehub::doc::ApiDoc;
use coursehub::inbound::http::auth::{
    login, logout, register, reset_password, send_otp, verify_otp,
};
use coursehub::inbound::http::courses::{
    create_course, delete_course, edit_course, get_course, list_for_educator, list_public, search,
};
use coursehub::inbound::http::health::{HealthState, live, ready};
use coursehub::inbound::http::lectures::{
    create_lecture, delete_lecture, edit_lecture, get_lecture, list_course_lectures,
};
use coursehub::inbound::http::orders::{create_order, verify_payment};
use coursehub::inbound::http::reviews::{create_review, list_reviews};
use coursehub::inbound::http::state::HttpState;
use coursehub::inbound::http::users::{current_user, update_profile};
use coursehub::inbound::http::validation::{json_error_handler, path_error_handler};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Session cookies outlive the browser for a week.
const SESSION_TTL_DAYS: i64 = 7;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

/// Register every `/api` handler. `get_course` goes last so `/course/{id}`
/// cannot capture the fixed `/course/*` paths.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(logout)
        .service(send_otp)
        .service(verify_otp)
        .service(reset_password)
        .service(current_user)
        .service(update_profile)
        .service(create_course)
        .service(list_public)
        .service(list_for_educator)
        .service(search)
        .service(edit_course)
        .service(delete_course)
        .service(create_lecture)
        .service(list_course_lectures)
        .service(get_lecture)
        .service(edit_lecture)
        .service(delete_lecture)
        .service(create_order)
        .service(verify_payment)
        .service(create_review)
        .service(list_reviews)
        .service(get_course);
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default()
                .session_ttl(actix_web::cookie::time::Duration::days(SESSION_TTL_DAYS)),
        )
        .build();

    let api = web::scope("/api").wrap(session).configure(api_routes);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when the gateway client cannot be built or
/// binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config)?;
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        ..
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::{Value, json};
    use std::net::SocketAddr;

    fn dependencies() -> AppDependencies {
        let config = ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            SocketAddr::from(([127, 0, 0, 1], 0)),
        );
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        AppDependencies {
            health_state,
            http_state: build_http_state(&config).expect("http state"),
            key: config.key,
            cookie_secure: config.cookie_secure,
            same_site: config.same_site,
        }
    }

    #[actix_web::test]
    async fn full_app_serves_probes_and_api() {
        let app = actix_test::init_service(build_app(dependencies())).await;

        let ready_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(ready_res.status(), StatusCode::OK);
        assert!(ready_res.headers().contains_key("trace-id"));

        let public = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/course/public").to_request(),
        )
        .await;
        assert_eq!(public.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(public).await;
        assert_eq!(body["data"], json!([]));
    }

    #[actix_web::test]
    async fn session_cookie_is_private_and_persistent() {
        let app = actix_test::init_service(build_app(dependencies())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(json!({
                    "name": "Ada",
                    "email": "ada@example.com",
                    "password": "secret123",
                    "role": "student"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let cookie = res
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("session cookie");
        assert_eq!(cookie.http_only(), Some(true));
        assert!(cookie.max_age().is_some());
    }
}
