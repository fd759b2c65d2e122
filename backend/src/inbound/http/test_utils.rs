//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test, web};
use mockable::DefaultClock;
use serde_json::{Value, json};

use crate::domain::{
    AccountServiceImpl, CatalogueCache, CourseServiceImpl, EnrollmentServiceImpl, Error,
    LectureServiceImpl, PasswordResetServiceImpl, ReviewServiceImpl, UserId,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::validation::{json_error_handler, path_error_handler};
use crate::outbound::mail::SimulatedMailer;
use crate::outbound::memory::InMemoryStore;
use crate::outbound::password::Argon2PasswordHasher;
use crate::outbound::payment::SimulatedGateway;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Real services over an in-memory store, simulated gateway and mailer.
#[derive(Clone)]
pub struct TestBackend {
    pub store: InMemoryStore,
    pub gateway: SimulatedGateway,
    pub mailer: SimulatedMailer,
    pub state: HttpState,
}

impl TestBackend {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let gateway = SimulatedGateway::new();
        let mailer = SimulatedMailer::new();
        let catalogue = Arc::new(CatalogueCache::new());
        let clock = Arc::new(DefaultClock);
        let hasher = Arc::new(Argon2PasswordHasher::new());
        let state = HttpState::new(HttpStatePorts {
            accounts: Arc::new(AccountServiceImpl::new(store.clone(), hasher.clone())),
            password_resets: Arc::new(PasswordResetServiceImpl::new(
                store.clone(),
                hasher,
                Arc::new(mailer.clone()),
                clock.clone(),
            )),
            courses: Arc::new(CourseServiceImpl::new(
                store.clone(),
                store.clone(),
                store.clone(),
                catalogue.clone(),
            )),
            lectures: Arc::new(LectureServiceImpl::new(
                store.clone(),
                store.clone(),
                store.clone(),
                catalogue.clone(),
            )),
            enrollments: Arc::new(EnrollmentServiceImpl::new(
                store.clone(),
                store.clone(),
                store.clone(),
                Arc::new(gateway.clone()),
                catalogue.clone(),
                clock.clone(),
            )),
            reviews: Arc::new(ReviewServiceImpl::new(
                store.clone(),
                store.clone(),
                catalogue,
                clock,
            )),
        });
        Self {
            store: store.as_ref().clone(),
            gateway,
            mailer,
            state,
        }
    }
}

/// App with `state`, a test session and the JSON/path error handlers, with
/// `register` adding the handlers under `/api`.
pub fn test_app(
    state: HttpState,
    register: impl FnOnce(&mut web::ServiceConfig),
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .wrap(test_session_middleware())
        .service(web::scope("/api").configure(register))
}

/// Pull the session cookie out of a response.
pub fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Read an envelope body as JSON.
pub async fn body_json(res: ServiceResponse) -> Value {
    let bytes = test::read_body(res).await;
    serde_json::from_slice(&bytes).expect("response body is JSON")
}

/// Route at `/sign-in` that puts `user` in the session, for tests whose
/// services are mocked and cannot register accounts.
pub fn sign_in_route(cfg: &mut web::ServiceConfig, user: UserId) {
    cfg.route(
        "/sign-in",
        web::get().to(move |session: SessionContext| {
            let user = user.clone();
            async move {
                session.persist_user(&user)?;
                Ok::<_, Error>(HttpResponse::Ok().finish())
            }
        }),
    );
}

/// Call the `/sign-in` route and return its session cookie.
pub async fn sign_in<S>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(app, test::TestRequest::get().uri("/api/sign-in").to_request())
        .await;
    session_cookie(&res)
}

/// Send `req` and decode the envelope.
pub async fn send<S>(app: &S, req: test::TestRequest) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    (status, body_json(res).await)
}

/// Register an account through the API. Returns its session cookie and id.
pub async fn register<S>(app: &S, email: &str, role: &str) -> (Cookie<'static>, String)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "name": "Test User",
                "email": email,
                "password": "secret123",
                "role": role,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 201, "registration succeeds");
    let cookie = session_cookie(&res);
    let body = body_json(res).await;
    let id = body["data"]["id"]
        .as_str()
        .expect("user id in response")
        .to_owned();
    (cookie, id)
}
