//! Builders wiring repositories, the payment gateway and the mailer into HTTP
//! state.
//!
//! With a database pool every repository is Diesel-backed; without one a
//! single [`InMemoryStore`] serves them all. The gateway is chosen
//! independently of storage. Reset codes go through [`SimulatedMailer`].

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use mockable::DefaultClock;
use reqwest::Url;
use tracing::info;

use coursehub::domain::ports::{
    CourseRepository, EnrollmentRepository, LectureRepository, PaymentGateway, ReviewRepository,
    UserRepository,
};
use coursehub::domain::{
    AccountServiceImpl, CatalogueCache, CourseServiceImpl, EnrollmentServiceImpl,
    LectureServiceImpl, PasswordResetServiceImpl, ReviewServiceImpl,
};
use coursehub::inbound::http::state::{HttpState, HttpStatePorts};
use coursehub::outbound::mail::SimulatedMailer;
use coursehub::outbound::memory::InMemoryStore;
use coursehub::outbound::password::Argon2PasswordHasher;
use coursehub::outbound::payment::{
    DEFAULT_RAZORPAY_BASE_URL, RazorpayCredentials, RazorpayHttpGateway, SimulatedGateway,
};
use coursehub::outbound::persistence::{
    DbPool, DieselCourseRepository, DieselEnrollmentRepository, DieselLectureRepository,
    DieselReviewRepository, DieselUserRepository,
};

use super::ServerConfig;
use super::settings::GatewayChoice;

/// One adapter per driven repository port.
struct Repositories<U, C, L, R, E> {
    users: Arc<U>,
    courses: Arc<C>,
    lectures: Arc<L>,
    reviews: Arc<R>,
    enrollments: Arc<E>,
}

impl
    Repositories<
        DieselUserRepository,
        DieselCourseRepository,
        DieselLectureRepository,
        DieselReviewRepository,
        DieselEnrollmentRepository,
    >
{
    fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            courses: Arc::new(DieselCourseRepository::new(pool.clone())),
            lectures: Arc::new(DieselLectureRepository::new(pool.clone())),
            reviews: Arc::new(DieselReviewRepository::new(pool.clone())),
            enrollments: Arc::new(DieselEnrollmentRepository::new(pool.clone())),
        }
    }
}

impl Repositories<InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore> {
    fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            courses: store.clone(),
            lectures: store.clone(),
            reviews: store.clone(),
            enrollments: store,
        }
    }
}

fn build_ports<U, C, L, R, E, G>(
    repos: Repositories<U, C, L, R, E>,
    gateway: Arc<G>,
    gateway_timeout: Duration,
) -> HttpStatePorts
where
    U: UserRepository + 'static,
    C: CourseRepository + 'static,
    L: LectureRepository + 'static,
    R: ReviewRepository + 'static,
    E: EnrollmentRepository + 'static,
    G: PaymentGateway + 'static,
{
    let Repositories {
        users,
        courses,
        lectures,
        reviews,
        enrollments,
    } = repos;
    let catalogue = Arc::new(CatalogueCache::new());
    let clock = Arc::new(DefaultClock);
    let hasher = Arc::new(Argon2PasswordHasher::new());

    HttpStatePorts {
        accounts: Arc::new(AccountServiceImpl::new(users.clone(), hasher.clone())),
        password_resets: Arc::new(PasswordResetServiceImpl::new(
            users.clone(),
            hasher,
            Arc::new(SimulatedMailer::new()),
            clock.clone(),
        )),
        courses: Arc::new(CourseServiceImpl::new(
            users.clone(),
            courses.clone(),
            reviews.clone(),
            catalogue.clone(),
        )),
        lectures: Arc::new(LectureServiceImpl::new(
            users.clone(),
            courses.clone(),
            lectures,
            catalogue.clone(),
        )),
        enrollments: Arc::new(
            EnrollmentServiceImpl::new(
                users,
                courses.clone(),
                enrollments,
                gateway,
                catalogue.clone(),
                clock.clone(),
            )
            .with_gateway_timeout(gateway_timeout),
        ),
        reviews: Arc::new(ReviewServiceImpl::new(courses, reviews, catalogue, clock)),
    }
}

fn razorpay_gateway(
    key_id: &str,
    key_secret: &str,
    base_url: Option<&str>,
    timeout: Duration,
) -> std::io::Result<RazorpayHttpGateway> {
    let raw = base_url.unwrap_or(DEFAULT_RAZORPAY_BASE_URL);
    let url = Url::parse(raw)
        .map_err(|err| std::io::Error::other(format!("invalid Razorpay base URL {raw}: {err}")))?;
    RazorpayHttpGateway::new(url, RazorpayCredentials::new(key_id, key_secret), timeout)
        .map_err(|err| std::io::Error::other(format!("failed to build Razorpay client: {err}")))
}

fn with_gateway<U, C, L, R, E>(
    repos: Repositories<U, C, L, R, E>,
    config: &ServerConfig,
) -> std::io::Result<HttpStatePorts>
where
    U: UserRepository + 'static,
    C: CourseRepository + 'static,
    L: LectureRepository + 'static,
    R: ReviewRepository + 'static,
    E: EnrollmentRepository + 'static,
{
    match &config.gateway {
        GatewayChoice::Simulated => {
            info!("using simulated payment gateway");
            Ok(build_ports(
                repos,
                Arc::new(SimulatedGateway::new()),
                config.gateway_timeout,
            ))
        }
        GatewayChoice::Razorpay {
            key_id,
            key_secret,
            base_url,
        } => {
            let gateway = razorpay_gateway(
                key_id,
                key_secret,
                base_url.as_deref(),
                config.gateway_timeout,
            )?;
            info!(key_id = %key_id, "using Razorpay payment gateway");
            Ok(build_ports(
                repos,
                Arc::new(gateway),
                config.gateway_timeout,
            ))
        }
    }
}

/// Build the shared HTTP state for `config`.
///
/// # Errors
/// Returns [`std::io::Error`] when the Razorpay client cannot be built.
pub fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let ports = match &config.db_pool {
        Some(pool) => with_gateway(Repositories::diesel(pool), config)?,
        None => {
            info!("no database configured; using in-memory storage");
            with_gateway(Repositories::in_memory(), config)?
        }
    };
    Ok(web::Data::new(HttpState::new(ports)))
}
