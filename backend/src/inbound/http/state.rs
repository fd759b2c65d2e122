//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountService, CourseService, EnrollmentService, LectureService, PasswordResetService,
    ReviewService,
};

/// Parameter object bundling every driving port the handlers call.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountService>,
    pub password_resets: Arc<dyn PasswordResetService>,
    pub courses: Arc<dyn CourseService>,
    pub lectures: Arc<dyn LectureService>,
    pub enrollments: Arc<dyn EnrollmentService>,
    pub reviews: Arc<dyn ReviewService>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountService>,
    pub password_resets: Arc<dyn PasswordResetService>,
    pub courses: Arc<dyn CourseService>,
    pub lectures: Arc<dyn LectureService>,
    pub enrollments: Arc<dyn EnrollmentService>,
    pub reviews: Arc<dyn ReviewService>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use coursehub::domain::{
    ///     AccountServiceImpl, CatalogueCache, CourseServiceImpl, EnrollmentServiceImpl,
    ///     LectureServiceImpl, PasswordResetServiceImpl, ReviewServiceImpl,
    /// };
    /// use coursehub::inbound::http::state::{HttpState, HttpStatePorts};
    /// use coursehub::outbound::mail::SimulatedMailer;
    /// use coursehub::outbound::memory::InMemoryStore;
    /// use coursehub::outbound::password::Argon2PasswordHasher;
    /// use coursehub::outbound::payment::SimulatedGateway;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let cache = Arc::new(CatalogueCache::new());
    /// let clock = Arc::new(DefaultClock);
    /// let hasher = Arc::new(Argon2PasswordHasher::new());
    /// let ports = HttpStatePorts {
    ///     accounts: Arc::new(AccountServiceImpl::new(store.clone(), hasher.clone())),
    ///     password_resets: Arc::new(PasswordResetServiceImpl::new(
    ///         store.clone(),
    ///         hasher,
    ///         Arc::new(SimulatedMailer::new()),
    ///         clock.clone(),
    ///     )),
    ///     courses: Arc::new(CourseServiceImpl::new(
    ///         store.clone(),
    ///         store.clone(),
    ///         store.clone(),
    ///         cache.clone(),
    ///     )),
    ///     lectures: Arc::new(LectureServiceImpl::new(
    ///         store.clone(),
    ///         store.clone(),
    ///         store.clone(),
    ///         cache.clone(),
    ///     )),
    ///     enrollments: Arc::new(EnrollmentServiceImpl::new(
    ///         store.clone(),
    ///         store.clone(),
    ///         store.clone(),
    ///         Arc::new(SimulatedGateway::new()),
    ///         cache.clone(),
    ///         clock.clone(),
    ///     )),
    ///     reviews: Arc::new(ReviewServiceImpl::new(store.clone(), store, cache, clock)),
    /// };
    /// let state = HttpState::new(ports);
    /// let _accounts = state.accounts.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            password_resets,
            courses,
            lectures,
            enrollments,
            reviews,
        } = ports;
        Self {
            accounts,
            password_resets,
            courses,
            lectures,
            enrollments,
            reviews,
        }
    }
}
