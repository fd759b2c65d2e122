//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use coursehub::outbound::persistence::DbPool;

use super::settings::GatewayChoice;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) gateway: GatewayChoice,
    pub(crate) gateway_timeout: Duration,
}

impl ServerConfig {
    /// Construct a configuration with in-memory storage and the simulated
    /// gateway.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            gateway: GatewayChoice::Simulated,
            gateway_timeout: coursehub::domain::DEFAULT_GATEWAY_TIMEOUT,
        }
    }

    /// Attach a database connection pool for the Diesel repositories.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Select the payment gateway and the bound on each call to it.
    #[must_use]
    pub fn with_gateway(mut self, gateway: GatewayChoice, timeout: Duration) -> Self {
        self.gateway = gateway;
        self.gateway_timeout = timeout;
        self
    }
}
