//! Runtime settings loaded via OrthoConfig.
//!
//! Values come from `COURSEHUB_*` environment variables, an optional config
//! file and command-line flags, in increasing precedence.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_GATEWAY_TIMEOUT_MS: u64 = 10_000;

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COURSEHUB")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it the server keeps data in memory.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub db_pool_size: Option<u32>,
    /// Razorpay key id. Without a key pair the simulated gateway is used.
    pub razorpay_key_id: Option<String>,
    /// Razorpay key secret.
    pub razorpay_key_secret: Option<String>,
    /// Override for the Razorpay API root.
    pub razorpay_base_url: Option<String>,
    /// Upper bound on each gateway call, in milliseconds.
    pub gateway_timeout_ms: Option<u64>,
}

/// Settings could not be turned into a usable configuration.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` did not parse as a socket address.
    #[error("invalid COURSEHUB_BIND_ADDR {value:?}: {message}")]
    BindAddr { value: String, message: String },
    /// Only one half of the Razorpay key pair was set.
    #[error("COURSEHUB_RAZORPAY_KEY_ID and COURSEHUB_RAZORPAY_KEY_SECRET must be set together")]
    PartialCredentials,
}

/// Which payment gateway to talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayChoice {
    /// In-process gateway whose orders settle only when told to.
    Simulated,
    /// Hosted Razorpay API.
    Razorpay {
        key_id: String,
        key_secret: String,
        base_url: Option<String>,
    },
}

impl ServerSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    /// Returns [`SettingsError::BindAddr`] for malformed addresses.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Configured pool size or the default.
    pub fn db_pool_size(&self) -> u32 {
        self.db_pool_size.unwrap_or(DEFAULT_POOL_SIZE)
    }

    /// Configured gateway timeout or the default.
    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_millis(
            self.gateway_timeout_ms
                .unwrap_or(DEFAULT_GATEWAY_TIMEOUT_MS),
        )
    }

    /// Pick the gateway from the credentials present.
    ///
    /// # Errors
    /// Returns [`SettingsError::PartialCredentials`] when only one of the key
    /// id and secret is set.
    pub fn gateway(&self) -> Result<GatewayChoice, SettingsError> {
        let present = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_owned)
        };
        match (
            present(&self.razorpay_key_id),
            present(&self.razorpay_key_secret),
        ) {
            (Some(key_id), Some(key_secret)) => Ok(GatewayChoice::Razorpay {
                key_id,
                key_secret,
                base_url: present(&self.razorpay_base_url),
            }),
            (None, None) => Ok(GatewayChoice::Simulated),
            _ => Err(SettingsError::PartialCredentials),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "COURSEHUB_BIND_ADDR",
        "COURSEHUB_DATABASE_URL",
        "COURSEHUB_DB_POOL_SIZE",
        "COURSEHUB_RAZORPAY_KEY_ID",
        "COURSEHUB_RAZORPAY_KEY_SECRET",
        "COURSEHUB_RAZORPAY_BASE_URL",
        "COURSEHUB_GATEWAY_TIMEOUT_MS",
    ];

    fn load_with(overrides: &[(&'static str, &str)]) -> ServerSettings {
        let vars = VARS.map(|name| {
            let value = overrides
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned());
            (name, value)
        });
        let _guard = lock_env(vars);
        ServerSettings::load_from_iter([OsString::from("coursehub")]).expect("config should load")
    }

    #[rstest]
    fn defaults_run_in_memory_with_simulated_gateway() {
        let settings = load_with(&[]);
        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("addr")
        );
        assert!(settings.database_url().is_none());
        assert_eq!(settings.db_pool_size(), 10);
        assert_eq!(settings.gateway_timeout(), Duration::from_secs(10));
        assert_eq!(settings.gateway().expect("gateway"), GatewayChoice::Simulated);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let settings = load_with(&[
            ("COURSEHUB_BIND_ADDR", "127.0.0.1:9000"),
            ("COURSEHUB_DATABASE_URL", "postgres://localhost/coursehub"),
            ("COURSEHUB_DB_POOL_SIZE", "4"),
            ("COURSEHUB_RAZORPAY_KEY_ID", "rzp_test_key"),
            ("COURSEHUB_RAZORPAY_KEY_SECRET", "shh"),
            ("COURSEHUB_GATEWAY_TIMEOUT_MS", "2500"),
        ]);
        assert_eq!(
            settings.bind_addr().expect("bind addr").port(),
            9000
        );
        assert_eq!(settings.database_url(), Some("postgres://localhost/coursehub"));
        assert_eq!(settings.db_pool_size(), 4);
        assert_eq!(settings.gateway_timeout(), Duration::from_millis(2500));
        assert_eq!(
            settings.gateway().expect("gateway"),
            GatewayChoice::Razorpay {
                key_id: "rzp_test_key".to_owned(),
                key_secret: "shh".to_owned(),
                base_url: None,
            }
        );
    }

    #[rstest]
    #[case("COURSEHUB_RAZORPAY_KEY_ID")]
    #[case("COURSEHUB_RAZORPAY_KEY_SECRET")]
    fn half_a_key_pair_is_rejected(#[case] var: &'static str) {
        let settings = load_with(&[(var, "value")]);
        assert!(matches!(
            settings.gateway(),
            Err(SettingsError::PartialCredentials)
        ));
    }

    #[rstest]
    fn malformed_bind_addr_is_reported() {
        let settings = load_with(&[("COURSEHUB_BIND_ADDR", "localhost")]);
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
    }

    #[rstest]
    fn blank_database_url_means_in_memory() {
        let settings = load_with(&[("COURSEHUB_DATABASE_URL", "  ")]);
        assert!(settings.database_url().is_none());
    }
}
