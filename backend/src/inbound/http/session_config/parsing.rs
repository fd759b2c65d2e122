//! Toggle parsing for session configuration.
//!
//! A missing or unparsable toggle is fatal in release builds. Debug builds
//! log a warning and fall back to the default.

use actix_web::cookie::SameSite;
use mockable::Env;
use tracing::warn;

use super::{BuildMode, COOKIE_SECURE_ENV, SAMESITE_ENV, SessionConfigError};

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Return `default` in debug builds, `error` in release builds.
pub(super) fn fallback<T>(
    mode: BuildMode,
    default: T,
    error: SessionConfigError,
) -> Result<T, SessionConfigError> {
    if mode.is_debug() {
        warn!(%error, "session setting defaulted in debug build");
        Ok(default)
    } else {
        Err(error)
    }
}

/// Read a boolean toggle named `name`.
pub(super) fn bool_toggle<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    default: bool,
) -> Result<bool, SessionConfigError> {
    let Some(raw) = env.string(name) else {
        return fallback(mode, default, SessionConfigError::MissingEnv { name });
    };
    match parse_bool(&raw) {
        Some(flag) => Ok(flag),
        None => fallback(
            mode,
            default,
            SessionConfigError::InvalidEnv {
                name,
                value: raw,
                expected: BOOL_EXPECTED,
            },
        ),
    }
}

/// Read the `SameSite` policy.
///
/// `None` needs a secure cookie: release builds refuse the combination and
/// debug builds accept it with a warning.
pub(super) fn same_site_toggle<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let Some(raw) = env.string(SAMESITE_ENV) else {
        return fallback(mode, default, SessionConfigError::MissingEnv { name: SAMESITE_ENV });
    };
    match raw.to_ascii_lowercase().as_str() {
        "strict" => Ok(SameSite::Strict),
        "lax" => Ok(SameSite::Lax),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => {
            if !mode.is_debug() {
                return Err(SessionConfigError::InsecureSameSiteNone);
            }
            warn!("{SAMESITE_ENV}=None with {COOKIE_SECURE_ENV}=0; browsers may reject the cookie");
            Ok(SameSite::None)
        }
        _ => fallback(
            mode,
            default,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value: raw,
                expected: SAMESITE_EXPECTED,
            },
        ),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
