//! Password reset by emailed one-time code.
//!
//! Sending a code stores its SHA-256 digest with an expiry. A matching code
//! presented before the expiry marks the reset verified, and only a verified
//! reset may replace the password. Replacing the password clears the state.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Seconds an issued code stays valid.
pub const RESET_CODE_TTL_SECONDS: i64 = 300;
/// Digits in a reset code.
pub const RESET_CODE_DIGITS: usize = 6;

/// Raised when a submitted code is not six ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("code must be {RESET_CODE_DIGITS} digits")]
pub struct ResetCodeError;

/// Six-digit code mailed to the account owner. Never rendered in `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ResetCode(Zeroizing<String>);

impl ResetCode {
    /// Validate a code typed by the user.
    ///
    /// # Examples
    /// ```
    /// use coursehub::domain::ResetCode;
    ///
    /// assert!(ResetCode::new(" 042917 ").is_ok());
    /// assert!(ResetCode::new("42917").is_err());
    /// ```
    pub fn new(raw: &str) -> Result<Self, ResetCodeError> {
        let trimmed = raw.trim();
        if trimmed.len() == RESET_CODE_DIGITS && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(Zeroizing::new(trimmed.to_owned())))
        } else {
            Err(ResetCodeError)
        }
    }

    /// Draw a fresh code without a leading zero.
    #[must_use]
    pub fn generate() -> Self {
        let value: u32 = rand::thread_rng().gen_range(100_000..=999_999);
        Self(Zeroizing::new(value.to_string()))
    }

    /// The digits, for delivery.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.0.as_bytes()))
    }
}

impl fmt::Debug for ResetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResetCode(<redacted>)")
    }
}

/// Reset progress stored on an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordReset {
    /// A code was sent and awaits confirmation.
    Pending {
        /// Hex SHA-256 of the code.
        code_digest: String,
        /// Last instant the code is accepted.
        expires_at: DateTime<Utc>,
    },
    /// The code was confirmed; the password may now be replaced.
    Verified,
}

/// Reasons a submitted code is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResetRejection {
    /// No code is outstanding.
    #[error("no reset code is outstanding")]
    NotRequested,
    /// The code differs from the one sent.
    #[error("reset code does not match")]
    Mismatch,
    /// The code arrived after its expiry.
    #[error("reset code has expired")]
    Expired,
}

impl PasswordReset {
    /// Pending reset for `code`, issued at `now`.
    #[must_use]
    pub fn issue(code: &ResetCode, now: DateTime<Utc>) -> Self {
        Self::Pending {
            code_digest: code.digest(),
            expires_at: now + Duration::seconds(RESET_CODE_TTL_SECONDS),
        }
    }

    /// Check `code` at `now`, returning the verified state on success.
    pub fn confirm(&self, code: &ResetCode, now: DateTime<Utc>) -> Result<Self, ResetRejection> {
        match self {
            Self::Verified => Err(ResetRejection::NotRequested),
            Self::Pending {
                code_digest,
                expires_at,
            } => {
                if *code_digest != code.digest() {
                    return Err(ResetRejection::Mismatch);
                }
                if now > *expires_at {
                    return Err(ResetRejection::Expired);
                }
                Ok(Self::Verified)
            }
        }
    }

    /// Whether the password may be replaced.
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }
}
