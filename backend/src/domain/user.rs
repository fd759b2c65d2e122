//! User accounts, roles, and profile data.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{CourseId, PasswordReset, UserId};

/// Minimum accepted password length in characters.
pub const PASSWORD_MIN: usize = 6;
/// Maximum accepted password length in characters.
pub const PASSWORD_MAX: usize = 20;
/// Maximum length of a user name.
pub const USER_NAME_MAX: usize = 64;

/// Validation errors raised while building user values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Name was blank once trimmed.
    #[error("name must not be empty")]
    EmptyName,
    /// Name exceeded [`USER_NAME_MAX`].
    #[error("name must be at most {max} characters")]
    NameTooLong {
        /// Upper bound.
        max: usize,
    },
    /// Email was blank.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email contained whitespace or did not look like an address.
    #[error("email is invalid")]
    InvalidEmail,
    /// Password length fell outside the accepted range.
    #[error("password must be between {min} and {max} characters")]
    PasswordLength {
        /// Lower bound.
        min: usize,
        /// Upper bound.
        max: usize,
    },
    /// Role was neither `student` nor `educator`.
    #[error("role must be student or educator")]
    UnknownRole,
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can purchase and watch courses.
    Student,
    /// Can additionally author courses and lectures.
    Educator,
}

impl Role {
    /// Lowercase storage form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Educator => "educator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "educator" => Ok(Self::Educator),
            _ => Err(UserValidationError::UnknownRole),
        }
    }
}

/// Trimmed, non-empty user name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: USER_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Email address, stored lower-cased.
///
/// ## Invariants
/// - Contains no whitespace.
/// - Has a single `@` separating non-empty local and domain parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

static EMAIL_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn email_regex() -> Option<&'static Regex> {
    EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$"))
        .as_ref()
        .ok()
}

impl Email {
    /// Validate and normalise an email address.
    ///
    /// # Examples
    /// ```
    /// use coursehub::domain::Email;
    ///
    /// let email = Email::new("  Ada@Example.COM ").expect("valid email");
    /// assert_eq!(email.as_ref(), "ada@example.com");
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        let lowered = trimmed.to_lowercase();
        match email_regex() {
            Some(re) if re.is_match(&lowered) => Ok(Self(lowered)),
            _ => Err(UserValidationError::InvalidEmail),
        }
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque PHC-formatted password hash. Never rendered in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a stored hash string.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Plain-text password accepted at registration or login. Wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Accept a password for login without length policy.
    pub fn for_login(raw: &str) -> Result<Self, UserValidationError> {
        if raw.is_empty() {
            return Err(UserValidationError::PasswordLength {
                min: PASSWORD_MIN,
                max: PASSWORD_MAX,
            });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Accept a new password, enforcing the length policy. Used for
    /// registration and password resets.
    pub fn for_registration(raw: &str) -> Result<Self, UserValidationError> {
        let length = raw.chars().count();
        if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&length) {
            return Err(UserValidationError::PasswordLength {
                min: PASSWORD_MIN,
                max: PASSWORD_MAX,
            });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Expose the secret for hashing.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Validated registration input.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Display name.
    pub name: UserName,
    /// Unique login email.
    pub email: Email,
    /// New password.
    pub password: Password,
    /// Requested role.
    pub role: Role,
}

impl Registration {
    /// Validate raw registration fields.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            name: UserName::new(name)?,
            email: Email::new(email)?,
            password: Password::for_registration(password)?,
            role: role.parse()?,
        })
    }
}

/// Validated login input.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    /// Account email.
    pub email: Email,
    /// Candidate password.
    pub password: Password,
}

impl LoginCredentials {
    /// Validate raw login fields.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, UserValidationError> {
        Ok(Self {
            email: Email::new(email)?,
            password: Password::for_login(password)?,
        })
    }
}

/// Partial profile update. At least one field must be present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// Replacement name.
    pub name: Option<UserName>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement photo URL.
    pub photo_url: Option<String>,
}

impl ProfileUpdate {
    /// Whether the update carries no changes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.photo_url.is_none()
    }
}

/// User aggregate as read from storage.
///
/// `enroll_courses` is derived from the enrollment relation, never stored on
/// the user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: UserName,
    email: Email,
    password_hash: Option<PasswordHash>,
    role: Role,
    photo_url: Option<String>,
    description: Option<String>,
    enroll_courses: BTreeSet<CourseId>,
    password_reset: Option<PasswordReset>,
}

/// Field bundle for [`User::new`].
#[derive(Debug, Clone)]
pub struct UserDraft {
    /// Identifier.
    pub id: UserId,
    /// Display name.
    pub name: UserName,
    /// Login email.
    pub email: Email,
    /// Stored hash, absent for social sign-in accounts.
    pub password_hash: Option<PasswordHash>,
    /// Account role.
    pub role: Role,
    /// Profile photo URL.
    pub photo_url: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
}

impl User {
    /// Build a user with an empty enrollment set.
    #[must_use]
    pub fn new(draft: UserDraft) -> Self {
        let UserDraft {
            id,
            name,
            email,
            password_hash,
            role,
            photo_url,
            description,
        } = draft;
        Self {
            id,
            name,
            email,
            password_hash,
            role,
            photo_url,
            description,
            enroll_courses: BTreeSet::new(),
            password_reset: None,
        }
    }

    /// Attach the stored password-reset state.
    #[must_use]
    pub fn with_password_reset(mut self, reset: Option<PasswordReset>) -> Self {
        self.password_reset = reset;
        self
    }

    /// Replace the stored password hash.
    #[must_use]
    pub fn with_password_hash(mut self, hash: PasswordHash) -> Self {
        self.password_hash = Some(hash);
        self
    }

    /// Attach the enrollment set derived from storage.
    #[must_use]
    pub fn with_enrollments(mut self, courses: impl IntoIterator<Item = CourseId>) -> Self {
        self.enroll_courses = courses.into_iter().collect();
        self
    }

    /// Apply a profile update in place.
    pub fn apply_profile(&mut self, update: ProfileUpdate) {
        let ProfileUpdate {
            name,
            description,
            photo_url,
        } = update;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = description {
            self.description = Some(description);
        }
        if let Some(photo_url) = photo_url {
            self.photo_url = Some(photo_url);
        }
    }

    /// Identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &UserName {
        &self.name
    }

    /// Login email.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Stored password hash.
    #[must_use]
    pub const fn password_hash(&self) -> Option<&PasswordHash> {
        self.password_hash.as_ref()
    }

    /// Account role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Profile photo URL.
    #[must_use]
    pub fn photo_url(&self) -> Option<&str> {
        self.photo_url.as_deref()
    }

    /// Free-text description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Courses the user has paid for.
    #[must_use]
    pub const fn enroll_courses(&self) -> &BTreeSet<CourseId> {
        &self.enroll_courses
    }

    /// Outstanding password reset, if any.
    #[must_use]
    pub const fn password_reset(&self) -> Option<&PasswordReset> {
        self.password_reset.as_ref()
    }
}
