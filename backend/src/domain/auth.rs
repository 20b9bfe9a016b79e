//! Authentication primitives: login credentials, sign-up payloads and the
//! identity recovered from a bearer token.
//!
//! Inbound payload parsing stays outside the domain; handlers call these
//! constructors before talking to a driving port.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{EmailAddress, UserId, UserValidationError, Username};

/// Domain error returned when login or sign-up values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
    /// Name or email failed user validation.
    InvalidUser(UserValidationError),
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "name must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::InvalidUser(inner) => inner.fmt(f),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

impl From<UserValidationError> for CredentialsValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::InvalidUser(value)
    }
}

fn require_password(password: &str) -> Result<Zeroizing<String>, CredentialsValidationError> {
    if password.is_empty() {
        return Err(CredentialsValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(password.to_owned()))
}

/// Validated login credentials.
///
/// ## Invariants
/// - `name` is trimmed and non-empty. It is not checked against the
///   sign-up rules so that legacy names still reach the lookup.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use showcase::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" alice ", "hunter22").unwrap();
/// assert_eq!(creds.name(), "alice");
/// assert_eq!(creds.password(), "hunter22");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    name: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(name: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let normalized = name.trim();
        if normalized.is_empty() {
            return Err(CredentialsValidationError::EmptyUsername);
        }
        Ok(Self {
            name: normalized.to_owned(),
            password: require_password(password)?,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated sign-up payload. The password is still plaintext here and is
/// hashed by the account service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    name: Username,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Construct a registration from raw inputs.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let name = Username::new(name.trim())?;
        let email = EmailAddress::new(email)?;
        Ok(Self {
            name,
            email,
            password: require_password(password)?,
        })
    }

    pub fn name(&self) -> &Username {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Identity carried by a bearer token and attached to authenticated requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user_id: UserId,
    name: String,
}

impl Identity {
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// Signed bearer token handed to clients after a successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}
