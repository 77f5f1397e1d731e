//! Authentication primitives such as login credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::user::{EmailAddress, UserValidationError, Username};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("alice", "hunter2!").unwrap();
/// assert_eq!(creds.username(), "alice");
/// assert_eq!(creds.password(), "hunter2!");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Domain error returned when a signup payload is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupValidationError {
    /// The username failed its shape validation.
    InvalidUsername(UserValidationError),
    /// The email address failed its shape validation.
    InvalidEmail(UserValidationError),
    /// Password was blank.
    EmptyPassword,
    /// Password was shorter than the allowed minimum.
    PasswordTooShort {
        /// Minimum password length in characters.
        min: usize,
    },
}

impl fmt::Display for SignupValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUsername(err) => write!(f, "{err}"),
            Self::InvalidEmail(err) => write!(f, "{err}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for SignupValidationError {}

/// Minimum accepted password length for new accounts.
pub const PASSWORD_MIN: usize = 8;

/// Validated signup payload carried from the inbound adapter to the
/// authentication service.
///
/// The raw password stays in a zeroizing buffer until it is hashed; it is
/// never logged and never serialised.
#[derive(Debug, Clone)]
pub struct SignupRequest {
    username: Username,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl SignupRequest {
    /// Construct a signup request from raw string inputs.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, SignupValidationError> {
        let username = Username::new(username).map_err(SignupValidationError::InvalidUsername)?;
        let email = EmailAddress::new(email).map_err(SignupValidationError::InvalidEmail)?;

        if password.is_empty() {
            return Err(SignupValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(SignupValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }

        Ok(Self {
            username,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Requested account username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Contact address for reminder delivery.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Raw password awaiting hashing.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
