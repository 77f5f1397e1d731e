//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{Error, SignupRequest, UserId};

/// Domain use-case port for creating accounts.
#[async_trait]
pub trait SignupService: Send + Sync {
    /// Register a new account and return its user id.
    ///
    /// A username that is already taken yields a conflict error.
    async fn register(&self, request: SignupRequest) -> Result<UserId, Error>;
}

/// Registration stub used when no database is wired.
///
/// Accepts any valid payload and returns a fixed user id.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSignupService;

#[async_trait]
impl SignupService for FixtureSignupService {
    async fn register(&self, _request: SignupRequest) -> Result<UserId, Error> {
        UserId::new(super::login_service::FIXTURE_USER_ID)
            .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))
    }
}
