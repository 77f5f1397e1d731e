//! Account registration and login over the user repository.
//!
//! Passwords are hashed with Argon2id and a fresh salt at signup; login
//! verifies against the stored PHC string. Wrong username and wrong password
//! produce the same unauthorized error so the endpoint does not leak which
//! accounts exist.

use std::sync::Arc;

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use async_trait::async_trait;
use tracing::{error, instrument, warn};

use crate::domain::ports::{
    LoginService, SignupService, UserPersistenceError, UserRepository,
};
use crate::domain::user::PasswordHash;
use crate::domain::{Error, LoginCredentials, SignupRequest, User, UserId, Username};

fn map_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user store error: {message}"))
        }
        UserPersistenceError::DuplicateUsername { username } => {
            Error::conflict(format!("username already taken: {username}"))
        }
    }
}

/// Authentication service implementing the signup and login driving ports.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
}

impl AuthService {
    /// Create the service over a user repository.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    fn hash_password(password: &str) -> Result<PasswordHash, Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| Error::internal(format!("password hashing failed: {err}")))?
            .to_string();
        PasswordHash::new(hash)
            .map_err(|err| Error::internal(format!("invalid password hash produced: {err}")))
    }
}

#[async_trait]
impl SignupService for AuthService {
    async fn register(&self, request: SignupRequest) -> Result<UserId, Error> {
        let password_hash = Self::hash_password(request.password())?;
        let user = User::new(
            UserId::random(),
            request.username().clone(),
            request.email().clone(),
            password_hash,
        );

        self.users
            .insert(&user)
            .await
            .map_err(map_repository_error)?;
        Ok(user.id().clone())
    }
}

#[async_trait]
impl LoginService for AuthService {
    #[instrument(name = "login attempt", skip(self, credentials), fields(username = credentials.username()))]
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        // A name that fails shape validation cannot exist in the store.
        let Ok(username) = Username::new(credentials.username()) else {
            warn!("login failed: malformed username");
            return Err(Error::unauthorized("invalid credentials"));
        };

        let user = self
            .users
            .find_by_username(&username)
            .await
            .map_err(map_repository_error)?;
        let Some(user) = user else {
            warn!("login failed: unknown user");
            return Err(Error::unauthorized("invalid credentials"));
        };

        let parsed = PhcHash::new(user.password_hash().expose()).map_err(|err| {
            error!(%err, "stored password hash failed to parse");
            Error::internal("stored credentials are unreadable")
        })?;

        if Argon2::default()
            .verify_password(credentials.password().as_bytes(), &parsed)
            .is_err()
        {
            warn!("login failed: wrong password");
            return Err(Error::unauthorized("invalid credentials"));
        }

        Ok(user.id().clone())
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
