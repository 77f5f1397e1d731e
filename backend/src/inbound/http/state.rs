//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ItemsCommand, LoginService, PantryQuery, SignupService};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use backend::domain::ports::{
///     FixtureItemsCommand, FixtureLoginService, FixturePantryQuery, FixtureSignupService,
/// };
/// use backend::inbound::http::state::HttpState;
///
/// let state = HttpState::new(
///     Arc::new(FixtureLoginService),
///     Arc::new(FixtureSignupService),
///     Arc::new(FixturePantryQuery),
///     Arc::new(FixtureItemsCommand),
/// );
/// let _login = state.login.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    /// Login use-case port.
    pub login: Arc<dyn LoginService>,
    /// Signup use-case port.
    pub signup: Arc<dyn SignupService>,
    /// Pantry view use-case port (the reconciler).
    pub pantry: Arc<dyn PantryQuery>,
    /// Item add/remove use-case port.
    pub items: Arc<dyn ItemsCommand>,
}

impl HttpState {
    /// Construct state from its port implementations.
    pub fn new(
        login: Arc<dyn LoginService>,
        signup: Arc<dyn SignupService>,
        pantry: Arc<dyn PantryQuery>,
        items: Arc<dyn ItemsCommand>,
    ) -> Self {
        Self {
            login,
            signup,
            pantry,
            items,
        }
    }
}
