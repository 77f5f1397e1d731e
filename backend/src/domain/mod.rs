//! Domain primitives, services, and ports.
//!
//! Purpose: define strongly typed domain entities and the use-case services
//! that orchestrate them behind hexagonal ports. Types stay immutable and
//! document their invariants and serialisation contracts (serde) in each
//! type's Rustdoc; adapters live in `inbound`/`outbound`.

pub mod auth;
pub mod auth_service;
pub mod error;
pub mod item;
pub mod items_service;
pub mod pantry_service;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    LoginCredentials, LoginValidationError, SignupRequest, SignupValidationError, PASSWORD_MIN,
};
pub use self::auth_service::AuthService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::item::{
    EnrichedItem, ExpiryStatus, FoodItem, ImageUrl, ItemId, ItemName, ItemValidationError,
    NewFoodItem, PantryStats, PantryView,
};
pub use self::items_service::ItemsCommandService;
pub use self::pantry_service::{PantryPorts, PantryService};
pub use self::trace_id::TraceId;
pub use self::user::{
    EmailAddress, PasswordHash, User, UserId, UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
