//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer (users, pantry,
//!   items, health)
//! - **Schemas**: Domain payloads and the shared error envelope
//! - **Security**: Session cookie authentication scheme
//!
//! The generated specification is served by Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{EnrichedItem, Error, ErrorCode, ExpiryStatus, PantryStats, PantryView};
use crate::inbound::http::items::{AddItemBody, CreatedItemResponse};
use crate::inbound::http::users::{AccountResponse, LoginBody, SignupBody};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted cookie session established by login or signup",
            ))),
        );
    }
}

/// Public OpenAPI surface used by Swagger UI and tooling.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::inbound::http::users::signup,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::pantry::view_pantry,
        crate::inbound::http::items::add_item,
        crate::inbound::http::items::remove_item,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        PantryView,
        PantryStats,
        EnrichedItem,
        ExpiryStatus,
        SignupBody,
        LoginBody,
        AccountResponse,
        AddItemBody,
        CreatedItemResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "users", description = "Account signup, login, and session"),
        (name = "pantry", description = "Expiry-reconciled pantry view"),
        (name = "items", description = "Pantry item mutations"),
        (name = "health", description = "Probes for orchestration"),
    ),
    security(("SessionCookie" = []))
)]
pub struct ApiDoc;
