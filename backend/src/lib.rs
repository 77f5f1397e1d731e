//! Pantry backend library: domain core, hexagonal ports, and adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request-scoped trace identifier.
pub use domain::TraceId;
/// Tracing middleware attaching trace ids to requests and responses.
pub use middleware::Trace;
