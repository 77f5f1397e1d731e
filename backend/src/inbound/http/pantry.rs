//! Pantry view handler.
//!
//! `GET /api/v1/pantry` runs the expiry reconciler for the session user and
//! returns the enriched items plus bucket counters. Reconciliation happens on
//! this request path only; there is no background job.

use actix_web::{get, web};

use crate::domain::{Error, PantryView};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Reconcile and return the session user's pantry.
#[utoipa::path(
    get,
    path = "/api/v1/pantry",
    responses(
        (status = 200, description = "Reconciled pantry", body = PantryView),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Item store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["pantry"],
    operation_id = "viewPantry"
)]
#[get("/pantry")]
pub async fn view_pantry(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<PantryView>> {
    let owner = session.require_user_id()?;
    let view = state.pantry.view_pantry(&owner).await?;
    Ok(web::Json(view))
}
