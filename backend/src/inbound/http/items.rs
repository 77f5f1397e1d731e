//! Pantry item mutation handlers.
//!
//! ```text
//! POST   /api/v1/items {"name":"Apples","expiry":"2024-03-09"}
//! DELETE /api/v1/items/{id}
//! ```

use actix_web::{delete, post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::item::ItemId;
use crate::domain::ports::AddItemRequest;
use crate::domain::Error;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Add-item request body for `POST /api/v1/items`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddItemBody {
    /// Food name as entered.
    pub name: String,
    /// Expiry date in `YYYY-MM-DD` form.
    pub expiry: String,
}

/// Response body carrying the created item id.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedItemResponse {
    /// Store-assigned item identifier.
    pub id: String,
}

/// Add a food item to the session user's pantry.
#[utoipa::path(
    post,
    path = "/api/v1/items",
    request_body = AddItemBody,
    responses(
        (status = 201, description = "Item created", body = CreatedItemResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Item store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["items"],
    operation_id = "addItem"
)]
#[post("/items")]
pub async fn add_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AddItemBody>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let body = payload.into_inner();
    let id = state
        .items
        .add_item(
            &owner,
            AddItemRequest {
                name: body.name,
                expiry: body.expiry,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(CreatedItemResponse { id: id.to_string() }))
}

/// Remove a food item.
///
/// Removal is idempotent: deleting an id that is already gone still answers
/// 204.
#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    responses(
        (status = 204, description = "Item removed"),
        (status = 400, description = "Malformed item id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Item store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["items"],
    operation_id = "removeItem"
)]
#[delete("/items/{id}")]
pub async fn remove_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let id = ItemId::parse(&path.into_inner())
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    state.items.remove_item(id).await?;
    Ok(HttpResponse::NoContent().finish())
}
