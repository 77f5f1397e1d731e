//! Pantry item command service.
//!
//! Implements the add/remove driving port. Adding an item validates the raw
//! payload through the domain constructors, resolves its display image
//! eagerly (the pantry view backfills lazily if this fails), and stamps the
//! added-on date from the injected clock.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use serde_json::json;
use tracing::warn;

use crate::domain::item::{ItemId, ItemName, NewFoodItem, EXPIRY_FORMAT};
use crate::domain::ports::{
    AddItemRequest, ImageSource, ItemRepository, ItemRepositoryError, ItemsCommand,
};
use crate::domain::{Error, UserId};

fn map_repository_error(error: ItemRepositoryError) -> Error {
    match error {
        ItemRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("item store unavailable: {message}"))
        }
        ItemRepositoryError::Query { message } => {
            Error::internal(format!("item store error: {message}"))
        }
    }
}

/// Item command service implementing the add/remove driving port.
#[derive(Clone)]
pub struct ItemsCommandService {
    items: Arc<dyn ItemRepository>,
    images: Arc<dyn ImageSource>,
    clock: Arc<dyn Clock>,
}

impl ItemsCommandService {
    /// Create the service from its item store, image source, and clock.
    pub fn new(
        items: Arc<dyn ItemRepository>,
        images: Arc<dyn ImageSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            items,
            images,
            clock,
        }
    }
}

#[async_trait]
impl ItemsCommand for ItemsCommandService {
    async fn add_item(&self, owner: &UserId, request: AddItemRequest) -> Result<ItemId, Error> {
        let name = ItemName::new(&request.name).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": "name" }))
        })?;
        let expiry = NaiveDate::parse_from_str(&request.expiry, EXPIRY_FORMAT).map_err(|_| {
            Error::invalid_request("expiry must be a YYYY-MM-DD date")
                .with_details(json!({ "field": "expiry" }))
        })?;

        // Resolve eagerly so the first pantry view already has the image.
        // On failure the image stays empty and the view's backfill retries.
        let image = match self.images.resolve(&name).await {
            Ok(url) => Some(url),
            Err(error) => {
                warn!(name = %name, %error, "image lookup failed at add time");
                None
            }
        };

        let item = NewFoodItem {
            owner: owner.clone(),
            name,
            expiry: expiry.format(EXPIRY_FORMAT).to_string(),
            image,
            added_on: self.clock.utc().date_naive(),
        };

        self.items
            .insert(&item)
            .await
            .map_err(map_repository_error)
    }

    async fn remove_item(&self, id: ItemId) -> Result<(), Error> {
        self.items.delete(id).await.map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "items_service_tests.rs"]
mod tests;
