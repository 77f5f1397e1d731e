//! Port abstraction for pantry item persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::item::{FoodItem, ImageUrl, ItemId, NewFoodItem};
use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by item repository adapters.
    pub enum ItemRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "item repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "item repository query failed: {message}",
    }
}

/// Port for the pantry item store.
///
/// No transactions: every operation touches a single record. `delete` is
/// idempotent; removing an id that is already gone succeeds silently, so
/// concurrent passes over the same pantry cannot trip each other up.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Fetch every item belonging to one owner, in no particular order.
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<FoodItem>, ItemRepositoryError>;

    /// Insert a new item and return its store-assigned identifier.
    async fn insert(&self, item: &NewFoodItem) -> Result<ItemId, ItemRepositoryError>;

    /// Remove an item if present; a missing id is a successful no-op.
    async fn delete(&self, id: ItemId) -> Result<(), ItemRepositoryError>;

    /// Backfill the display image for an item.
    async fn update_image(&self, id: ItemId, image: &ImageUrl) -> Result<(), ItemRepositoryError>;
}
