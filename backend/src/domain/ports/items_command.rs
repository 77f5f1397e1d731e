//! Driving port for pantry item mutations.

use async_trait::async_trait;

use crate::domain::item::ItemId;
use crate::domain::{Error, UserId};

/// Raw add-item payload carried from the inbound adapter.
///
/// Field validation happens in the command service via the domain
/// constructors, so the adapter only deals in strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddItemRequest {
    /// Food name as entered.
    pub name: String,
    /// Expiry date text; must parse as `YYYY-MM-DD`.
    pub expiry: String,
}

/// Domain use-case port for adding and removing pantry items.
#[async_trait]
pub trait ItemsCommand: Send + Sync {
    /// Validate and insert a new item for the owner, returning its id.
    async fn add_item(&self, owner: &UserId, request: AddItemRequest) -> Result<ItemId, Error>;

    /// Remove an item; removing an id that is already gone succeeds.
    async fn remove_item(&self, id: ItemId) -> Result<(), Error>;
}

/// Items stub used when no database is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureItemsCommand;

#[async_trait]
impl ItemsCommand for FixtureItemsCommand {
    async fn add_item(&self, _owner: &UserId, _request: AddItemRequest) -> Result<ItemId, Error> {
        Ok(ItemId::random())
    }

    async fn remove_item(&self, _id: ItemId) -> Result<(), Error> {
        Ok(())
    }
}
