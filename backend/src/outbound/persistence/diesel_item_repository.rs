//! PostgreSQL-backed `ItemRepository` implementation using Diesel ORM.
//!
//! This adapter persists pantry items and loads them back through validated
//! domain constructors. Deletion is idempotent: removing a row that is
//! already gone affects zero rows and reports success, as the port requires.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::item::{FoodItem, ImageUrl, ItemId, ItemName, NewFoodItem};
use crate::domain::ports::{ItemRepository, ItemRepositoryError};
use crate::domain::UserId;

use super::diesel_helpers::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ItemRow, NewItemRow};
use super::pool::{DbPool, PoolError};
use super::schema::items;

/// Diesel-backed implementation of the item repository port.
#[derive(Clone)]
pub struct DieselItemRepository {
    pool: DbPool,
}

impl DieselItemRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> ItemRepositoryError {
    map_basic_pool_error(error, |message| ItemRepositoryError::connection(message))
}

/// Map Diesel errors to domain repository errors.
fn map_diesel_error(error: diesel::result::Error) -> ItemRepositoryError {
    map_basic_diesel_error(
        error,
        ItemRepositoryError::query,
        ItemRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain item.
///
/// The expiry text is passed through untouched; the reconciler owns parse
/// tolerance for legacy rows.
fn row_to_item(row: ItemRow) -> Result<FoodItem, ItemRepositoryError> {
    let ItemRow {
        id,
        owner_id,
        name,
        expiry,
        image,
        added_on,
        created_at: _,
        updated_at: _,
    } = row;

    let name = ItemName::new(name)
        .map_err(|err| ItemRepositoryError::query(format!("decode item name: {err}")))?;
    let image = image
        .map(|url| {
            ImageUrl::new(url)
                .map_err(|err| ItemRepositoryError::query(format!("decode item image: {err}")))
        })
        .transpose()?;

    Ok(FoodItem::new(
        ItemId::from_uuid(id),
        UserId::from_uuid(owner_id),
        name,
        expiry,
        image,
        added_on,
    ))
}

#[async_trait]
impl ItemRepository for DieselItemRepository {
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<FoodItem>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ItemRow> = items::table
            .filter(items::owner_id.eq(owner.as_uuid()))
            .select(ItemRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_item).collect()
    }

    async fn insert(&self, item: &NewFoodItem) -> Result<ItemId, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewItemRow {
            owner_id: *item.owner.as_uuid(),
            name: item.name.as_ref(),
            expiry: item.expiry.as_str(),
            image: item.image.as_ref().map(AsRef::as_ref),
            added_on: item.added_on,
        };

        let id: Uuid = diesel::insert_into(items::table)
            .values(&new_row)
            .returning(items::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(ItemId::from_uuid(id))
    }

    async fn delete(&self, id: ItemId) -> Result<(), ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Zero affected rows means the item was already gone; still a success.
        diesel::delete(items::table.filter(items::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update_image(&self, id: ItemId, image: &ImageUrl) -> Result<(), ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(items::table.filter(items::id.eq(id.as_uuid())))
            .set(items::image.eq(image.as_ref()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
