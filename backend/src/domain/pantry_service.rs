//! Pantry reconciliation domain service.
//!
//! Each pantry view reconciles the owner's stored items against today:
//! expired items are deleted, active items are bucketed into soon/safe,
//! missing images are backfilled, and exact-day reminders go out. The pass is
//! snapshot-then-apply: the item list is fetched once, classification is a
//! pure pass over the snapshot, and only then do side effects run, so the
//! store is never mutated while it is being iterated.
//!
//! Failure containment follows the persistence/enrichment split: item and
//! user store errors abort the pass, while image lookups and reminder sends
//! are logged and absorbed so the view always renders.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use futures_util::future::join_all;
use mockable::Clock;
use tracing::warn;

use crate::domain::item::{EnrichedItem, ExpiryStatus, FoodItem, ImageUrl, PantryStats, PantryView, SOON_WINDOW_DAYS};
use crate::domain::ports::{
    fallback_image, ImageSource, ItemRepository, ItemRepositoryError, PantryQuery, Reminder,
    ReminderKind, ReminderNotifier, UserPersistenceError, UserRepository,
};
use crate::domain::{Error, User, UserId};

/// Days-left value that triggers the week-ahead reminder.
const SEVEN_DAY_TRIGGER: i64 = 7;
/// Days-left value that triggers the urgent reminder.
const URGENT_TRIGGER: i64 = 1;

fn map_item_repository_error(error: ItemRepositoryError) -> Error {
    match error {
        ItemRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("item store unavailable: {message}"))
        }
        ItemRepositoryError::Query { message } => {
            Error::internal(format!("item store error: {message}"))
        }
    }
}

fn map_user_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserPersistenceError::Query { message } | UserPersistenceError::DuplicateUsername { username: message } => {
            Error::internal(format!("user store error: {message}"))
        }
    }
}

/// Driven-port bundle required by the reconciler.
#[derive(Clone)]
pub struct PantryPorts {
    /// Item persistence adapter.
    pub items: Arc<dyn ItemRepository>,
    /// User persistence adapter, consulted for the reminder address.
    pub users: Arc<dyn UserRepository>,
    /// Display-image lookup adapter.
    pub images: Arc<dyn ImageSource>,
    /// Reminder email adapter.
    pub notifier: Arc<dyn ReminderNotifier>,
}

/// An item that survived classification for this pass.
struct ActiveItem {
    item: FoodItem,
    expiry: NaiveDate,
    days_left: i64,
}

/// Expiry reconciliation service; implements the pantry view driving port.
#[derive(Clone)]
pub struct PantryService {
    ports: PantryPorts,
    clock: Arc<dyn Clock>,
}

impl PantryService {
    /// Create the service from its port bundle and a clock.
    pub fn new(ports: PantryPorts, clock: Arc<dyn Clock>) -> Self {
        Self { ports, clock }
    }

    /// Reconcile the owner's items against the given reference date.
    ///
    /// State per item is recomputed from its expiry date on every call and
    /// never stored, so two passes with the same `today` and an unchanged
    /// store yield the same view. Deletions of already-removed expired items
    /// are no-ops by the store contract.
    pub async fn reconcile(&self, owner: &UserId, today: NaiveDate) -> Result<PantryView, Error> {
        let user = self
            .ports
            .users
            .find_by_id(owner)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user {owner} not found")))?;

        let snapshot = self
            .ports
            .items
            .list_for_owner(owner)
            .await
            .map_err(map_item_repository_error)?;

        let (active, expired) = classify(snapshot, today);

        let stats = PantryStats {
            total: active.len(),
            expiring_soon: active
                .iter()
                .filter(|entry| entry.days_left <= SOON_WINDOW_DAYS)
                .count(),
            safe: active
                .iter()
                .filter(|entry| entry.days_left > SOON_WINDOW_DAYS)
                .count(),
            expired: expired.len(),
        };

        // Deletes touch disjoint records; run them together. Store failures
        // stay fatal, matching the persistence taxonomy.
        let deletions = join_all(
            expired
                .iter()
                .map(|item| self.ports.items.delete(item.id())),
        )
        .await;
        for result in deletions {
            result.map_err(map_item_repository_error)?;
        }

        let enriched = join_all(
            active
                .into_iter()
                .map(|entry| self.enrich_and_remind(&user, entry)),
        )
        .await;
        let items = enriched.into_iter().collect::<Result<Vec<_>, Error>>()?;

        Ok(PantryView {
            items,
            stats,
            today,
        })
    }

    async fn enrich_and_remind(
        &self,
        user: &User,
        entry: ActiveItem,
    ) -> Result<EnrichedItem, Error> {
        let ActiveItem {
            item,
            expiry,
            days_left,
        } = entry;

        let image = self.backfill_image(&item).await?;
        self.maybe_send_reminder(user, &item, expiry, days_left)
            .await;

        Ok(EnrichedItem {
            id: item.id(),
            name: item.name().clone(),
            expiry,
            added_on: item.added_on(),
            days_left,
            status: ExpiryStatus::classify(days_left),
            image,
        })
    }

    /// Resolve and persist a missing display image.
    ///
    /// Items that already carry an image are returned as-is so the resolver
    /// is not re-invoked for them. Resolver failures fall back to the static
    /// image without persisting it; the next view retries the lookup.
    async fn backfill_image(&self, item: &FoodItem) -> Result<ImageUrl, Error> {
        if let Some(existing) = item.image() {
            return Ok(existing.clone());
        }

        match self.ports.images.resolve(item.name()).await {
            Ok(url) => {
                self.ports
                    .items
                    .update_image(item.id(), &url)
                    .await
                    .map_err(map_item_repository_error)?;
                Ok(url)
            }
            Err(error) => {
                warn!(item = %item.id(), %error, "image lookup failed; using fallback");
                Ok(fallback_image())
            }
        }
    }

    /// Send the exact-day reminder when one is due.
    ///
    /// Reminders repeat on every view of the trigger day; no sent-marker is
    /// persisted. Notifier failures never reach the caller.
    async fn maybe_send_reminder(
        &self,
        user: &User,
        item: &FoodItem,
        expiry: NaiveDate,
        days_left: i64,
    ) {
        let kind = match days_left {
            SEVEN_DAY_TRIGGER => ReminderKind::SevenDay,
            URGENT_TRIGGER => ReminderKind::Urgent,
            _ => return,
        };

        let reminder = Reminder {
            to: user.email().clone(),
            item_name: item.name().clone(),
            expiry,
            kind,
        };
        if let Err(error) = self.ports.notifier.notify(&reminder).await {
            warn!(item = %item.id(), %error, "reminder send failed; continuing");
        }
    }
}

/// Split a snapshot into active and expired items, dropping unparseable rows.
///
/// Rows whose expiry text does not parse are logged and skipped: excluded
/// from the view and the counters but left in the store untouched.
fn classify(snapshot: Vec<FoodItem>, today: NaiveDate) -> (Vec<ActiveItem>, Vec<FoodItem>) {
    let mut active = Vec::new();
    let mut expired = Vec::new();

    for item in snapshot {
        match item.parse_expiry() {
            Err(error) => {
                warn!(
                    item = %item.id(),
                    expiry = item.expiry_raw(),
                    %error,
                    "skipping item with unparseable expiry"
                );
            }
            Ok(expiry) if expiry < today => expired.push(item),
            Ok(expiry) => {
                let days_left = (expiry - today).num_days();
                active.push(ActiveItem {
                    item,
                    expiry,
                    days_left,
                });
            }
        }
    }

    (active, expired)
}

#[async_trait]
impl PantryQuery for PantryService {
    async fn view_pantry(&self, owner: &UserId) -> Result<PantryView, Error> {
        let today = self.clock.utc().date_naive();
        self.reconcile(owner, today).await
    }
}

#[cfg(test)]
#[path = "pantry_service_tests.rs"]
mod tests;
