//! Driving port for the pantry view use-case.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::item::{PantryStats, PantryView};
use crate::domain::{Error, UserId};

/// Domain use-case port producing the reconciled pantry summary.
#[async_trait]
pub trait PantryQuery: Send + Sync {
    /// Reconcile the owner's items against today and return the summary.
    async fn view_pantry(&self, owner: &UserId) -> Result<PantryView, Error>;
}

/// Pantry stub used when no database is wired; always an empty pantry.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePantryQuery;

#[async_trait]
impl PantryQuery for FixturePantryQuery {
    async fn view_pantry(&self, _owner: &UserId) -> Result<PantryView, Error> {
        Ok(PantryView {
            items: Vec::new(),
            stats: PantryStats::default(),
            today: Utc::now().date_naive(),
        })
    }
}
