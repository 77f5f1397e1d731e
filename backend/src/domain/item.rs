//! Pantry item data model.
//!
//! Items keep their expiry as the raw `YYYY-MM-DD` text the store holds.
//! Parsing happens at reconciliation time so one malformed legacy row cannot
//! poison a whole pantry view; see the reconciler for the skip semantics.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::UserId;

/// Date format used for item expiry and added-on values.
pub const EXPIRY_FORMAT: &str = "%Y-%m-%d";

/// Items expiring within this many days count as "expiring soon".
pub const SOON_WINDOW_DAYS: i64 = 7;

/// Validation errors returned by the item constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    /// The identifier string was not a valid UUID.
    InvalidId,
    /// The item name was empty once trimmed.
    EmptyName,
    /// The item name exceeded the allowed maximum.
    NameTooLong {
        /// Maximum name length in characters.
        max: usize,
    },
    /// The image URL was empty once trimmed.
    EmptyImageUrl,
}

impl fmt::Display for ItemValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "item id must be a valid UUID"),
            Self::EmptyName => write!(f, "item name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "item name must be at most {max} characters")
            }
            Self::EmptyImageUrl => write!(f, "image url must not be empty"),
        }
    }
}

impl std::error::Error for ItemValidationError {}

/// Stable item identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Construct an [`ItemId`] from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random [`ItemId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an [`ItemId`] from its string form.
    pub fn parse(raw: &str) -> Result<Self, ItemValidationError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| ItemValidationError::InvalidId)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum allowed length for an item name.
pub const ITEM_NAME_MAX: usize = 120;

/// Human-entered food name, trimmed and bounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(String);

impl ItemName {
    /// Validate and construct an [`ItemName`] from raw input.
    pub fn new(name: impl AsRef<str>) -> Result<Self, ItemValidationError> {
        Self::from_owned(name.as_ref().trim().to_owned())
    }

    fn from_owned(name: String) -> Result<Self, ItemValidationError> {
        if name.is_empty() {
            return Err(ItemValidationError::EmptyName);
        }
        if name.chars().count() > ITEM_NAME_MAX {
            return Err(ItemValidationError::NameTooLong { max: ITEM_NAME_MAX });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ItemName> for String {
    fn from(value: ItemName) -> Self {
        value.0
    }
}

impl TryFrom<String> for ItemName {
    type Error = ItemValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Display image location for an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Validate and construct an [`ImageUrl`] from raw input.
    pub fn new(url: impl AsRef<str>) -> Result<Self, ItemValidationError> {
        Self::from_owned(url.as_ref().trim().to_owned())
    }

    fn from_owned(url: String) -> Result<Self, ItemValidationError> {
        if url.is_empty() {
            return Err(ItemValidationError::EmptyImageUrl);
        }
        Ok(Self(url))
    }
}

impl AsRef<str> for ImageUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ImageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ImageUrl> for String {
    fn from(value: ImageUrl) -> Self {
        value.0
    }
}

impl TryFrom<String> for ImageUrl {
    type Error = ItemValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Stored pantry item.
///
/// ## Invariants
/// - `id` is store-assigned and immutable.
/// - every item belongs to exactly one `owner`.
/// - `expiry` is kept as raw text; well-formed values use [`EXPIRY_FORMAT`].
///   Rows with unparseable expiry text are tolerated here and skipped by the
///   reconciler rather than deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodItem {
    id: ItemId,
    owner: UserId,
    name: ItemName,
    expiry: String,
    image: Option<ImageUrl>,
    added_on: NaiveDate,
}

impl FoodItem {
    /// Build an item from its stored fields.
    pub fn new(
        id: ItemId,
        owner: UserId,
        name: ItemName,
        expiry: impl Into<String>,
        image: Option<ImageUrl>,
        added_on: NaiveDate,
    ) -> Self {
        Self {
            id,
            owner,
            name,
            expiry: expiry.into(),
            image,
            added_on,
        }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Owning user.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Food name as entered.
    pub fn name(&self) -> &ItemName {
        &self.name
    }

    /// Raw expiry text as stored.
    pub fn expiry_raw(&self) -> &str {
        self.expiry.as_str()
    }

    /// Parse the stored expiry text as a calendar date.
    pub fn parse_expiry(&self) -> Result<NaiveDate, chrono::ParseError> {
        NaiveDate::parse_from_str(self.expiry.as_str(), EXPIRY_FORMAT)
    }

    /// Lazily-populated display image, if resolved already.
    pub fn image(&self) -> Option<&ImageUrl> {
        self.image.as_ref()
    }

    /// Date the item was added, informational only.
    pub fn added_on(&self) -> NaiveDate {
        self.added_on
    }
}

/// Draft for inserting a new item; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFoodItem {
    /// Owning user.
    pub owner: UserId,
    /// Food name as entered.
    pub name: ItemName,
    /// Canonical `YYYY-MM-DD` expiry text.
    pub expiry: String,
    /// Display image resolved at add time, when the lookup succeeded.
    pub image: Option<ImageUrl>,
    /// Date the item was added.
    pub added_on: NaiveDate,
}

/// Expiry bucket for an active item within one reconciliation pass.
///
/// The label is recomputed from the expiry date on every pass and never
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    /// Expiring within [`SOON_WINDOW_DAYS`] days.
    Soon,
    /// Expiring later than the soon window.
    Safe,
}

impl ExpiryStatus {
    /// Classify an active item by its remaining days.
    #[must_use]
    pub fn classify(days_left: i64) -> Self {
        if days_left <= SOON_WINDOW_DAYS {
            Self::Soon
        } else {
            Self::Safe
        }
    }
}

/// Rendering-ready item produced by the reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedItem {
    /// Store-assigned identifier.
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: ItemId,
    /// Food name as entered.
    #[schema(value_type = String, example = "Greek yoghurt")]
    pub name: ItemName,
    /// Parsed expiry date.
    pub expiry: NaiveDate,
    /// Date the item was added.
    pub added_on: NaiveDate,
    /// Whole days between today and expiry; zero on the expiry day itself.
    pub days_left: i64,
    /// Soon/safe bucket for this pass.
    pub status: ExpiryStatus,
    /// Resolved display image, falling back to the static default.
    #[schema(value_type = String, example = "/static/food.png")]
    pub image: ImageUrl,
}

/// Aggregate counters for one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PantryStats {
    /// Active (non-expired) items returned.
    pub total: usize,
    /// Active items with at most [`SOON_WINDOW_DAYS`] days left.
    pub expiring_soon: usize,
    /// Active items beyond the soon window.
    pub safe: usize,
    /// Items deleted by this pass because their expiry had passed.
    pub expired: usize,
}

/// Reconciled pantry summary handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PantryView {
    /// Active items, enriched with days-left and image data.
    pub items: Vec<EnrichedItem>,
    /// Aggregate counters for the pass.
    pub stats: PantryStats,
    /// Reference date the pass was computed against.
    pub today: NaiveDate,
}
