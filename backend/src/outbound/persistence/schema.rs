//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// User accounts table.
    ///
    /// Stores registered users with their contact address and password hash.
    /// The `id` column is the primary key (UUID v4); `username` carries a
    /// unique index.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login name (max 32 characters).
        username -> Varchar,
        /// Contact address for expiry reminders.
        email -> Varchar,
        /// Argon2 PHC string; never exposed beyond the auth service.
        password_hash -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Pantry items table.
    ///
    /// Items are scoped to their owner by `owner_id`. There is no foreign
    /// key: deleting a user does not cascade to items.
    items (id) {
        /// Primary key: UUID v4 identifier, database-assigned.
        id -> Uuid,
        /// Owning user id.
        owner_id -> Uuid,
        /// Food name as entered (max 120 characters).
        name -> Varchar,
        /// Expiry date as `YYYY-MM-DD` text; legacy rows may hold
        /// unparseable values, which the reconciler skips.
        expiry -> Varchar,
        /// Lazily backfilled display image URL.
        image -> Nullable<Varchar>,
        /// Date the item was added.
        added_on -> Date,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, items);
