//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod image_source;
mod item_repository;
mod items_command;
mod login_service;
mod pantry_query;
mod reminder_notifier;
mod signup_service;
mod user_repository;

#[cfg(test)]
pub use image_source::MockImageSource;
pub use image_source::{
    fallback_image, ImageSource, ImageSourceError, UnconfiguredImageSource, FALLBACK_IMAGE_URL,
};
#[cfg(test)]
pub use item_repository::MockItemRepository;
pub use item_repository::{ItemRepository, ItemRepositoryError};
pub use items_command::{AddItemRequest, FixtureItemsCommand, ItemsCommand};
pub use login_service::{
    FixtureLoginService, LoginService, FIXTURE_PASSWORD, FIXTURE_USERNAME, FIXTURE_USER_ID,
};
pub use pantry_query::{FixturePantryQuery, PantryQuery};
#[cfg(test)]
pub use reminder_notifier::MockReminderNotifier;
pub use reminder_notifier::{
    NoopReminderNotifier, NotifierError, Reminder, ReminderKind, ReminderNotifier,
};
pub use signup_service::{FixtureSignupService, SignupService};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
