//! Builders for HTTP state ports with fixture fallbacks.
//!
//! Real, database-backed services are wired when a pool is configured; the
//! fixture ports keep the server useful for front-end work without
//! PostgreSQL. Image and email adapters degrade to their disabled
//! implementations when unconfigured or unconstructible.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::warn;

use backend::domain::ports::{
    FixtureItemsCommand, FixtureLoginService, FixturePantryQuery, FixtureSignupService,
    ImageSource, NoopReminderNotifier, ReminderNotifier, UnconfiguredImageSource,
};
use backend::domain::{
    AuthService, ItemsCommandService, PantryPorts, PantryService,
};
use backend::inbound::http::state::HttpState;
use backend::outbound::email::HttpReminderNotifier;
use backend::outbound::image::HttpImageSource;
use backend::outbound::persistence::{DieselItemRepository, DieselUserRepository};

use super::{EmailProviderSettings, ImageProviderSettings, ServerConfig};

fn build_image_source(settings: Option<&ImageProviderSettings>) -> Arc<dyn ImageSource> {
    match settings {
        Some(settings) => {
            match HttpImageSource::new(
                settings.endpoint.clone(),
                settings.api_key.clone(),
                settings.timeout,
            ) {
                Ok(source) => Arc::new(source),
                Err(error) => {
                    warn!(%error, "image client construction failed; lookups disabled");
                    Arc::new(UnconfiguredImageSource)
                }
            }
        }
        None => Arc::new(UnconfiguredImageSource),
    }
}

fn build_notifier(settings: Option<&EmailProviderSettings>) -> Arc<dyn ReminderNotifier> {
    match settings {
        Some(settings) => {
            match HttpReminderNotifier::new(
                settings.endpoint.clone(),
                settings.api_key.clone(),
                settings.sender.clone(),
                settings.timeout,
            ) {
                Ok(notifier) => Arc::new(notifier),
                Err(error) => {
                    warn!(%error, "email client construction failed; reminders disabled");
                    Arc::new(NoopReminderNotifier)
                }
            }
        }
        None => Arc::new(NoopReminderNotifier),
    }
}

/// Build the shared HTTP state from configured ports and fixture fallbacks.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let images = build_image_source(config.image_provider.as_ref());
    let notifier = build_notifier(config.email_provider.as_ref());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    match &config.db_pool {
        Some(pool) => {
            let items = Arc::new(DieselItemRepository::new(pool.clone()));
            let users = Arc::new(DieselUserRepository::new(pool.clone()));
            let auth = Arc::new(AuthService::new(users.clone()));
            let pantry = Arc::new(PantryService::new(
                PantryPorts {
                    items: items.clone(),
                    users,
                    images: images.clone(),
                    notifier,
                },
                clock.clone(),
            ));
            let items_command = Arc::new(ItemsCommandService::new(items, images, clock));
            web::Data::new(HttpState::new(auth.clone(), auth, pantry, items_command))
        }
        None => web::Data::new(HttpState::new(
            Arc::new(FixtureLoginService),
            Arc::new(FixtureSignupService),
            Arc::new(FixturePantryQuery),
            Arc::new(FixtureItemsCommand),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::domain::item::ItemName;
    use backend::domain::ports::ImageSourceError;
    use backend::domain::ports::{Reminder, ReminderKind};
    use backend::domain::EmailAddress;
    use chrono::NaiveDate;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn missing_image_settings_disable_lookups() {
        let source = build_image_source(None);
        let err = source
            .resolve(&ItemName::new("bananas").expect("valid name"))
            .await
            .expect_err("disabled source reports no results");
        assert!(matches!(err, ImageSourceError::NoResults { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_email_settings_make_reminders_a_no_op() {
        let notifier = build_notifier(None);
        let reminder = Reminder {
            to: EmailAddress::new("alice@example.com").expect("valid email"),
            item_name: ItemName::new("Salmon").expect("valid name"),
            expiry: NaiveDate::from_ymd_opt(2024, 3, 3).expect("valid date"),
            kind: ReminderKind::Urgent,
        };
        assert!(notifier.notify(&reminder).await.is_ok());
    }
}
