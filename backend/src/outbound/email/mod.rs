//! Outbound transactional email adapter.

mod http_notifier;

pub use http_notifier::{HttpReminderNotifier, DEFAULT_SEND_TIMEOUT};
