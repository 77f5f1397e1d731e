//! Driven port for sending expiry reminder emails.
//!
//! The domain owns the reminder shape and message templates so adapters stay
//! transport-only. Delivery is best effort: no retry, no deduplication, and
//! the caller is required to swallow every error after logging it.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::item::ItemName;
use crate::domain::EmailAddress;

use super::define_port_error;

/// Which exact-day trigger produced a reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderKind {
    /// The item has exactly seven days left.
    SevenDay,
    /// The item expires tomorrow.
    Urgent,
}

/// One reminder message addressed to an item's owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    /// Recipient address.
    pub to: EmailAddress,
    /// Name of the item approaching expiry.
    pub item_name: ItemName,
    /// The item's expiry date.
    pub expiry: NaiveDate,
    /// Trigger that produced this reminder.
    pub kind: ReminderKind,
}

impl Reminder {
    /// Subject line for the reminder email.
    #[must_use]
    pub fn subject(&self) -> String {
        match self.kind {
            ReminderKind::SevenDay => {
                format!("{} expires in a week", self.item_name)
            }
            ReminderKind::Urgent => format!("{} expires tomorrow", self.item_name),
        }
    }

    /// Plain-text body for the reminder email.
    #[must_use]
    pub fn body(&self) -> String {
        match self.kind {
            ReminderKind::SevenDay => format!(
                "Heads up: {} in your pantry expires on {}. Plan to use it soon.",
                self.item_name, self.expiry
            ),
            ReminderKind::Urgent => format!(
                "Last call: {} in your pantry expires on {}. Use it today or tomorrow.",
                self.item_name, self.expiry
            ),
        }
    }
}

define_port_error! {
    /// Errors surfaced while sending a reminder.
    pub enum NotifierError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "reminder transport failed: {message}",
        /// The send exceeded its bounded timeout.
        Timeout { message: String } =>
            "reminder send timed out: {message}",
        /// The provider refused the message.
        Rejected { message: String } =>
            "reminder rejected by provider: {message}",
    }
}

/// Port for dispatching one reminder email.
///
/// Adapters must bound the call with a timeout so a slow provider cannot
/// stall a pantry view.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReminderNotifier: Send + Sync {
    /// Send one reminder.
    async fn notify(&self, reminder: &Reminder) -> Result<(), NotifierError>;
}

/// Notifier used when email delivery is not configured.
///
/// Reports success after logging at debug, making the send a no-op rather
/// than an error, per the deployment contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReminderNotifier;

#[async_trait]
impl ReminderNotifier for NoopReminderNotifier {
    async fn notify(&self, reminder: &Reminder) -> Result<(), NotifierError> {
        tracing::debug!(
            recipient = %reminder.to,
            item = %reminder.item_name,
            "email delivery unconfigured; dropping reminder"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::EmailAddress;
    use rstest::rstest;

    fn reminder(kind: ReminderKind) -> Reminder {
        Reminder {
            to: EmailAddress::new("alice@example.com").expect("valid email"),
            item_name: ItemName::new("Greek yoghurt").expect("valid name"),
            expiry: NaiveDate::from_ymd_opt(2024, 3, 9).expect("valid date"),
            kind,
        }
    }

    #[rstest]
    #[case(ReminderKind::SevenDay, "expires in a week")]
    #[case(ReminderKind::Urgent, "expires tomorrow")]
    fn subject_names_the_trigger(#[case] kind: ReminderKind, #[case] needle: &str) {
        assert!(reminder(kind).subject().contains(needle));
    }

    #[rstest]
    #[case(ReminderKind::SevenDay)]
    #[case(ReminderKind::Urgent)]
    fn body_includes_item_and_date(#[case] kind: ReminderKind) {
        let body = reminder(kind).body();
        assert!(body.contains("Greek yoghurt"));
        assert!(body.contains("2024-03-09"));
    }

    #[tokio::test]
    async fn noop_notifier_always_succeeds() {
        let notifier = NoopReminderNotifier;
        assert!(notifier.notify(&reminder(ReminderKind::Urgent)).await.is_ok());
    }
}
