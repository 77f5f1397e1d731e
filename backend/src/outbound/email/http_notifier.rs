//! Reqwest-backed transactional email adapter.
//!
//! Sends reminders through a SendGrid-style mail-send API: a bearer-keyed
//! JSON POST with personalizations, sender, subject, and a plain-text body.
//! The adapter owns transport details only; message templating lives on the
//! domain [`Reminder`] type.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;
use serde_json::{json, Value};

use crate::domain::ports::{NotifierError, Reminder, ReminderNotifier};
use crate::domain::EmailAddress;

/// Default bound on one reminder send.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Email adapter performing authenticated POST requests against one
/// mail-send endpoint.
pub struct HttpReminderNotifier {
    client: Client,
    endpoint: Url,
    api_key: String,
    sender: EmailAddress,
}

impl HttpReminderNotifier {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: String,
        sender: EmailAddress,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            sender,
        })
    }
}

#[async_trait]
impl ReminderNotifier for HttpReminderNotifier {
    async fn notify(&self, reminder: &Reminder) -> Result<(), NotifierError> {
        let payload = build_payload(&self.sender, reminder);
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.as_str())
            .json(&payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.unwrap_or_default();
        Err(map_status_error(status, body.as_ref()))
    }
}

/// Assemble the provider payload for one reminder.
fn build_payload(sender: &EmailAddress, reminder: &Reminder) -> Value {
    json!({
        "personalizations": [{ "to": [{ "email": reminder.to.as_ref() }] }],
        "from": { "email": sender.as_ref() },
        "subject": reminder.subject(),
        "content": [{ "type": "text/plain", "value": reminder.body() }],
    })
}

fn map_transport_error(error: reqwest::Error) -> NotifierError {
    if error.is_timeout() {
        NotifierError::timeout(error.to_string())
    } else {
        NotifierError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> NotifierError {
    let preview = String::from_utf8_lossy(body)
        .chars()
        .take(160)
        .collect::<String>();
    let message = if preview.trim().is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview.trim())
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            NotifierError::timeout(message)
        }
        _ if status.is_client_error() => NotifierError::rejected(message),
        _ => NotifierError::transport(message),
    }
}
