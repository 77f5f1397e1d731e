//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use backend::domain::EmailAddress;
use backend::outbound::email::DEFAULT_SEND_TIMEOUT;
use backend::outbound::image::DEFAULT_LOOKUP_TIMEOUT;
use backend::outbound::persistence::DbPool;
use mockable::Env;
use tracing::warn;
use url::Url;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const IMAGE_KEY_ENV: &str = "IMAGE_SEARCH_API_KEY";
const IMAGE_ENDPOINT_ENV: &str = "IMAGE_SEARCH_ENDPOINT";
const DEFAULT_IMAGE_ENDPOINT: &str = "https://pixabay.com/api/";

const EMAIL_KEY_ENV: &str = "EMAIL_API_KEY";
const EMAIL_SENDER_ENV: &str = "EMAIL_SENDER";
const EMAIL_ENDPOINT_ENV: &str = "EMAIL_API_ENDPOINT";
const DEFAULT_EMAIL_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

/// Image-search provider settings; absence disables the lookup.
#[derive(Clone, Debug)]
pub struct ImageProviderSettings {
    /// Provider endpoint.
    pub endpoint: Url,
    /// Provider API key.
    pub api_key: String,
    /// Bound on one lookup.
    pub timeout: Duration,
}

impl ImageProviderSettings {
    /// Read image provider settings from the environment.
    ///
    /// Returns `None` (lookups disabled, fallback image everywhere) when no
    /// API key is configured or the endpoint does not parse.
    pub fn from_env<E: Env>(env: &E) -> Option<Self> {
        let api_key = env.string(IMAGE_KEY_ENV)?;
        let raw_endpoint = env
            .string(IMAGE_ENDPOINT_ENV)
            .unwrap_or_else(|| DEFAULT_IMAGE_ENDPOINT.to_owned());
        let endpoint = match Url::parse(&raw_endpoint) {
            Ok(url) => url,
            Err(error) => {
                warn!(endpoint = %raw_endpoint, %error, "image endpoint invalid; lookups disabled");
                return None;
            }
        };
        Some(Self {
            endpoint,
            api_key,
            timeout: DEFAULT_LOOKUP_TIMEOUT,
        })
    }
}

/// Transactional email provider settings; absence disables reminders.
#[derive(Clone, Debug)]
pub struct EmailProviderSettings {
    /// Provider mail-send endpoint.
    pub endpoint: Url,
    /// Provider API key.
    pub api_key: String,
    /// Verified sender address.
    pub sender: EmailAddress,
    /// Bound on one send.
    pub timeout: Duration,
}

impl EmailProviderSettings {
    /// Read email provider settings from the environment.
    ///
    /// Returns `None` (reminders become no-ops) unless both an API key and a
    /// valid sender address are configured.
    pub fn from_env<E: Env>(env: &E) -> Option<Self> {
        let api_key = env.string(EMAIL_KEY_ENV)?;
        let sender = match env.string(EMAIL_SENDER_ENV).map(EmailAddress::new) {
            Some(Ok(sender)) => sender,
            Some(Err(error)) => {
                warn!(%error, "email sender invalid; reminders disabled");
                return None;
            }
            None => {
                warn!("email sender unset; reminders disabled");
                return None;
            }
        };
        let raw_endpoint = env
            .string(EMAIL_ENDPOINT_ENV)
            .unwrap_or_else(|| DEFAULT_EMAIL_ENDPOINT.to_owned());
        let endpoint = match Url::parse(&raw_endpoint) {
            Ok(url) => url,
            Err(error) => {
                warn!(endpoint = %raw_endpoint, %error, "email endpoint invalid; reminders disabled");
                return None;
            }
        };
        Some(Self {
            endpoint,
            api_key,
            sender,
            timeout: DEFAULT_SEND_TIMEOUT,
        })
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) image_provider: Option<ImageProviderSettings>,
    pub(crate) email_provider: Option<EmailProviderSettings>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            image_provider: None,
            email_provider: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, the server uses database-backed implementations for
    /// every port; otherwise it falls back to fixtures.
    #[must_use]
    pub fn with_db_pool(mut self, pool: Option<DbPool>) -> Self {
        self.db_pool = pool;
        self
    }

    /// Attach image-search provider settings.
    #[must_use]
    pub fn with_image_provider(mut self, settings: Option<ImageProviderSettings>) -> Self {
        self.image_provider = settings;
        self
    }

    /// Attach transactional email provider settings.
    #[must_use]
    pub fn with_email_provider(mut self, settings: Option<EmailProviderSettings>) -> Self {
        self.email_provider = settings;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
