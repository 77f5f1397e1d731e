//! Pantry backend entry-point: configuration, pool setup, and server start.

use std::net::SocketAddr;

use actix_web::web;
use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use mockable::{DefaultEnv, Env};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::{session_settings_from_env, BuildMode};
use backend::outbound::persistence::{DbPool, PoolConfig};

mod server;

use server::{EmailProviderSettings, ImageProviderSettings, ServerConfig};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

const BIND_ADDR_ENV: &str = "BIND_ADDR";
const DATABASE_URL_ENV: &str = "DATABASE_URL";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let bind_addr: SocketAddr = env
        .string(BIND_ADDR_ENV)
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned())
        .parse()
        .map_err(|err| std::io::Error::other(format!("invalid {BIND_ADDR_ENV}: {err}")))?;

    let db_pool = match env.string(DATABASE_URL_ENV) {
        Some(database_url) => {
            run_migrations(database_url.clone()).await?;
            let pool = DbPool::new(PoolConfig::new(database_url))
                .await
                .map_err(|err| std::io::Error::other(format!("pool setup failed: {err}")))?;
            Some(pool)
        }
        None => {
            warn!("DATABASE_URL not set; serving fixture data only");
            None
        }
    };

    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    )
    .with_db_pool(db_pool)
    .with_image_provider(ImageProviderSettings::from_env(&env))
    .with_email_provider(EmailProviderSettings::from_env(&env));

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(make_metrics()?));

    info!(%bind_addr, "starting pantry backend");
    let health_state = web::Data::new(HealthState::new());
    let server = server::create_server(health_state, config)?;
    server.await
}

/// Apply pending SQL migrations over a short-lived synchronous connection.
async fn run_migrations(database_url: String) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&database_url)
            .map_err(|err| std::io::Error::other(format!("database connection failed: {err}")))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|applied| {
                if !applied.is_empty() {
                    info!(count = applied.len(), "applied pending migrations");
                }
            })
            .map_err(|err| std::io::Error::other(format!("migrations failed: {err}")))
    })
    .await
    .map_err(|err| std::io::Error::other(format!("migration task failed: {err}")))?
}

#[cfg(feature = "metrics")]
fn make_metrics() -> std::io::Result<actix_web_prom::PrometheusMetrics> {
    actix_web_prom::PrometheusMetricsBuilder::new("pantry")
        .endpoint("/metrics")
        .build()
        .map_err(|err| std::io::Error::other(format!("metrics setup failed: {err}")))
}
