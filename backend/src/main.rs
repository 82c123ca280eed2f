//! Tracker server entry-point: loads settings, prepares persistence and
//! serves the REST API with its OpenAPI docs.

mod server;

use std::ffi::OsString;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use tracker::inbound::http::health::HealthState;
use tracker::inbound::http::session_config::{BuildMode, session_settings_from_env};
use tracker::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use tracker::settings::TrackerSettings;

fn load_settings(args: impl IntoIterator<Item = OsString>) -> std::io::Result<TrackerSettings> {
    TrackerSettings::load_from_iter(args)
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))
}

async fn build_pool(database_url: &str) -> std::io::Result<DbPool> {
    run_pending_migrations(database_url)
        .await
        .map_err(std::io::Error::other)?;
    DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|err| std::io::Error::other(format!("database pool failed: {err}")))
}

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

    let settings = load_settings(std::env::args_os())?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(fingerprint = %session.fingerprint(), "session key loaded");

    let bind_addr = settings.bind_address().map_err(std::io::Error::other)?;
    let auth = settings.auth_backend().map_err(std::io::Error::other)?;
    let mut config = ServerConfig::new(session.key, session.cookie_secure, session.same_site, bind_addr)
        .with_auth(auth, settings.fixture_password());
    if let Some(url) = settings.database_url.as_deref() {
        config = config.with_db_pool(build_pool(url).await?);
    }
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(server::metrics::default_metrics());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "tracker listening");
    server.await
}
