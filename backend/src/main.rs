//! Backend entry-point: loads settings, applies migrations and serves the API.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ecoband::inbound::http::auth_config::{BuildMode, auth_settings_from_env};
use ecoband::inbound::http::health::HealthState;
use ecoband::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use ecoband::settings::ServerSettings;
use server::{ServerConfig, create_server};

fn config_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {err}"))
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

    let settings = ServerSettings::load().map_err(|err| config_error("invalid settings", err))?;
    let auth = auth_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|err| config_error("invalid token configuration", err))?;
    info!(fingerprint = %auth.fingerprint, "bearer token secret loaded");

    let bind_addr = settings
        .bind_addr()
        .map_err(|err| config_error("invalid bind address", err))?;
    let mut config = ServerConfig::new(bind_addr, Arc::new(auth.tokens))
        .with_buzzer_reset(settings.buzzer_reset());

    if let Some(database_url) = settings.database_url.as_deref() {
        run_pending_migrations(database_url)
            .await
            .map_err(|err| config_error("migrations failed", err))?;
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .map_err(|err| config_error("database pool", err))?;
        config = config.with_db_pool(pool);
    }

    if let Some(channel) = settings
        .thingspeak_channel()
        .map_err(|err| config_error("invalid ThingSpeak settings", err))?
    {
        config = config.with_thingspeak(channel, Some(settings.thingspeak_timeout()));
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting server");
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
