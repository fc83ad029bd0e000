//! Backend entry-point: loads settings, migrates the database, seeds
//! fixtures and serves the REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use foodgram::AppSettings;
use foodgram::inbound::http::health::HealthState;
use foodgram::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use ortho_config::OrthoConfig;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load configuration")?;
    let database_url = settings.database_url()?;
    let bind_addr = settings.bind_addr()?;

    run_pending_migrations(database_url)
        .await
        .wrap_err("failed to migrate the database")?;
    let db_pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.db_pool_size()))
        .await
        .wrap_err("failed to build the database pool")?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(bind_addr, db_pool).with_settings(&settings);
    let server = create_server(health_state, config, &settings).await?;
    server.await?;
    Ok(())
}
