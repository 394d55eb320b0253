//! Userbook entry-point: loads settings, prepares the user store and serves
//! the HTML workflows.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use userbook::inbound::http::health::HealthState;
use userbook::outbound::persistence::{DbPool, apply_migrations};
use userbook::settings::AppSettings;

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

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let mut config = ServerConfig::new(bind_addr);

    match settings.pool_config() {
        Some(pool_config) => {
            if settings.skip_migrations {
                info!("skipping database migrations");
            } else {
                let applied = apply_migrations(pool_config.database_url().to_owned())
                    .await
                    .map_err(std::io::Error::other)?;
                info!(applied, "database migrations complete");
            }
            let pool = DbPool::new(pool_config)
                .await
                .map_err(|e| std::io::Error::other(e.into_message()))?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database url configured; users are kept in memory"),
    }

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
