mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use data::lead_repository::PostgresLeadRepository;
use data::user_repository::PostgresUserRepository;
use data::vehicle_repository::PostgresVehicleRepository;
use infrastructure::config::AppConfig;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use server::{Services, start_rest_server};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let pool = create_pool(&config.database_url)
        .await
        .context("failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let services = Services::new(
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::new(PostgresVehicleRepository::new(pool.clone())),
        Arc::new(PostgresLeadRepository::new(pool)),
        &config,
    );

    start_rest_server(config, services).await?;
    info!("server stopped");
    Ok(())
}
