//! # Cantine API Main Entry Point
//!
//! This is the main entry point for the Cantine API service.

use migration::MigratorTrait;

use cantine::{config::ConfigLoader, db::init_pool, seeds, server::run_server, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from layered env files and variables
    let config_loader = ConfigLoader::new();
    let config = config_loader.load()?;

    telemetry::init_tracing(&config)?;

    tracing::info!(profile = config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(configuration = redacted_json, "Effective configuration");
    }

    let db = init_pool(&config).await?;
    migration::Migrator::up(&db, None).await?;

    if config.seed_demo_data {
        seeds::seed_demo_data(&db).await?;
    }

    run_server(config, db).await
}
