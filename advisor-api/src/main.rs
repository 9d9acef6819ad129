//! Course Advisor - Main Application Entry Point
//!
//! Serves rule-based course recommendations over a catalog and policy
//! table loaded at startup.

use advisor_api::{AppState, Config, StorageType};
use advisor_storage::{CatalogSource, CsvCatalogSource, InMemoryCatalogSource};
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,advisor_engine=debug,advisor_api=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Invalid configuration")?;

    tracing::info!("Starting Course Advisor server on {}", config.bind_addr());

    // Initialize catalog source
    let source: Arc<dyn CatalogSource> = match config.storage_type {
        StorageType::Csv => {
            tracing::info!(
                "Reading catalog from {} and {}",
                config.courses_csv.display(),
                config.policies_csv.display()
            );
            Arc::new(CsvCatalogSource::new(&config.courses_csv, &config.policies_csv))
        }
        StorageType::Memory => {
            tracing::info!("Initializing InMemory catalog...");
            Arc::new(InMemoryCatalogSource::new())
        }
    };

    // Create shared application state
    let app_state = Arc::new(AppState::load(source).await);

    // Build our application with routes
    let app = advisor_api::create_router(app_state);

    // Run it
    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;
    axum::serve(listener, app).await?;

    Ok(())
}
