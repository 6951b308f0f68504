//! Instance Advisor - cloud instance recommendation service
//!
//! Loads the rule tables and instance catalog once, then serves
//! recommendations, health checks and metrics over HTTP.

use advisor_lib::{catalog::CatalogRepository, observability::StructuredLogger};
use anyhow::Result;
use instance_advisor::{api, config::AdvisorConfig};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const ADVISOR_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting instance-advisor");

    let config = AdvisorConfig::load()?;
    info!(
        instance_name = %config.instance_name,
        catalog_path = %config.catalog_path.display(),
        "Advisor configured"
    );

    let logger = StructuredLogger::new(&config.instance_name);
    let state = api::AppState::from_config(&config, logger.clone()).await?;

    let rules_source = config
        .rules_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());
    logger.log_startup(
        ADVISOR_VERSION,
        state.recommender.catalog().instance_count(),
        &rules_source,
    );

    state.health_registry.set_ready(true).await;

    let api_handle = tokio::spawn(api::serve(config.api_port, Arc::new(state)));

    tokio::select! {
        result = api_handle => {
            logger.log_shutdown("API server stopped");
            result??;
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            logger.log_shutdown("SIGINT received");
        }
    }

    info!("Shutting down");
    Ok(())
}
