pub mod bootstrap;
pub mod catalog;
pub mod health;
pub mod quotes;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use vquotes_core::config::{AppConfig, LoadOptions};
use vquotes_db::repositories::{SqlCatalogRepository, SqlPricingRepository, SqlQuoteRepository};

pub fn init_logging(config: &AppConfig) {
    use tracing::Level;
    use vquotes_core::config::LogFormat::*;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

/// Assemble the full route surface over one database pool.
pub fn build_router(app: &bootstrap::Application) -> Router {
    let service = Arc::new(quotes::QuoteService::new(
        Arc::new(SqlCatalogRepository::new(app.db_pool.clone())),
        Arc::new(SqlPricingRepository::new(app.db_pool.clone())),
        Arc::new(SqlQuoteRepository::new(app.db_pool.clone())),
        app.config.pricing.default_offer,
    ));

    Router::new()
        .merge(quotes::router(service))
        .merge(catalog::router(app.db_pool.clone()))
        .merge(health::router(app.db_pool.clone()))
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;
    let router = build_router(&app);

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        default_offer = app.config.pricing.default_offer,
        "vquotes-server listening"
    );

    let shutdown_grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    axum::serve(listener, router)
        .with_graceful_shutdown(wait_for_shutdown(shutdown_grace))
        .await?;

    tracing::info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "vquotes-server stopped"
    );

    Ok(())
}

async fn wait_for_shutdown(grace: Duration) {
    if tokio::signal::ctrl_c().await.is_err() {
        return;
    }
    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        grace_secs = grace.as_secs(),
        "shutdown signal received, draining in-flight requests"
    );
}
