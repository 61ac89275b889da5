//! # Ledger Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the SQLite store adapter
//! - Create the ledger service and FX client
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fx_rates::FxClient;
use ledger_hex::{FxService, HttpServer, LedgerService};
use ledger_repo::build_store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ledger_app=debug,ledger_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting ledger server on port {}", config.port);
    tracing::info!("Using database: {}", config.database_url);
    if config.fx_access_key.is_none() {
        tracing::warn!("FX_ACCESS_KEY not set; conversion requests will fail until configured");
    }

    // Build the store (handles connection and schema)
    let store = build_store(&config.database_url).await?;
    let ledger = LedgerService::new(Arc::new(store));

    // FX client against the configured provider
    let fx_client = FxClient::new(config.fx_access_key).with_base_url(config.fx_base_url);
    let fx = FxService::new(Arc::new(fx_client));

    // Create and run the HTTP server
    let server = HttpServer::new(ledger, fx);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    Ok(())
}
