//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use ledger_types::{LedgerStore, RateProvider};

use super::handlers::{self, AppState};
use crate::{FxService, LedgerService};

/// HTTP server for the ledger/FX API.
pub struct HttpServer<S: LedgerStore, P: RateProvider> {
    state: Arc<AppState<S, P>>,
}

impl<S: LedgerStore, P: RateProvider + 'static> HttpServer<S, P> {
    /// Creates a new HTTP server with the given services.
    pub fn new(ledger: LedgerService<S>, fx: FxService<P>) -> Self {
        Self {
            state: Arc::new(AppState { ledger, fx }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/api/accounts", post(handlers::create_account::<S, P>))
            .route("/api/accounts", get(handlers::list_accounts::<S, P>))
            .route("/api/accounts/{id}", get(handlers::get_account::<S, P>))
            .route(
                "/api/accounts/{id}/entries",
                get(handlers::list_entries::<S, P>),
            )
            .route(
                "/api/accounts/{id}/entries",
                post(handlers::create_entry::<S, P>),
            )
            .route(
                "/api/accounts/{id}/entries/generate",
                post(handlers::generate_entries::<S, P>),
            )
            .route("/conversion-quote", get(handlers::convert::<S, P>))
            .route("/ledger-stream/{id}", get(handlers::ledger_stream::<S, P>))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
