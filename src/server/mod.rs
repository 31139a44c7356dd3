//! HTTP server for the consent page
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/`, `/health` | [`handlers::health`] |
//! | GET | `/consent` | [`handlers::consent`] |
//! | POST | `/accept` | [`handlers::accept`] |
//! | GET | `/reject` | [`handlers::reject`] |

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::acp::{AcpClient, AuthorizationServer};
use crate::config::{Config, ServerConfig};
use crate::error::{ConsentError, Result};
use crate::flow::ConsentFlow;
use crate::session::SessionStore;

pub mod cookies;
pub mod handlers;
pub mod views;

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Consent flow orchestrator
    pub flow: Arc<ConsentFlow>,
    /// Server settings (cookie and error-page behavior)
    pub server: Arc<ServerConfig>,
}

impl AppState {
    /// Builds state over any authorization server implementation.
    pub fn new(acp: Arc<dyn AuthorizationServer>, server: ServerConfig) -> Self {
        let sessions = SessionStore::new(Duration::from_secs(server.session_ttl_seconds));
        Self {
            flow: Arc::new(ConsentFlow::new(acp, sessions)),
            server: Arc::new(server),
        }
    }

    /// Builds state talking to the ACP instance described by `config`.
    ///
    /// # Errors
    ///
    /// Returns error if the ACP client cannot be created.
    pub fn from_config(config: &Config) -> Result<Self> {
        let acp = AcpClient::new(&config.authorization_server)?;
        Ok(Self::new(Arc::new(acp), config.server.clone()))
    }
}

/// Builds the router with request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/health", get(handlers::health))
        .route("/consent", get(handlers::consent))
        .route("/accept", post(handlers::accept))
        .route("/reject", get(handlers::reject))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl-C.
///
/// # Errors
///
/// Returns error if the ACP client cannot be created, the address cannot be
/// bound, or the server fails.
pub async fn serve(config: Config) -> Result<()> {
    let state = AppState::from_config(&config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .map_err(|e| {
            ConsentError::Config(format!(
                "failed to bind {}: {}",
                config.server.bind_address, e
            ))
        })?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Consent page listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Consent page stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
