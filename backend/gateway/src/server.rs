//! Main HTTP Gateway Server.

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use textlift_core::OutputMode;
use textlift_understanding::RecognitionClient;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::{health_api, recognize_api, session_api};

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub client: Arc<RecognitionClient>,
    /// Mode used when a request does not name one.
    pub default_mode: OutputMode,
    pub max_body_bytes: usize,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(client: Arc<RecognitionClient>, default_mode: OutputMode, max_body_bytes: usize) -> Self {
        Self {
            client,
            default_mode,
            max_body_bytes,
            started_at: Instant::now(),
        }
    }

    /// Parse a requested mode, falling back to the configured default.
    pub fn resolve_mode(&self, requested: Option<&str>) -> Result<OutputMode, ApiError> {
        match requested.map(str::trim).filter(|m| !m.is_empty()) {
            None => Ok(self.default_mode),
            Some(raw) => raw.parse().map_err(ApiError::BadRequest),
        }
    }
}

/// Build the router with every API route and the shared layers.
pub fn build_router(state: GatewayState) -> Router {
    let body_limit = state.max_body_bytes;
    Router::new()
        .route("/api/health", get(health_api::get_health))
        .route("/api/recognize", post(recognize_api::recognize))
        .route("/api/recognize/upload", post(recognize_api::recognize_upload))
        .route("/api/session", get(session_api::get_session))
        .route("/api/session/reset", post(session_api::reset_session))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the HTTP server and serves until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let provider = state.client.provider_name().to_string();
    let app = build_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, provider = %provider, "Gateway HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use textlift_understanding::MockProvider;

    pub fn state_with(provider: MockProvider) -> GatewayState {
        let client = RecognitionClient::new(Arc::new(provider));
        GatewayState::new(Arc::new(client), OutputMode::Text, 1024 * 1024)
    }

    pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
