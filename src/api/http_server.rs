// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{DefaultBodyLimit, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::signal;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{info, warn};

use super::adjust::adjust_handler;
use super::ai::ai_handler;
use super::enhance::enhance_handler;
use crate::config::ServerConfig;
use crate::inference::{InferenceError, PredictionBackend, ReplicateClient};
use crate::version;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Present only when an API token is configured
    pub prediction_backend: Option<Arc<dyn PredictionBackend>>,
}

impl AppState {
    /// Build state from configuration, creating the prediction client when a
    /// token is available
    pub fn new(config: ServerConfig) -> Result<Self, InferenceError> {
        let prediction_backend = match config.api_token() {
            Some(token) => {
                let client =
                    ReplicateClient::new(&config.replicate_base_url, token, config.request_timeout())?
                        .with_polling(config.poll_interval(), config.prediction_timeout());
                Some(Arc::new(client) as Arc<dyn PredictionBackend>)
            }
            None => {
                warn!("REPLICATE_API_TOKEN not set, AI effects disabled");
                None
            }
        };

        Ok(Self {
            config: Arc::new(config),
            prediction_backend,
        })
    }

    /// Default config and no prediction backend
    pub fn new_for_test() -> Self {
        Self {
            config: Arc::new(ServerConfig::default()),
            prediction_backend: None,
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn PredictionBackend>) -> Self {
        self.prediction_backend = Some(backend);
        self
    }

    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    pub fn ai_available(&self) -> bool {
        self.prediction_backend.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub ai_available: bool,
    pub version: String,
    pub features: Vec<String>,
}

pub fn create_app(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;
    let static_dir = state.config.static_dir.clone();

    let router = Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Pixel processing
        .route("/api/enhance", post(enhance_handler))
        .route("/api/adjust", post(adjust_handler))
        // Hosted AI effects
        .route("/api/ai", post(ai_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match static_dir {
        Some(dir) => {
            info!("Serving static UI from {}", dir.display());
            let index = dir.join("index.html");
            router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        None => router,
    }
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        ai_available: state.ai_available(),
        version: version::VERSION_NUMBER.to_string(),
        features: version::features(),
    })
}

/// Bind, serve until Ctrl-C, then drain in-flight requests
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.listen_addr;
    let state = AppState::new(config).context("failed to create prediction client")?;

    // A bad token is worth a warning, not a refusal to start
    if let Some(ref backend) = state.prediction_backend {
        if backend.health_check().await {
            info!("Prediction API reachable");
        } else {
            warn!("Prediction API health check failed, AI effects may error");
        }
    }

    let app = create_app(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
