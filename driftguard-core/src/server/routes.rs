//! Drift service built on axum.

use super::ApiError;
use crate::config::DriftGuardConfig;
use crate::data::load_dataset;
use crate::drift::{DriftReport, MAX_BUCKETS};
use crate::pipeline::check_datasets;
use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Immutable per-process state handed to every request.
#[derive(Debug, Clone)]
pub struct AppState {
    reference_path: PathBuf,
    current_path: PathBuf,
    buckets: usize,
    started_at: chrono::DateTime<Utc>,
}

impl AppState {
    /// Build the service state from resolved configuration.
    pub fn from_config(config: &DriftGuardConfig) -> Self {
        Self {
            reference_path: config.data.reference_path.clone(),
            current_path: config.data.current_path.clone(),
            buckets: config.drift.buckets,
            started_at: Utc::now(),
        }
    }

    pub fn reference_path(&self) -> &Path {
        &self.reference_path
    }

    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    pub fn buckets(&self) -> usize {
        self.buckets
    }

    /// Uptime in seconds since the state was created.
    pub fn uptime_secs(&self) -> u64 {
        let elapsed = Utc::now() - self.started_at;
        elapsed.num_seconds().max(0) as u64
    }
}

#[derive(Debug, Default, Deserialize)]
struct DriftQuery {
    buckets: Option<usize>,
}

/// Build an axum Router with `/health` and `/drift` routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/drift", get(drift_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "uptime_secs": state.uptime_secs(),
    }))
}

/// Run the drift check against the configured snapshots.
async fn drift_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DriftQuery>,
) -> Result<Json<DriftReport>, ApiError> {
    let buckets = match query.buckets {
        Some(0) => return Err(ApiError::BadRequest("buckets must be at least 1".into())),
        Some(n) if n > MAX_BUCKETS => {
            return Err(ApiError::BadRequest(format!(
                "buckets must be at most {MAX_BUCKETS}"
            )));
        }
        Some(n) => n,
        None => state.buckets(),
    };

    let reference = load_dataset(state.reference_path()).await?;
    let current = load_dataset(state.current_path()).await?;

    let report = tokio::task::spawn_blocking(move || check_datasets(&reference, &current, buckets))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(report))
}

/// Serve on `addr` until Ctrl-C.
pub async fn run(state: Arc<AppState>, addr: &str) -> Result<(), std::io::Error> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Drift service listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down drift service");
        })
        .await
}
