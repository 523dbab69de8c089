//! Service metadata and liveness endpoints.

use axum::{Json, Router, extract::State, routing::get};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared state for the metadata endpoints.
#[derive(Debug, Clone)]
pub struct SystemState {
    /// Name reported by the root endpoint.
    pub project_name: Arc<str>,
}

/// Response of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Project name.
    pub message: String,
    /// Crate version.
    pub version: String,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always `healthy` while the process serves requests.
    pub status: String,
}

/// Handler for `GET /`.
#[tracing::instrument(skip(state))]
pub async fn root_handler(State(state): State<SystemState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: state.project_name.to_string(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
    })
}

/// Handler for `GET /health`.
#[tracing::instrument]
pub async fn health_check_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_owned(),
    })
}

/// Creates the router for `/` and `/health`.
#[must_use]
pub fn create_system_router(state: SystemState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check_handler))
        .with_state(state)
}
