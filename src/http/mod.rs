//! HTTP adapter exposing the task service as a JSON API.
//!
//! Task routes are mounted under the configured API prefix (`/api/v1` by
//! default). The root and health endpoints are served outside the prefix.

mod error;
mod system;
mod tasks;

pub use error::{ApiError, ErrorBody, INTERNAL_ERROR_MESSAGE};
pub use system::{
    HealthStatus, ServiceInfo, SystemState, create_system_router, health_check_handler,
    root_handler,
};
pub use tasks::{
    CreateTaskBody, ListTasksParams, TaskJson, UpdateTaskBody, create_task_handler,
    create_task_router, delete_task_handler, get_task_handler, list_tasks_handler,
    update_task_handler,
};

use crate::{
    config::Config,
    task::{ports::TaskRepository, services::TaskService},
};
use axum::{Router, http::HeaderValue};
use mockable::Clock;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Builds the complete application router.
#[must_use]
pub fn build_router<R, C>(service: TaskService<R, C>, config: &Config) -> Router
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let task_routes = create_task_router(service);
    let api = if config.api_prefix.is_empty() {
        task_routes
    } else {
        Router::new().nest(&config.api_prefix, task_routes)
    };

    let system = create_system_router(SystemState {
        project_name: Arc::from(config.project_name.as_str()),
    });

    api.merge(system)
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &Config) -> CorsLayer {
    let Some(origins) = config.allowed_origins() else {
        return CorsLayer::permissive();
    };

    let values: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(%origin, error = %err, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(values))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Serves `app` on `listener` until Ctrl+C is received.
///
/// # Errors
///
/// Returns an I/O error when the server fails while accepting connections.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    if let Ok(address) = listener.local_addr() {
        tracing::info!(%address, "listening");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
