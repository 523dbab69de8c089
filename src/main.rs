//! Tasktrack HTTP server.
//!
//! Reads configuration from the environment (and an optional `.env` file),
//! selects the `PostgreSQL` repository when a database URL is configured and
//! the in-memory repository otherwise, then serves the JSON API until
//! Ctrl+C is received.

use std::sync::Arc;

use eyre::WrapErr;
use mockable::DefaultClock;
use tasktrack::{
    config::Config,
    http::{build_router, serve},
    task::{
        adapters::{memory::InMemoryTaskRepository, postgres::PostgresTaskRepository},
        services::TaskService,
    },
    telemetry::{self, LogFormat},
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let dotenv_loaded = dotenvy::dotenv().is_ok();
    telemetry::init(LogFormat::from_env());
    if dotenv_loaded {
        tracing::debug!("loaded variables from .env");
    }

    let config = Config::from_env().wrap_err("failed to load configuration")?;
    let app = if let Some(database_url) = config.database_url.as_deref() {
        let repository = PostgresTaskRepository::connect(database_url, config.database_pool_size)
            .wrap_err("failed to connect to PostgreSQL")?;
        repository
            .apply_schema()
            .await
            .wrap_err("failed to apply task schema")?;
        tracing::info!(pool_size = config.database_pool_size, "using PostgreSQL storage");
        build_router(
            TaskService::new(Arc::new(repository), Arc::new(DefaultClock)),
            &config,
        )
    } else {
        tracing::warn!("no database URL configured; tasks are kept in memory");
        build_router(
            TaskService::new(Arc::new(InMemoryTaskRepository::new()), Arc::new(DefaultClock)),
            &config,
        )
    };

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .wrap_err_with(|| format!("failed to bind {address}"))?;
    serve(listener, app).await.wrap_err("server error")?;
    tracing::info!("server stopped");
    Ok(())
}
