//! Per-test databases cloned from a migrated template.

pub use super::cluster::{BoxError, PostgresCluster, postgres_cluster};
use super::cluster::TemporaryDatabase;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use rstest::fixture;
use std::future::Future;
use tasktrack::task::adapters::postgres::{CREATE_TASKS_SQL, PostgresTaskRepository};
use tokio::runtime::Runtime;

/// Template database holding the task schema.
pub const TEMPLATE_DB: &str = "tasktrack_test_template";

/// Builds the runtime that drives repository futures in synchronous tests.
///
/// # Errors
///
/// Returns an error when the runtime cannot be created.
pub fn test_runtime() -> Result<Runtime, BoxError> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?)
}

/// Ensures the template database exists with the task schema applied.
///
/// # Errors
///
/// Returns an error when the template cannot be created or migrated.
pub fn ensure_template(cluster: PostgresCluster) -> Result<(), BoxError> {
    cluster.ensure_template_exists(TEMPLATE_DB, |url| {
        let mut connection = PgConnection::establish(url)?;
        connection.batch_execute(CREATE_TASKS_SQL)?;
        Ok(())
    })
}

/// Repository over a private database, with the runtime to drive it.
///
/// Fields drop in order, so the pool closes before the database is dropped.
pub struct PgTestContext {
    pub repository: PostgresTaskRepository,
    runtime: Runtime,
    database: TemporaryDatabase,
}

impl PgTestContext {
    /// Runs `future` to completion on the context's runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Connection URL of the private database.
    #[must_use]
    pub fn database_url(&self) -> &str {
        self.database.url()
    }
}

fn prepare_context(cluster: PostgresCluster) -> Result<PgTestContext, BoxError> {
    ensure_template(cluster)?;
    let database = cluster.temporary_database(TEMPLATE_DB)?;
    let repository = PostgresTaskRepository::connect(database.url(), 4)?;
    Ok(PgTestContext {
        repository,
        runtime: test_runtime()?,
        database,
    })
}

/// Provides a repository bound to a fresh copy of the template database.
#[fixture]
pub fn pg_context(postgres_cluster: PostgresCluster) -> PgTestContext {
    prepare_context(postgres_cluster).expect("postgres test context")
}
