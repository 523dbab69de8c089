//! Shared fixtures for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use tasktrack::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::Task,
    services::{CreateTaskRequest, TaskService},
};

/// Service type backed by the in-memory repository.
pub type TestService = TaskService<InMemoryTaskRepository, DefaultClock>;

/// Provides a service over an empty in-memory repository.
#[fixture]
pub fn service() -> TestService {
    TaskService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(DefaultClock),
    )
}

/// Creates one task per `(title, status)` pair, in order.
///
/// # Errors
///
/// Returns an error when any creation fails.
pub async fn seed(
    service: &TestService,
    tasks: &[(&str, &str)],
) -> Result<Vec<Task>, eyre::Report> {
    let mut created = Vec::with_capacity(tasks.len());
    for (title, status) in tasks {
        let task = service
            .create(CreateTaskRequest::new(*title).with_status(*status))
            .await?;
        created.push(task);
    }
    Ok(created)
}

/// Returns the titles of `tasks` in order.
#[must_use]
pub fn titles(tasks: &[Task]) -> Vec<String> {
    tasks
        .iter()
        .map(|task| task.title().as_str().to_owned())
        .collect()
}
