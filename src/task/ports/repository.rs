//! Repository port for task persistence and lookup.

use crate::task::domain::{Task, TaskId, TaskListQuery};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// In-place edit applied to a stored task by [`TaskRepository::modify`].
pub type TaskMutation = Box<dyn FnOnce(&mut Task) + Send>;

/// Task persistence contract.
///
/// Every method is a single atomic unit with respect to the backing store.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns tasks matching the query's status filter, newest-created
    /// first, windowed by the query's pagination.
    async fn list(&self, query: &TaskListQuery) -> TaskRepositoryResult<Vec<Task>>;

    /// Reads, edits and writes back a task as one atomic step.
    ///
    /// No other write to the same task may interleave between the read the
    /// mutation sees and the write of its result. Returns the stored task
    /// after the mutation, or `None` when the task does not exist, in which
    /// case the mutation is not run.
    async fn modify(
        &self,
        id: TaskId,
        mutation: TaskMutation,
    ) -> TaskRepositoryResult<Option<Task>>;

    /// Removes a task permanently.
    ///
    /// Returns `false` when no task with the identifier existed.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    #[must_use]
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
