//! Service layer for task creation, lookup, listing, update and removal.

use crate::task::{
    domain::{
        NewTask, Task, TaskChanges, TaskDescription, TaskId, TaskListQuery, TaskStatus, TaskTitle,
        TaskValidationError,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task from raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    status: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial status literal.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    fn validate(self) -> Result<NewTask, TaskValidationError> {
        let title = TaskTitle::new(&self.title)?;
        let description = self.description.map(TaskDescription::new).transpose()?;
        let status = self
            .status
            .as_deref()
            .map(TaskStatus::try_from)
            .transpose()?
            .unwrap_or_default();

        Ok(NewTask {
            title,
            description,
            status,
        })
    }
}

/// Request payload for a partial task update.
///
/// Each field is doubly optional: the outer `Option` records whether the
/// caller supplied the field at all, the inner one whether it was `null`.
/// Only `description` may be cleared; a `null` title or status is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: Option<Option<String>>,
    description: Option<Option<String>>,
    status: Option<Option<String>>,
}

impl UpdateTaskRequest {
    /// Creates a request that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a request from supplied-or-null field values.
    #[must_use]
    pub const fn from_patch(
        title: Option<Option<String>>,
        description: Option<Option<String>>,
        status: Option<Option<String>>,
    ) -> Self {
        Self {
            title,
            description,
            status,
        }
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(Some(title.into()));
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    /// Clears the description.
    #[must_use]
    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    /// Replaces the status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(Some(status.into()));
        self
    }

    fn validate(self) -> Result<TaskChanges, TaskValidationError> {
        let title = self
            .title
            .map(|value| value.ok_or(TaskValidationError::InvalidTitle))
            .transpose()?
            .map(TaskTitle::new)
            .transpose()?;
        let description = self
            .description
            .map(|value| value.map(TaskDescription::new).transpose())
            .transpose()?;
        let status = self
            .status
            .map(|value| {
                value.ok_or_else(|| TaskValidationError::InvalidStatus("null".to_owned()))
            })
            .transpose()?
            .map(|value| TaskStatus::try_from(value.as_str()))
            .transpose()?;

        Ok(TaskChanges {
            title,
            description,
            status,
        })
    }
}

/// Service-level errors for task operations.
///
/// A missing task is not an error: lookups return `None` and deletion
/// returns `false`.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] TaskValidationError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task orchestration service.
pub struct TaskService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync + 'static,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for TaskService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> TaskService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Validates the request and persists a new task.
    ///
    /// The status defaults to [`TaskStatus::Created`] when absent.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] when any field is invalid or
    /// [`TaskServiceError::Repository`] when persistence fails.
    #[tracing::instrument(skip(self, request))]
    pub async fn create(&self, request: CreateTaskRequest) -> TaskServiceResult<Task> {
        let data = request.validate()?;
        let task = Task::new(data, &*self.clock);
        self.repository.store(&task).await?;
        tracing::info!(task_id = %task.id(), status = %task.status(), "task created");
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the lookup fails.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: TaskId) -> TaskServiceResult<Option<Task>> {
        let task = self.repository.find_by_id(id).await?;
        if task.is_none() {
            tracing::debug!(task_id = %id, "task not found");
        }
        Ok(task)
    }

    /// Lists tasks newest-created first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the query fails.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, query: TaskListQuery) -> TaskServiceResult<Vec<Task>> {
        let tasks = self.repository.list(&query).await?;
        tracing::debug!(count = tasks.len(), "tasks listed");
        Ok(tasks)
    }

    /// Applies the supplied fields to an existing task.
    ///
    /// The read, merge and write happen in one repository step, so a
    /// concurrent update of other fields is never overwritten with stale
    /// values. Returns `Ok(None)` when the task does not exist, including
    /// when the supplied fields are invalid.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] when a supplied field is
    /// invalid or [`TaskServiceError::Repository`] when persistence fails.
    #[tracing::instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskServiceResult<Option<Task>> {
        let changes = match request.validate() {
            Ok(changes) => changes,
            Err(err) => {
                if self.repository.find_by_id(id).await?.is_none() {
                    tracing::debug!(task_id = %id, "task not found for update");
                    return Ok(None);
                }
                return Err(err.into());
            }
        };
        if changes.is_empty() {
            tracing::debug!(task_id = %id, "empty update refreshes timestamp only");
        }

        let clock = Arc::clone(&self.clock);
        let updated = self
            .repository
            .modify(id, Box::new(move |task: &mut Task| task.apply(changes, &*clock)))
            .await?;

        let Some(task) = updated else {
            tracing::debug!(task_id = %id, "task not found for update");
            return Ok(None);
        };
        tracing::info!(task_id = %id, status = %task.status(), "task updated");
        Ok(Some(task))
    }

    /// Removes a task permanently.
    ///
    /// Returns `Ok(false)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when persistence fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: TaskId) -> TaskServiceResult<bool> {
        let removed = self.repository.delete(id).await?;
        if removed {
            tracing::info!(task_id = %id, "task deleted");
        } else {
            tracing::debug!(task_id = %id, "task not found for deletion");
        }
        Ok(removed)
    }
}
