//! In-memory task repository for tests and database-less deployments.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{Task, TaskId, TaskListQuery},
    ports::{TaskMutation, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Every operation holds the state lock for its whole duration, so each call
/// is atomic with respect to concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, StoredTask>,
    next_sequence: u64,
}

/// Task plus its insertion sequence, used to order tasks sharing a
/// creation timestamp.
#[derive(Debug, Clone)]
struct StoredTask {
    task: Task,
    sequence: u64,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write_state(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

/// Converts a pagination bound to `usize`, saturating on narrow targets.
fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write_state()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }

        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.tasks.insert(
            task.id(),
            StoredTask {
                task: task.clone(),
                sequence,
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read_state()?;
        Ok(state.tasks.get(&id).map(|stored| stored.task.clone()))
    }

    async fn list(&self, query: &TaskListQuery) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read_state()?;
        let mut matching: Vec<&StoredTask> = state
            .tasks
            .values()
            .filter(|stored| query.matches(&stored.task))
            .collect();
        matching.sort_by_key(|stored| {
            (
                Reverse(stored.task.created_at()),
                Reverse(stored.sequence),
            )
        });

        let pagination = query.pagination();
        Ok(matching
            .into_iter()
            .skip(to_usize(pagination.skip()))
            .take(to_usize(pagination.limit()))
            .map(|stored| stored.task.clone())
            .collect())
    }

    async fn modify(
        &self,
        id: TaskId,
        mutation: TaskMutation,
    ) -> TaskRepositoryResult<Option<Task>> {
        let mut state = self.write_state()?;
        let Some(stored) = state.tasks.get_mut(&id) else {
            return Ok(None);
        };
        mutation(&mut stored.task);
        Ok(Some(stored.task.clone()))
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        let mut state = self.write_state()?;
        Ok(state.tasks.remove(&id).is_some())
    }
}
