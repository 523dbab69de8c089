//! Task entity and related lifecycle types.

use super::{TaskDescription, TaskId, TaskTitle, TaskValidationError};
use chrono::{DateTime, FixedOffset, SubsecRound};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Offset applied to every task timestamp (UTC+3).
pub const TASK_UTC_OFFSET_SECONDS: i32 = 3 * 60 * 60;

/// Fixed timezone in which task timestamps are expressed.
pub const TASK_TIMEZONE: FixedOffset = match FixedOffset::east_opt(TASK_UTC_OFFSET_SECONDS) {
    Some(offset) => offset,
    None => panic!("task timezone offset must be within one day"),
};

/// Returns the current time at [`TASK_TIMEZONE`], truncated to microseconds
/// so values survive a `timestamptz` round-trip unchanged.
#[must_use]
pub fn task_timestamp(clock: &impl Clock) -> DateTime<FixedOffset> {
    clock.utc().trunc_subsecs(6).with_timezone(&TASK_TIMEZONE)
}

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Task has been created but work has not started.
    #[default]
    Created,
    /// Task is being worked on.
    InProgress,
    /// Task has been completed.
    Completed,
}

impl TaskStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Created, Self::InProgress, Self::Completed];

    /// Returns the canonical wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = TaskValidationError;

    /// Parses a status literal. Matching is exact and case-sensitive.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| TaskValidationError::InvalidStatus(value.to_owned()))
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated field values for a task that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Task title.
    pub title: TaskTitle,
    /// Optional description.
    pub description: Option<TaskDescription>,
    /// Initial status.
    pub status: TaskStatus,
}

impl NewTask {
    /// Creates new-task data with no description and the default status.
    #[must_use]
    pub fn new(title: TaskTitle) -> Self {
        Self {
            title,
            description: None,
            status: TaskStatus::default(),
        }
    }
}

/// Validated partial update. `None` leaves the field untouched.
///
/// The description is doubly optional: `Some(None)` clears it while `None`
/// keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    /// Replacement title.
    pub title: Option<TaskTitle>,
    /// Replacement description, or `Some(None)` to clear it.
    pub description: Option<Option<TaskDescription>>,
    /// Replacement status.
    pub status: Option<TaskStatus>,
}

impl TaskChanges {
    /// Returns `true` when no field is being replaced.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

/// Task entity.
///
/// Only constructed through [`Task::new`] or [`Task::from_persisted`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<TaskDescription>,
    status: TaskStatus,
    created_at: DateTime<FixedOffset>,
    updated_at: DateTime<FixedOffset>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description, if any.
    pub description: Option<TaskDescription>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<FixedOffset>,
}

impl Task {
    /// Creates a new task with a fresh identifier and equal creation and
    /// modification timestamps.
    #[must_use]
    pub fn new(data: NewTask, clock: &impl Clock) -> Self {
        let timestamp = task_timestamp(clock);
        Self {
            id: TaskId::new(),
            title: data.title,
            description: data.description,
            status: data.status,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    ///
    /// Timestamps are re-expressed at [`TASK_TIMEZONE`] regardless of the
    /// offset they were stored with.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            created_at: data.created_at.with_timezone(&TASK_TIMEZONE),
            updated_at: data.updated_at.with_timezone(&TASK_TIMEZONE),
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub const fn description(&self) -> Option<&TaskDescription> {
        self.description.as_ref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<FixedOffset> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<FixedOffset> {
        self.updated_at
    }

    /// Applies a partial update and refreshes `updated_at`.
    ///
    /// Only fields present in `changes` are replaced.
    pub fn apply(&mut self, changes: TaskChanges, clock: &impl Clock) {
        let TaskChanges {
            title,
            description,
            status,
        } = changes;

        if let Some(new_title) = title {
            self.title = new_title;
        }
        if let Some(new_description) = description {
            self.description = new_description;
        }
        if let Some(new_status) = status {
            self.status = new_status;
        }
        self.touch(clock);
    }

    /// Updates `updated_at` to the current clock time, never moving it
    /// before `created_at`.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = task_timestamp(clock).max(self.created_at);
    }
}
