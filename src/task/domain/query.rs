//! Filtering and pagination parameters for task listing.

use super::{Task, TaskStatus, TaskValidationError};

/// Validated offset/limit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    skip: u64,
    limit: u64,
}

impl Pagination {
    /// Limit applied when the caller does not supply one.
    pub const DEFAULT_LIMIT: u64 = 100;
    /// Smallest accepted limit.
    pub const MIN_LIMIT: u64 = 1;
    /// Largest accepted limit.
    pub const MAX_LIMIT: u64 = 1000;

    /// Creates a validated pagination window.
    ///
    /// # Errors
    ///
    /// Returns [`TaskValidationError::InvalidSkip`] when `skip` is negative
    /// and [`TaskValidationError::InvalidLimit`] when `limit` falls outside
    /// [`Self::MIN_LIMIT`]..=[`Self::MAX_LIMIT`].
    pub fn new(skip: i64, limit: i64) -> Result<Self, TaskValidationError> {
        let valid_skip = u64::try_from(skip).map_err(|_| TaskValidationError::InvalidSkip(skip))?;
        let valid_limit = u64::try_from(limit)
            .ok()
            .filter(|value| (Self::MIN_LIMIT..=Self::MAX_LIMIT).contains(value))
            .ok_or(TaskValidationError::InvalidLimit {
                value: limit,
                min: Self::MIN_LIMIT,
                max: Self::MAX_LIMIT,
            })?;

        Ok(Self {
            skip: valid_skip,
            limit: valid_limit,
        })
    }

    /// Creates a pagination window, substituting defaults for missing values.
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn from_optional(
        skip: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Self, TaskValidationError> {
        let default = Self::default();
        Self::new(
            skip.unwrap_or(0),
            limit.unwrap_or_else(|| i64::try_from(default.limit).unwrap_or(i64::MAX)),
        )
    }

    /// Number of matching tasks to drop.
    #[must_use]
    pub const fn skip(self) -> u64 {
        self.skip
    }

    /// Maximum number of tasks to return.
    #[must_use]
    pub const fn limit(self) -> u64 {
        self.limit
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Listing parameters: optional status filter plus pagination.
///
/// Results are always ordered newest-created first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    status: Option<TaskStatus>,
    pagination: Pagination,
}

impl TaskListQuery {
    /// Creates an unfiltered query with the given pagination.
    #[must_use]
    pub const fn new(pagination: Pagination) -> Self {
        Self {
            status: None,
            pagination,
        }
    }

    /// Restricts results to tasks with exactly this status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns the status filter, if any.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns the pagination window.
    #[must_use]
    pub const fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Returns `true` when `task` passes the status filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|status| task.status() == status)
    }
}
