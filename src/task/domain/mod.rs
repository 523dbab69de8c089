//! Domain model for task tracking.
//!
//! The domain owns the task entity, its validated field types, and the
//! listing parameters, while keeping all infrastructure concerns outside of
//! the domain boundary.

mod error;
mod ids;
mod query;
mod task;

pub use error::TaskValidationError;
pub use ids::{TaskDescription, TaskId, TaskTitle};
pub use query::{Pagination, TaskListQuery};
pub use task::{
    NewTask, PersistedTaskData, TASK_TIMEZONE, TASK_UTC_OFFSET_SECONDS, Task, TaskChanges,
    TaskStatus, task_timestamp,
};
