//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Trimmed task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Lifecycle status literal.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Trimmed task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Lifecycle status literal.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied when an existing task is updated.
///
/// `description` is written even when `None` so a cleared description is
/// persisted as `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Trimmed task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Lifecycle status literal.
    pub status: String,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
