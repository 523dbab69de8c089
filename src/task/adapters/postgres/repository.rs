//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{
        PersistedTaskData, TASK_TIMEZONE, Task, TaskDescription, TaskId, TaskListQuery,
        TaskStatus, TaskTitle,
    },
    ports::{TaskMutation, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::Utc;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// SQL creating the `tasks` table and its indexes. Safe to run repeatedly.
pub const CREATE_TASKS_SQL: &str =
    include_str!("../../../../migrations/2026-10-01-000000_create_tasks/up.sql");

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    /// Builds a connection pool for `database_url` and wraps it in a
    /// repository.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the pool cannot be
    /// built, for example because the server is unreachable.
    pub fn connect(database_url: &str, max_size: u32) -> TaskRepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(max_size)
            .build(manager)
            .map_err(TaskRepositoryError::persistence)?;
        Ok(Self::new(pool))
    }

    /// Creates the `tasks` table and indexes when they do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the statements fail.
    pub async fn apply_schema(&self) -> TaskRepositoryResult<()> {
        self.run_blocking(|connection| {
            connection
                .batch_execute(CREATE_TASKS_SQL)
                .map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self, query: &TaskListQuery) -> TaskRepositoryResult<Vec<Task>> {
        let list_query = *query;
        self.run_blocking(move |connection| {
            let pagination = list_query.pagination();
            let offset =
                i64::try_from(pagination.skip()).map_err(TaskRepositoryError::persistence)?;
            let limit =
                i64::try_from(pagination.limit()).map_err(TaskRepositoryError::persistence)?;

            let mut statement = tasks::table.select(TaskRow::as_select()).into_boxed();
            if let Some(status) = list_query.status() {
                statement = statement.filter(tasks::status.eq(status.as_str()));
            }

            let rows = statement
                .order((tasks::created_at.desc(), tasks::id.desc()))
                .offset(offset)
                .limit(limit)
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn modify(
        &self,
        id: TaskId,
        mutation: TaskMutation,
    ) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            connection
                .transaction::<_, ModifyError, _>(|tx| {
                    let Some(row) = tasks::table
                        .find(id.into_inner())
                        .select(TaskRow::as_select())
                        .for_update()
                        .first::<TaskRow>(tx)
                        .optional()?
                    else {
                        return Ok(None);
                    };

                    let mut task = row_to_task(row)?;
                    mutation(&mut task);
                    diesel::update(tasks::table.find(id.into_inner()))
                        .set(&to_changeset(&task))
                        .execute(tx)?;
                    Ok(Some(task))
                })
                .map_err(TaskRepositoryError::from)
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let affected = diesel::delete(tasks::table.find(id.into_inner()))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(affected > 0)
        })
        .await
    }
}

/// Failure inside the row-locking transaction used by `modify`.
#[derive(Debug)]
enum ModifyError {
    Database(DieselError),
    Repository(TaskRepositoryError),
}

impl From<DieselError> for ModifyError {
    fn from(err: DieselError) -> Self {
        Self::Database(err)
    }
}

impl From<TaskRepositoryError> for ModifyError {
    fn from(err: TaskRepositoryError) -> Self {
        Self::Repository(err)
    }
}

impl From<ModifyError> for TaskRepositoryError {
    fn from(err: ModifyError) -> Self {
        match err {
            ModifyError::Database(db_err) => Self::persistence(db_err),
            ModifyError::Repository(repo_err) => repo_err,
        }
    }
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(|value| value.as_str().to_owned()),
        status: task.status().as_str().to_owned(),
        created_at: task.created_at().with_timezone(&Utc),
        updated_at: task.updated_at().with_timezone(&Utc),
    }
}

fn to_changeset(task: &Task) -> TaskChangeset {
    TaskChangeset {
        title: task.title().as_str().to_owned(),
        description: task.description().map(|value| value.as_str().to_owned()),
        status: task.status().as_str().to_owned(),
        updated_at: task.updated_at().with_timezone(&Utc),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title: persisted_title,
        description: persisted_description,
        status: persisted_status,
        created_at,
        updated_at,
    } = row;

    let title = TaskTitle::new(persisted_title).map_err(TaskRepositoryError::persistence)?;
    let description = persisted_description
        .map(TaskDescription::new)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;
    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title,
        description,
        status,
        created_at: created_at.with_timezone(&TASK_TIMEZONE),
        updated_at: updated_at.with_timezone(&TASK_TIMEZONE),
    };
    Ok(Task::from_persisted(data))
}
