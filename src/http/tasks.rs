//! JSON endpoints for task CRUD operations.

use super::error::ApiError;
use crate::task::{
    domain::{Pagination, Task, TaskId, TaskListQuery, TaskStatus, TaskValidationError},
    ports::TaskRepository,
    services::{CreateTaskRequest, TaskService, UpdateTaskRequest},
};
use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use mockable::Clock;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// JSON representation of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskJson {
    /// Task identifier.
    pub id: Uuid,
    /// Trimmed title.
    pub title: String,
    /// Description, or `null` when absent.
    pub description: Option<String>,
    /// Lifecycle status literal.
    pub status: TaskStatus,
    /// Creation timestamp (RFC 3339, `+03:00`).
    pub created_at: DateTime<FixedOffset>,
    /// Latest modification timestamp (RFC 3339, `+03:00`).
    pub updated_at: DateTime<FixedOffset>,
}

impl From<Task> for TaskJson {
    fn from(task: Task) -> Self {
        Self {
            id: task.id().into_inner(),
            title: task.title().as_str().to_owned(),
            description: task.description().map(|value| value.as_str().to_owned()),
            status: task.status(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// Body of `POST /tasks`.
#[derive(Debug, Deserialize)]
pub struct CreateTaskBody {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl TryFrom<CreateTaskBody> for CreateTaskRequest {
    type Error = TaskValidationError;

    fn try_from(body: CreateTaskBody) -> Result<Self, Self::Error> {
        let title = body.title.ok_or(TaskValidationError::InvalidTitle)?;
        let mut request = Self::new(title);
        if let Some(description) = body.description {
            request = request.with_description(description);
        }
        if let Some(status) = body.status {
            request = request.with_status(status);
        }
        Ok(request)
    }
}

/// Body of `PUT /tasks/{id}`. Omitted fields and explicit `null` are kept
/// apart.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskBody {
    #[serde(default, deserialize_with = "present")]
    title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    status: Option<Option<String>>,
}

impl From<UpdateTaskBody> for UpdateTaskRequest {
    fn from(body: UpdateTaskBody) -> Self {
        Self::from_patch(body.title, body.description, body.status)
    }
}

/// Marks a field as supplied; `serde(default)` covers the omitted case.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Query string of `GET /tasks`.
///
/// Numbers are taken as text so malformed values produce a field-level
/// validation error rather than a generic rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksParams {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    skip: Option<String>,
    #[serde(default)]
    limit: Option<String>,
}

impl TryFrom<ListTasksParams> for TaskListQuery {
    type Error = ApiError;

    fn try_from(params: ListTasksParams) -> Result<Self, Self::Error> {
        let skip = parse_integer("skip", params.skip.as_deref())?;
        let limit = parse_integer("limit", params.limit.as_deref())?;
        let query = Self::new(Pagination::from_optional(skip, limit)?);

        match params.status.as_deref() {
            Some(status) => Ok(query.with_status(TaskStatus::try_from(status)?)),
            None => Ok(query),
        }
    }
}

fn parse_integer(field: &'static str, raw: Option<&str>) -> Result<Option<i64>, ApiError> {
    raw.map(|value| {
        value.trim().parse::<i64>().map_err(|err| {
            ApiError::invalid_input(field, format!("'{value}' is not an integer: {err}"))
        })
    })
    .transpose()
}

fn parse_task_id(raw: &str) -> Result<TaskId, ApiError> {
    Uuid::parse_str(raw)
        .map(TaskId::from_uuid)
        .map_err(|err| {
            ApiError::invalid_input("id", format!("'{raw}' is not a valid UUID: {err}"))
        })
}

/// Handler for `POST /tasks`.
#[tracing::instrument(skip_all)]
pub async fn create_task_handler<R, C>(
    State(service): State<TaskService<R, C>>,
    payload: Result<Json<CreateTaskBody>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskJson>), ApiError>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Json(body) =
        payload.map_err(|rejection| ApiError::invalid_input("body", rejection.body_text()))?;
    let request = CreateTaskRequest::try_from(body)?;
    let task = service.create(request).await?;
    Ok((StatusCode::CREATED, Json(TaskJson::from(task))))
}

/// Handler for `GET /tasks`.
#[tracing::instrument(skip_all)]
pub async fn list_tasks_handler<R, C>(
    State(service): State<TaskService<R, C>>,
    params: Result<Query<ListTasksParams>, QueryRejection>,
) -> Result<Json<Vec<TaskJson>>, ApiError>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Query(raw) =
        params.map_err(|rejection| ApiError::invalid_input("query", rejection.body_text()))?;
    let query = TaskListQuery::try_from(raw)?;
    let tasks = service.list(query).await?;
    Ok(Json(tasks.into_iter().map(TaskJson::from).collect()))
}

/// Handler for `GET /tasks/{id}`.
#[tracing::instrument(skip(service))]
pub async fn get_task_handler<R, C>(
    State(service): State<TaskService<R, C>>,
    Path(raw_id): Path<String>,
) -> Result<Json<TaskJson>, ApiError>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let id = parse_task_id(&raw_id)?;
    let task = service.get(id).await?.ok_or(ApiError::NotFound(id))?;
    Ok(Json(TaskJson::from(task)))
}

/// Handler for `PUT /tasks/{id}`.
#[tracing::instrument(skip(service, payload))]
pub async fn update_task_handler<R, C>(
    State(service): State<TaskService<R, C>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateTaskBody>, JsonRejection>,
) -> Result<Json<TaskJson>, ApiError>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let id = parse_task_id(&raw_id)?;
    let Json(body) =
        payload.map_err(|rejection| ApiError::invalid_input("body", rejection.body_text()))?;
    let task = service
        .update(id, UpdateTaskRequest::from(body))
        .await?
        .ok_or(ApiError::NotFound(id))?;
    Ok(Json(TaskJson::from(task)))
}

/// Handler for `DELETE /tasks/{id}`.
#[tracing::instrument(skip(service))]
pub async fn delete_task_handler<R, C>(
    State(service): State<TaskService<R, C>>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let id = parse_task_id(&raw_id)?;
    if service.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(id))
    }
}

/// Creates the task router, with paths relative to the API prefix.
#[must_use]
pub fn create_task_router<R, C>(service: TaskService<R, C>) -> Router
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/tasks",
            get(list_tasks_handler::<R, C>).post(create_task_handler::<R, C>),
        )
        .route(
            "/tasks/{id}",
            get(get_task_handler::<R, C>)
                .put(update_task_handler::<R, C>)
                .delete(delete_task_handler::<R, C>),
        )
        .with_state(service)
}
