//! Create, lookup, update and delete through the task service.

use super::helpers::{TestService, service};
use eyre::{OptionExt, ensure};
use rstest::rstest;
use tasktrack::task::{
    domain::{TaskId, TaskStatus},
    services::{CreateTaskRequest, TaskServiceError, UpdateTaskRequest},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_task_is_retrievable_unchanged(service: TestService) -> eyre::Result<()> {
    let created = service
        .create(CreateTaskRequest::new("  Buy milk ").with_description(" 2 litres "))
        .await?;

    ensure!(created.title().as_str() == "Buy milk", "title not trimmed");
    ensure!(
        created.description().map(|value| value.as_str()) == Some(" 2 litres "),
        "description should be stored verbatim"
    );
    ensure!(created.status() == TaskStatus::Created, "default status");
    ensure!(created.created_at() == created.updated_at(), "timestamps differ");

    let fetched = service
        .get(created.id())
        .await?
        .ok_or_eyre("created task should be found")?;
    ensure!(fetched == created, "fetched task differs from created task");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn updates_merge_into_existing_task(service: TestService) -> eyre::Result<()> {
    let created = service
        .create(CreateTaskRequest::new("Report").with_description("Quarterly"))
        .await?;

    let renamed = service
        .update(created.id(), UpdateTaskRequest::new().with_title("Annual report"))
        .await?
        .ok_or_eyre("task should exist")?;
    let progressed = service
        .update(created.id(), UpdateTaskRequest::new().with_status("IN_PROGRESS"))
        .await?
        .ok_or_eyre("task should exist")?;

    ensure!(renamed.title().as_str() == "Annual report", "title not replaced");
    ensure!(progressed.title().as_str() == "Annual report", "title lost");
    ensure!(
        progressed.description().map(|value| value.as_str()) == Some("Quarterly"),
        "description lost"
    );
    ensure!(progressed.status() == TaskStatus::InProgress, "status not set");
    ensure!(progressed.created_at() == created.created_at(), "created_at moved");
    ensure!(progressed.updated_at() >= renamed.updated_at(), "updated_at regressed");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_tasks_are_reported_without_errors(service: TestService) -> eyre::Result<()> {
    let unknown = TaskId::new();

    ensure!(service.get(unknown).await?.is_none(), "get should be None");
    ensure!(
        service
            .update(unknown, UpdateTaskRequest::new().with_status("COMPLETED"))
            .await?
            .is_none(),
        "update should be None"
    );
    ensure!(!service.delete(unknown).await?, "delete should be false");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_task_is_gone(service: TestService) -> eyre::Result<()> {
    let created = service.create(CreateTaskRequest::new("Temporary")).await?;

    ensure!(service.delete(created.id()).await?, "first delete removes");
    ensure!(service.get(created.id()).await?.is_none(), "task still found");
    ensure!(!service.delete(created.id()).await?, "second delete is a no-op");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lowercase_status_is_rejected(service: TestService) -> eyre::Result<()> {
    let result = service
        .create(CreateTaskRequest::new("Case").with_status("completed"))
        .await;

    ensure!(
        matches!(&result, Err(TaskServiceError::Validation(err)) if err.field() == "status"),
        "expected status validation error, got {result:?}"
    );
    Ok(())
}
