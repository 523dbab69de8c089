//! Then steps for task lifecycle BDD scenarios.

use super::world::{TaskWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::then;
use tasktrack::task::services::TaskServiceError;

#[then(r#"the task has status "{status}""#)]
fn task_has_status(world: &TaskWorld, status: String) -> Result<(), eyre::Report> {
    let task = world.current()?;
    eyre::ensure!(
        task.status().as_str() == status,
        "expected status {status}, found {}",
        task.status()
    );
    Ok(())
}

#[then(r#"the task title is "{title}""#)]
fn task_has_title(world: &TaskWorld, title: String) -> Result<(), eyre::Report> {
    let task = world.current()?;
    eyre::ensure!(
        task.title().as_str() == title,
        "expected title {title}, found {}",
        task.title()
    );
    Ok(())
}

#[then("the task can be retrieved by its identifier")]
fn task_is_retrievable(world: &TaskWorld) -> Result<(), eyre::Report> {
    let task = world.current()?;
    let fetched = run_async(world.service.get(task.id())).wrap_err("fetch task")?;
    eyre::ensure!(
        fetched.as_ref() == Some(task),
        "fetched task {fetched:?} does not match {task:?}"
    );
    Ok(())
}

#[then("the task can no longer be retrieved")]
fn task_is_gone(world: &TaskWorld) -> Result<(), eyre::Report> {
    let id = world.current()?.id();
    let fetched = run_async(world.service.get(id)).wrap_err("fetch deleted task")?;
    eyre::ensure!(fetched.is_none(), "task {id} is still present");
    Ok(())
}

#[then(r#"creation fails on field "{field}""#)]
fn creation_fails_on_field(world: &TaskWorld, field: String) -> Result<(), eyre::Report> {
    let result = world
        .last_create_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing create result in scenario world"))?;
    match result {
        Err(TaskServiceError::Validation(err)) if err.field() == field => Ok(()),
        other => Err(eyre::eyre!(
            "expected validation failure on {field}, got {other:?}"
        )),
    }
}

#[then(r#"the listed titles are "{titles}""#)]
fn listed_titles(world: &TaskWorld, titles: String) -> Result<(), eyre::Report> {
    let listing = world
        .last_listing
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing listing in scenario world"))?;
    let expected: Vec<&str> = titles.split(',').map(str::trim).collect();
    let actual: Vec<&str> = listing.iter().map(|task| task.title().as_str()).collect();
    eyre::ensure!(actual == expected, "expected {expected:?}, found {actual:?}");
    Ok(())
}
