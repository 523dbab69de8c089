//! Given steps for task lifecycle BDD scenarios.

use super::world::{TaskWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use tasktrack::task::{domain::TaskListQuery, services::CreateTaskRequest};

#[given("an empty task service")]
fn empty_task_service(world: &mut TaskWorld) -> Result<(), eyre::Report> {
    let existing = run_async(world.service.list(TaskListQuery::default()))
        .wrap_err("list tasks in fresh world")?;
    eyre::ensure!(existing.is_empty(), "expected no tasks, found {}", existing.len());
    Ok(())
}

#[given(r#"a task titled "{title}" exists"#)]
fn task_exists(world: &mut TaskWorld, title: String) -> Result<(), eyre::Report> {
    let created = run_async(world.service.create(CreateTaskRequest::new(title)))
        .wrap_err("create task for scenario")?;
    world.current_task = Some(created);
    Ok(())
}

#[given(r#"a "{status}" task titled "{title}""#)]
fn task_with_status(
    world: &mut TaskWorld,
    status: String,
    title: String,
) -> Result<(), eyre::Report> {
    let created = run_async(
        world
            .service
            .create(CreateTaskRequest::new(title).with_status(status)),
    )
    .wrap_err("create task with status for scenario")?;
    world.current_task = Some(created);
    Ok(())
}
