//! Ordering, filtering and pagination performed in SQL.

use super::helpers::{PgTestContext, pg_context};
use chrono::{TimeZone, Utc};
use eyre::{OptionExt, ensure};
use rstest::rstest;
use tasktrack::task::{
    domain::{
        Pagination, PersistedTaskData, Task, TaskId, TaskListQuery, TaskStatus, TaskTitle,
    },
    ports::TaskRepository,
};

fn task_at(title: &str, status: TaskStatus, offset_seconds: i64) -> eyre::Result<Task> {
    let timestamp = Utc
        .timestamp_opt(1_700_000_000 + offset_seconds, 0)
        .single()
        .ok_or_eyre("valid timestamp")?
        .fixed_offset();
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        title: TaskTitle::new(title)?,
        description: None,
        status,
        created_at: timestamp,
        updated_at: timestamp,
    }))
}

fn titles(tasks: &[Task]) -> Vec<String> {
    tasks
        .iter()
        .map(|task| task.title().as_str().to_owned())
        .collect()
}

#[rstest]
#[case(None, 0, 100, &["e", "d", "c", "b", "a"])]
#[case(None, 0, 3, &["e", "d", "c"])]
#[case(None, 3, 3, &["b", "a"])]
#[case(Some(TaskStatus::Completed), 0, 100, &["d", "b"])]
#[case(Some(TaskStatus::Created), 1, 1, &["c"])]
fn listing_matches_in_memory_semantics(
    pg_context: PgTestContext,
    #[case] status: Option<TaskStatus>,
    #[case] skip: i64,
    #[case] limit: i64,
    #[case] expected: &[&str],
) -> eyre::Result<()> {
    let ctx = pg_context;
    let seeded = [
        ("a", TaskStatus::Created),
        ("b", TaskStatus::Completed),
        ("c", TaskStatus::Created),
        ("d", TaskStatus::Completed),
        ("e", TaskStatus::Created),
    ];
    for (offset, (title, task_status)) in (0_i64..).zip(seeded) {
        ctx.block_on(ctx.repository.store(&task_at(title, task_status, offset)?))?;
    }
    let base = TaskListQuery::new(Pagination::new(skip, limit)?);
    let query = match status {
        Some(filter) => base.with_status(filter),
        None => base,
    };

    let listed = ctx.block_on(ctx.repository.list(&query))?;

    ensure!(
        titles(&listed) == expected,
        "unexpected listing: {:?}",
        titles(&listed)
    );
    Ok(())
}

#[rstest]
fn equal_creation_times_list_in_stable_order(pg_context: PgTestContext) -> eyre::Result<()> {
    let ctx = pg_context;
    for title in ["x", "y", "z"] {
        ctx.block_on(ctx.repository.store(&task_at(title, TaskStatus::Created, 0)?))?;
    }
    let query = TaskListQuery::default();

    let first = titles(&ctx.block_on(ctx.repository.list(&query))?);
    let second = titles(&ctx.block_on(ctx.repository.list(&query))?);

    ensure!(first.len() == 3, "expected three tasks, got {first:?}");
    ensure!(first == second, "tie order changed: {first:?} vs {second:?}");
    Ok(())
}
