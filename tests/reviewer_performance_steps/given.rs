//! Given steps for reviewer performance BDD scenarios.

use super::world::{PerformanceWorld, run_async, scenario_now};
use chrono::{DateTime, Duration, Utc};
use eyre::WrapErr;
use qcflow::{
    analytics::domain::ReportPeriod,
    task::{
        domain::{
            ClientId, PersistedTaskData, Task, TaskCategory, TaskId, TaskStatus, TaskVersion,
            UserId,
        },
        ports::TaskRepository,
    },
};
use rstest_bdd_macros::given;

const REVIEW_MINUTES: i64 = 30;

fn store_review(
    world: &mut PerformanceWorld,
    status: TaskStatus,
    notes: Option<String>,
    finished_at: DateTime<Utc>,
) -> Result<(), eyre::Report> {
    let task = Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        title: "Scenario review".to_owned(),
        status,
        category: TaskCategory::Design,
        client_id: ClientId::new(),
        created_by: UserId::new(),
        assigned_editor: Some(UserId::new()),
        reviewer: Some(world.reviewer),
        scheduler: None,
        rejection_notes: notes,
        version: TaskVersion::new(4),
        created_at: finished_at - Duration::minutes(REVIEW_MINUTES),
        updated_at: finished_at,
    });
    run_async(world.tasks.store(&task)).wrap_err("store scenario review")?;
    world.seeded += 1;
    Ok(())
}

/// Each review this month finishes a few minutes before the previous one.
fn earlier_this_month(world: &PerformanceWorld) -> DateTime<Utc> {
    scenario_now() - Duration::minutes(10 * (world.seeded + 1))
}

#[given("a registered reviewer")]
fn registered_reviewer(world: &mut PerformanceWorld) -> Result<(), eyre::Report> {
    world
        .reviewers
        .register(world.reviewer)
        .wrap_err("register scenario reviewer")?;
    Ok(())
}

#[given("a user who is not a reviewer")]
fn unregistered_user(world: &mut PerformanceWorld) {
    world.reviewer = UserId::new();
}

#[given("the reviewer approved {count:u64} tasks this month")]
fn approved_this_month(world: &mut PerformanceWorld, count: u64) -> Result<(), eyre::Report> {
    for _ in 0..count {
        let finished_at = earlier_this_month(world);
        store_review(world, TaskStatus::Completed, None, finished_at)?;
    }
    Ok(())
}

#[given("the reviewer approved {count:u64} tasks last month")]
fn approved_last_month(world: &mut PerformanceWorld, count: u64) -> Result<(), eyre::Report> {
    for _ in 0..count {
        let finished_at = scenario_now() - Duration::days(30) - Duration::hours(world.seeded);
        store_review(world, TaskStatus::Completed, None, finished_at)?;
    }
    Ok(())
}

#[given(r#"the reviewer rejected a task this month noting "{notes}""#)]
fn rejected_with_notes(world: &mut PerformanceWorld, notes: String) -> Result<(), eyre::Report> {
    let finished_at = earlier_this_month(world);
    store_review(world, TaskStatus::Rejected, Some(notes), finished_at)
}

#[given("the reviewer rejected a task this month without notes")]
fn rejected_without_notes(world: &mut PerformanceWorld) -> Result<(), eyre::Report> {
    let finished_at = earlier_this_month(world);
    store_review(world, TaskStatus::Rejected, None, finished_at)
}

#[given("the {period} performance report has been requested")]
fn report_already_requested(
    world: &mut PerformanceWorld,
    period: String,
) -> Result<(), eyre::Report> {
    let parsed = ReportPeriod::try_from(period.as_str())
        .map_err(|err| eyre::eyre!("invalid period in scenario: {err}"))?;
    let report = run_async(world.service.get_performance_report(world.reviewer, parsed))
        .wrap_err("request report in scenario setup")?;
    world.last_report = Some(Ok(report));
    Ok(())
}
