//! When steps for task workflow BDD scenarios.

use super::world::{WorkflowWorld, run_async};
use qcflow::task::{domain::TaskVersion, services::TransitionTaskRequest};
use rstest_bdd_macros::when;

fn move_task(
    world: &mut WorkflowWorld,
    role: &str,
    status: String,
    version: TaskVersion,
) -> Result<(), eyre::Report> {
    let actor = world.actor(role)?;
    let task_id = world.task()?.id();
    let request = TransitionTaskRequest::new(task_id, version, status);
    let result = run_async(world.service.apply_transition(actor, request));
    if let Ok(ref updated) = result {
        world.current = Some(updated.clone());
    }
    world.last_result = Some(result);
    Ok(())
}

#[when(r#"the {role} moves the task to "{status}""#)]
fn moves_task(world: &mut WorkflowWorld, role: String, status: String) -> Result<(), eyre::Report> {
    let version = world.task()?.version();
    move_task(world, &role, status, version)
}

#[when(r#"the {role} moves the task to "{status}" using the original version"#)]
fn moves_task_with_original_version(
    world: &mut WorkflowWorld,
    role: String,
    status: String,
) -> Result<(), eyre::Report> {
    let version = world
        .original
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing original task in scenario world"))?
        .version();
    move_task(world, &role, status, version)
}
