//! Given steps for task workflow BDD scenarios.

use super::world::{WorkflowWorld, run_async};
use eyre::WrapErr;
use qcflow::task::{
    domain::{ClientId, TaskCategory},
    ports::ClientProfile,
    services::{CreateTaskRequest, TransitionTaskRequest},
};
use rstest_bdd_macros::given;

fn register_client(world: &mut WorkflowWorld, requires_review: bool) -> Result<(), eyre::Report> {
    let client_id = ClientId::new();
    world
        .clients
        .insert(ClientProfile::new(client_id, requires_review))
        .wrap_err("register scenario client")?;
    world.client_id = Some(client_id);
    Ok(())
}

#[given("a client that requires its own review")]
fn client_requires_review(world: &mut WorkflowWorld) -> Result<(), eyre::Report> {
    register_client(world, true)
}

#[given("a client that does not require review")]
fn client_without_review(world: &mut WorkflowWorld) -> Result<(), eyre::Report> {
    register_client(world, false)
}

#[given("a task for that client assigned to a reviewer")]
fn task_for_client(world: &mut WorkflowWorld) -> Result<(), eyre::Report> {
    let client_id = world
        .client_id
        .ok_or_else(|| eyre::eyre!("missing client in scenario world"))?;
    let request = CreateTaskRequest::new("Brand refresh teaser", client_id, TaskCategory::Video)
        .with_editor(world.editor.user_id)
        .with_reviewer(world.reviewer.user_id);
    let created = run_async(world.service.create_task(world.manager, request))
        .wrap_err("create task for workflow scenario")?;
    world.original = Some(created.clone());
    world.current = Some(created);
    Ok(())
}

#[given(r#"the {role} has moved the task to "{status}""#)]
fn task_has_been_moved(
    world: &mut WorkflowWorld,
    role: String,
    status: String,
) -> Result<(), eyre::Report> {
    let actor = world.actor(&role)?;
    let task = world.task()?;
    let request = TransitionTaskRequest::new(task.id(), task.version(), status);
    let moved = run_async(world.service.apply_transition(actor, request))
        .wrap_err("transition task in scenario setup")?;
    world.current = Some(moved);
    Ok(())
}
