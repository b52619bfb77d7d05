//! End-to-end workflow tests with background side-effect delivery.

use super::helpers::{Engine, engine};
use eyre::{OptionExt, ensure};
use qcflow::task::{
    domain::{
        Actor, ActorRole, AuditAction, Task, TaskCategory, TaskFieldChanges, TaskStatus, UserId,
    },
    ports::task_list_key,
    services::{
        CreateTaskRequest, TransitionTaskRequest, UpdateTaskDetailsRequest, WorkflowErrorKind,
    },
};
use rstest::rstest;
use serde_json::json;

async fn create_task(engine: &Engine, requires_review: bool) -> eyre::Result<Task> {
    let client = engine.client(requires_review)?;
    let task = engine
        .workflow
        .create_task(
            engine.manager,
            CreateTaskRequest::new("Spring campaign cutdown", client, TaskCategory::Video)
                .with_editor(engine.editor.user_id)
                .with_reviewer(engine.reviewer.user_id),
        )
        .await?;
    engine.dispatcher.flush().await;
    Ok(task)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_review_cycle_is_audited_in_order(engine: Engine) -> eyre::Result<()> {
    let task = create_task(&engine, false).await?;
    let mut current = task;
    for (actor, status) in [
        (engine.editor, "IN_PROGRESS"),
        (engine.editor, "READY_FOR_QC"),
        (engine.reviewer, "QC_IN_PROGRESS"),
        (engine.reviewer, "COMPLETED"),
    ] {
        current = engine
            .workflow
            .apply_transition(
                actor,
                TransitionTaskRequest::new(current.id(), current.version(), status),
            )
            .await?;
        engine.dispatcher.flush().await;
    }

    let entries = engine.audit.entries()?;
    let actions: Vec<AuditAction> = entries.iter().map(|entry| entry.action).collect();
    ensure!(current.status() == TaskStatus::Completed);
    ensure!(
        actions
            == [
                AuditAction::TaskCreated,
                AuditAction::StatusChanged,
                AuditAction::StatusChanged,
                AuditAction::StatusChanged,
                AuditAction::StatusChanged,
            ],
        "unexpected audit trail: {actions:?}"
    );
    ensure!(
        entries
            .last()
            .is_some_and(|entry| entry.details["to"] == json!("COMPLETED"))
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn client_review_requirement_redirects_completion(engine: Engine) -> eyre::Result<()> {
    let task = create_task(&engine, true).await?;

    let updated = engine
        .workflow
        .apply_transition(
            engine.reviewer,
            TransitionTaskRequest::new(task.id(), task.version(), "COMPLETED"),
        )
        .await?;
    engine.dispatcher.flush().await;

    ensure!(updated.status() == TaskStatus::ClientReview);
    let entries = engine.audit.entries()?;
    let last = entries.last().ok_or_eyre("no audit entries")?;
    ensure!(last.details["requested"] == json!("COMPLETED"));
    ensure!(last.details["to"] == json!("CLIENT_REVIEW"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transition_invalidates_affected_task_lists(engine: Engine) -> eyre::Result<()> {
    let task = create_task(&engine, false).await?;
    let bystander = UserId::new();
    let editor_key = task_list_key(engine.editor.user_id, "assigned");
    let bystander_key = task_list_key(bystander, "assigned");
    engine.cache.put(editor_key.clone(), json!([]))?;
    engine.cache.put(bystander_key.clone(), json!([]))?;

    engine
        .workflow
        .apply_transition(
            engine.editor,
            TransitionTaskRequest::new(task.id(), task.version(), "IN_PROGRESS"),
        )
        .await?;
    engine.dispatcher.flush().await;

    ensure!(!engine.cache.contains(&editor_key)?);
    ensure!(engine.cache.contains(&bystander_key)?);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_writer_conflicts_and_is_not_audited(engine: Engine) -> eyre::Result<()> {
    let task = create_task(&engine, false).await?;

    engine
        .workflow
        .apply_transition(
            engine.editor,
            TransitionTaskRequest::new(task.id(), task.version(), "IN_PROGRESS"),
        )
        .await?;
    let stale = engine
        .workflow
        .apply_transition(
            engine.manager,
            TransitionTaskRequest::new(task.id(), task.version(), "ON_HOLD"),
        )
        .await;
    engine.dispatcher.flush().await;

    ensure!(
        stale
            .as_ref()
            .is_err_and(|err| err.kind() == WorkflowErrorKind::Conflict),
        "expected conflict, got {stale:?}"
    );
    ensure!(engine.workflow.find_task(task.id()).await?.status() == TaskStatus::InProgress);
    ensure!(engine.audit.entries()?.len() == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn scheduler_reassigns_but_cannot_move_status(engine: Engine) -> eyre::Result<()> {
    let task = create_task(&engine, false).await?;
    let scheduler = Actor::new(UserId::new(), ActorRole::Scheduler);
    let replacement = UserId::new();

    let moved = engine
        .workflow
        .apply_transition(
            scheduler,
            TransitionTaskRequest::new(task.id(), task.version(), "IN_PROGRESS"),
        )
        .await;
    let reassigned = engine
        .workflow
        .update_details(
            scheduler,
            UpdateTaskDetailsRequest::new(
                task.id(),
                task.version(),
                TaskFieldChanges::new().with_assigned_editor(replacement),
            ),
        )
        .await?;
    engine.dispatcher.flush().await;

    ensure!(moved.is_err_and(|err| err.kind() == WorkflowErrorKind::Forbidden));
    ensure!(reassigned.assigned_editor() == Some(replacement));
    ensure!(reassigned.status() == TaskStatus::Pending);
    ensure!(
        engine
            .audit
            .entries()?
            .last()
            .is_some_and(|entry| entry.action == AuditAction::DetailsUpdated)
    );
    Ok(())
}
