//! Shared world state for task workflow BDD scenarios.

use std::sync::{Arc, Mutex};

use qcflow::task::{
    adapters::memory::{InMemoryClientDirectory, InMemoryTaskRepository},
    domain::{Actor, ActorRole, ClientId, Task, UserId},
    ports::{SideEffect, SideEffectQueue},
    services::{TaskWorkflowError, TaskWorkflowService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Queue that keeps every effect the workflow hands over.
#[derive(Debug, Default)]
pub struct CollectedEffects {
    effects: Mutex<Vec<SideEffect>>,
}

impl CollectedEffects {
    /// Number of effects queued so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.effects.lock().map_or(0, |effects| effects.len())
    }
}

impl SideEffectQueue for CollectedEffects {
    fn enqueue(&self, effect: SideEffect) {
        if let Ok(mut effects) = self.effects.lock() {
            effects.push(effect);
        }
    }
}

/// Service type used by the BDD world.
pub type TestWorkflowService = TaskWorkflowService<
    InMemoryTaskRepository,
    InMemoryClientDirectory,
    CollectedEffects,
    DefaultClock,
>;

/// Scenario world for workflow behaviour tests.
pub struct WorkflowWorld {
    pub service: TestWorkflowService,
    pub clients: InMemoryClientDirectory,
    pub effects: Arc<CollectedEffects>,
    pub manager: Actor,
    pub editor: Actor,
    pub reviewer: Actor,
    pub client_id: Option<ClientId>,
    pub original: Option<Task>,
    pub current: Option<Task>,
    pub last_result: Option<Result<Task, TaskWorkflowError>>,
}

impl WorkflowWorld {
    /// Creates a world with an empty task store and client directory.
    #[must_use]
    pub fn new() -> Self {
        let clients = InMemoryClientDirectory::new();
        let effects = Arc::new(CollectedEffects::default());
        let service = TaskWorkflowService::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(clients.clone()),
            Arc::clone(&effects),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            clients,
            effects,
            manager: Actor::new(UserId::new(), ActorRole::Manager),
            editor: Actor::new(UserId::new(), ActorRole::Editor),
            reviewer: Actor::new(UserId::new(), ActorRole::Reviewer),
            client_id: None,
            original: None,
            current: None,
            last_result: None,
        }
    }

    /// Resolves a role name from a step into the scenario's actor.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown role name.
    pub fn actor(&self, role: &str) -> eyre::Result<Actor> {
        let parsed = ActorRole::try_from(role).map_err(|err| eyre::eyre!("{err}"))?;
        Ok(match parsed {
            ActorRole::Manager => self.manager,
            ActorRole::Editor => self.editor,
            ActorRole::Reviewer => self.reviewer,
            other => Actor::new(UserId::new(), other),
        })
    }

    /// Returns the latest known state of the scenario task.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created yet.
    pub fn task(&self) -> eyre::Result<&Task> {
        self.current
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }
}

impl Default for WorkflowWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> WorkflowWorld {
    WorkflowWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
