//! Shared fixtures for in-memory integration tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use qcflow::{
    analytics::{
        adapters::memory::{InMemoryAnalyticsStore, InMemoryReviewerDirectory},
        services::PerformanceReportService,
    },
    clock::FixedClock,
    config::EngineConfig,
    task::{
        adapters::memory::{
            InMemoryAuditLog, InMemoryClientDirectory, InMemoryTaskListCache,
            InMemoryTaskRepository,
        },
        domain::{Actor, ActorRole, ClientId, UserId},
        ports::ClientProfile,
        services::{SideEffectDispatcher, TaskWorkflowService},
    },
};
use rstest::fixture;

/// Workflow service wired to in-memory adapters.
pub type Workflow = TaskWorkflowService<
    InMemoryTaskRepository,
    InMemoryClientDirectory,
    SideEffectDispatcher,
    FixedClock,
>;

/// Report service wired to in-memory adapters.
pub type Reports = PerformanceReportService<
    InMemoryTaskRepository,
    InMemoryAnalyticsStore,
    InMemoryReviewerDirectory,
    FixedClock,
>;

/// Monday 4 May 2026, 09:00 UTC.
#[must_use]
pub fn monday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

/// A fully wired engine sharing one task store between workflow and
/// analytics.
pub struct Engine {
    pub workflow: Workflow,
    pub reports: Reports,
    pub dispatcher: Arc<SideEffectDispatcher>,
    pub clock: FixedClock,
    pub cache: InMemoryTaskListCache,
    pub audit: InMemoryAuditLog,
    pub clients: InMemoryClientDirectory,
    pub reviewers: InMemoryReviewerDirectory,
    pub manager: Actor,
    pub editor: Actor,
    pub reviewer: Actor,
}

impl Engine {
    /// Registers a client and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory rejects the insert.
    pub fn client(&self, requires_review: bool) -> eyre::Result<ClientId> {
        let id = ClientId::new();
        self.clients.insert(ClientProfile::new(id, requires_review))?;
        Ok(id)
    }
}

/// Provides an engine with a frozen clock and immediate side-effect delivery.
///
/// Must be requested from inside a tokio runtime.
#[fixture]
pub fn engine() -> Engine {
    let config = EngineConfig::immediate_delivery();
    let clock = FixedClock::new(monday_morning());
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let cache = InMemoryTaskListCache::new();
    let audit = InMemoryAuditLog::new();
    let clients = InMemoryClientDirectory::new();
    let reviewers = InMemoryReviewerDirectory::new();

    let (handle, _worker) = SideEffectDispatcher::spawn(
        Arc::new(cache.clone()),
        Arc::new(audit.clone()),
        config.side_effects,
    );
    let dispatcher = Arc::new(handle);
    let workflow = TaskWorkflowService::new(
        Arc::clone(&tasks),
        Arc::new(clients.clone()),
        Arc::clone(&dispatcher),
        Arc::new(clock.clone()),
    );
    let reports = PerformanceReportService::new(
        tasks,
        Arc::new(InMemoryAnalyticsStore::new()),
        Arc::new(reviewers.clone()),
        Arc::new(clock.clone()),
        config.analytics,
    );

    Engine {
        workflow,
        reports,
        dispatcher,
        clock,
        cache,
        audit,
        clients,
        reviewers,
        manager: Actor::new(UserId::new(), ActorRole::Manager),
        editor: Actor::new(UserId::new(), ActorRole::Editor),
        reviewer: Actor::new(UserId::new(), ActorRole::Reviewer),
    }
}
