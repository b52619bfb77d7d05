//! Shared world state for reviewer performance BDD scenarios.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use qcflow::{
    analytics::{
        adapters::memory::{InMemoryAnalyticsStore, InMemoryReviewerDirectory},
        domain::PerformanceReport,
        services::{AnalyticsError, PerformanceReportService},
    },
    clock::FixedClock,
    config::AnalyticsConfig,
    task::{adapters::memory::InMemoryTaskRepository, domain::UserId},
};
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestReportService = PerformanceReportService<
    InMemoryTaskRepository,
    InMemoryAnalyticsStore,
    InMemoryReviewerDirectory,
    FixedClock,
>;

/// Thursday 14 May 2026, midday UTC.
#[must_use]
pub fn scenario_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 14, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Scenario world for reviewer performance behaviour tests.
pub struct PerformanceWorld {
    pub service: TestReportService,
    pub tasks: InMemoryTaskRepository,
    pub reviewers: InMemoryReviewerDirectory,
    pub reviewer: UserId,
    pub seeded: i64,
    pub last_report: Option<Result<PerformanceReport, AnalyticsError>>,
}

impl PerformanceWorld {
    /// Creates a world whose clock is frozen at [`scenario_now`].
    #[must_use]
    pub fn new() -> Self {
        let tasks = InMemoryTaskRepository::new();
        let reviewers = InMemoryReviewerDirectory::new();
        let service = PerformanceReportService::new(
            Arc::new(tasks.clone()),
            Arc::new(InMemoryAnalyticsStore::new()),
            Arc::new(reviewers.clone()),
            Arc::new(FixedClock::new(scenario_now())),
            AnalyticsConfig::default(),
        );

        Self {
            service,
            tasks,
            reviewers,
            reviewer: UserId::new(),
            seeded: 0,
            last_report: None,
        }
    }

    /// Returns the most recent successful report.
    ///
    /// # Errors
    ///
    /// Returns an error when no report was requested or the request failed.
    pub fn report(&self) -> eyre::Result<&PerformanceReport> {
        match self.last_report.as_ref() {
            Some(Ok(report)) => Ok(report),
            Some(Err(err)) => Err(eyre::eyre!("report request failed: {err}")),
            None => Err(eyre::eyre!("no report requested in scenario world")),
        }
    }
}

impl Default for PerformanceWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> PerformanceWorld {
    PerformanceWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
