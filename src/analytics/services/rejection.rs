//! Keyword classification of recent rejection notes.

use std::collections::BTreeMap;
use std::sync::Arc;

use mockable::Clock;
use tracing::debug;

use super::AnalyticsResult;
use crate::analytics::{
    domain::{RejectionLabel, RejectionReason, RejectionReasonSummary},
    ports::RejectionReasonRepository,
};
use crate::task::{
    domain::{TaskId, TaskStatus, UserId},
    ports::{TaskQuery, TaskRepository},
};

/// Rejected tasks scanned per classification pass unless configured.
pub const DEFAULT_SCAN_LIMIT: usize = 100;

/// Tallies rejection labels over a sliding window of recent rejections.
///
/// Each pass overwrites the count of every label that matched at least once.
/// Labels with no match in the window keep their previous record.
#[derive(Clone)]
pub struct RejectionClassifier<R, S, C>
where
    R: TaskRepository,
    S: RejectionReasonRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    reasons: Arc<S>,
    clock: Arc<C>,
    scan_limit: usize,
}

impl<R, S, C> RejectionClassifier<R, S, C>
where
    R: TaskRepository,
    S: RejectionReasonRepository,
    C: Clock + Send + Sync,
{
    /// Creates a classifier scanning [`DEFAULT_SCAN_LIMIT`] tasks.
    #[must_use]
    pub const fn new(tasks: Arc<R>, reasons: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            reasons,
            clock,
            scan_limit: DEFAULT_SCAN_LIMIT,
        }
    }

    /// Sets how many recent rejections are scanned.
    #[must_use]
    pub const fn with_scan_limit(mut self, scan_limit: usize) -> Self {
        self.scan_limit = scan_limit;
        self
    }

    /// Classifies the most recent rejections of `reviewer` and upserts one
    /// record per matched label.
    ///
    /// Returns the records written, in label order.
    ///
    /// # Errors
    ///
    /// Returns an error when the task store or reason store fails.
    pub async fn classify(&self, reviewer: UserId) -> AnalyticsResult<Vec<RejectionReason>> {
        let query = TaskQuery::new()
            .reviewed_by(reviewer)
            .with_statuses([TaskStatus::Rejected])
            .with_rejection_notes()
            .limit(self.scan_limit);
        let recent = self.tasks.query(&query).await?;

        let mut matches: BTreeMap<RejectionLabel, Vec<TaskId>> = BTreeMap::new();
        for task in &recent {
            let Some(notes) = task.rejection_notes() else {
                continue;
            };
            for label in RejectionLabel::classify(notes) {
                matches.entry(label).or_default().push(task.id());
            }
        }

        let now = self.clock.utc();
        let mut written = Vec::with_capacity(matches.len());
        for (label, matched_task_ids) in matches {
            let reason = RejectionReason {
                reviewer_id: reviewer,
                label,
                case_count: u64::try_from(matched_task_ids.len()).unwrap_or(u64::MAX),
                matched_task_ids,
                last_occurrence: now,
            };
            self.reasons.upsert_reason(&reason).await?;
            written.push(reason);
        }
        debug!(
            %reviewer,
            scanned = recent.len(),
            labels = written.len(),
            "rejection notes classified"
        );
        Ok(written)
    }

    /// Reads the `limit` most frequent stored reasons for `reviewer`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reason store fails.
    pub async fn top_reasons(
        &self,
        reviewer: UserId,
        limit: usize,
    ) -> AnalyticsResult<Vec<RejectionReasonSummary>> {
        let reasons = self.reasons.top_reasons(reviewer, limit).await?;
        Ok(reasons.iter().map(RejectionReasonSummary::from).collect())
    }
}
