//! Unit tests for reviewer analytics.


use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{
        ClientId, PersistedTaskData, Task, TaskCategory, TaskId, TaskStatus, TaskVersion, UserId,
    },
    ports::{TaskRepository, TaskRepositoryResult},
};
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Thursday 14 May 2026, midday UTC.
pub(super) fn thursday_noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 14, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Shape of a reviewed task used to seed the store.
#[derive(Debug, Clone)]
pub(super) struct Review {
    pub status: TaskStatus,
    pub category: TaskCategory,
    pub notes: Option<&'static str>,
    pub finished_at: DateTime<Utc>,
    pub minutes: i64,
}

impl Review {
    pub(super) const fn approved(finished_at: DateTime<Utc>) -> Self {
        Self {
            status: TaskStatus::Completed,
            category: TaskCategory::Video,
            notes: None,
            finished_at,
            minutes: 30,
        }
    }

    pub(super) const fn rejected(finished_at: DateTime<Utc>, notes: &'static str) -> Self {
        Self {
            status: TaskStatus::Rejected,
            category: TaskCategory::Video,
            notes: Some(notes),
            finished_at,
            minutes: 30,
        }
    }

    pub(super) const fn in_category(mut self, category: TaskCategory) -> Self {
        self.category = category;
        self
    }

    pub(super) const fn taking(mut self, minutes: i64) -> Self {
        self.minutes = minutes;
        self
    }

    pub(super) fn by(&self, reviewer: UserId) -> Task {
        Task::from_persisted(PersistedTaskData {
            id: TaskId::new(),
            title: "Review fixture".to_owned(),
            status: self.status,
            category: self.category,
            client_id: ClientId::new(),
            created_by: UserId::new(),
            assigned_editor: Some(UserId::new()),
            reviewer: Some(reviewer),
            scheduler: None,
            rejection_notes: self.notes.map(str::to_owned),
            version: TaskVersion::new(3),
            created_at: self.finished_at - Duration::minutes(self.minutes),
            updated_at: self.finished_at,
        })
    }
}

/// Stores `reviews` for `reviewer` and returns the created tasks.
pub(super) async fn seed(
    tasks: &InMemoryTaskRepository,
    reviewer: UserId,
    reviews: impl IntoIterator<Item = Review>,
) -> TaskRepositoryResult<Vec<Task>> {
    let mut stored = Vec::new();
    for review in reviews {
        let task = review.by(reviewer);
        tasks.store(&task).await?;
        stored.push(task);
    }
    Ok(stored)
}

/// Ten approvals and two rejections earlier this month, one of them noting a
/// font problem.
pub(super) fn month_with_typography_rejection(now: DateTime<Utc>) -> Vec<Review> {
    let mut reviews: Vec<Review> = (1..=10)
        .map(|hours| Review::approved(now - Duration::hours(hours)))
        .collect();
    reviews.push(Review::rejected(now - Duration::days(2), "font size too small"));
    reviews.push(Review {
        notes: None,
        ..Review::rejected(now - Duration::days(3), "")
    });
    reviews
}
