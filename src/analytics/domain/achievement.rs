//! Threshold achievements for reviewers.

use crate::task::domain::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

/// Kind of achievement a reviewer can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AchievementType {
    /// High approval rate over the current month.
    QualityChampion,
    /// High review volume over the current week.
    SpeedReviewer,
}

impl AchievementType {
    /// Every achievement type.
    pub const ALL: [Self; 2] = [Self::QualityChampion, Self::SpeedReviewer];

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QualityChampion => "QUALITY_CHAMPION",
            Self::SpeedReviewer => "SPEED_REVIEWER",
        }
    }

    /// Returns `true` when `evidence` meets the threshold for this type.
    #[must_use]
    pub fn is_earned(self, evidence: &AchievementEvidence, thresholds: AchievementThresholds) -> bool {
        match self {
            Self::QualityChampion => {
                evidence.monthly_reviews > 0
                    && evidence.monthly_approval_rate >= thresholds.quality_champion_min_rate
            }
            Self::SpeedReviewer => evidence.weekly_reviews >= thresholds.speed_reviewer_min_reviews,
        }
    }

    /// Returns the payload stored alongside a grant.
    #[must_use]
    pub fn data(self, evidence: &AchievementEvidence) -> Value {
        match self {
            Self::QualityChampion => json!({
                "approvalRate": evidence.monthly_approval_rate,
                "reviews": evidence.monthly_reviews,
            }),
            Self::SpeedReviewer => json!({ "weeklyReviews": evidence.weekly_reviews }),
        }
    }
}

impl fmt::Display for AchievementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thresholds that gate each achievement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AchievementThresholds {
    /// Minimum monthly approval rate for quality champion.
    pub quality_champion_min_rate: f64,
    /// Minimum weekly review count for speed reviewer.
    pub speed_reviewer_min_reviews: u64,
}

impl Default for AchievementThresholds {
    fn default() -> Self {
        Self {
            quality_champion_min_rate: 90.0,
            speed_reviewer_min_reviews: 50,
        }
    }
}

/// Figures the achievement rules are evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AchievementEvidence {
    /// Approval rate over the current month.
    pub monthly_approval_rate: f64,
    /// Reviewed tasks over the current month.
    pub monthly_reviews: u64,
    /// Approved plus rejected tasks over the current week.
    pub weekly_reviews: u64,
}

/// A granted achievement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    /// Reviewer holding the achievement.
    pub reviewer_id: UserId,
    /// Kind of achievement.
    #[serde(rename = "type")]
    pub kind: AchievementType,
    /// Evidence captured at the latest evaluation.
    pub data: Value,
    /// When the achievement was first granted.
    pub granted_at: DateTime<Utc>,
}

impl Achievement {
    /// Grants `kind` to `reviewer_id`, or refreshes `existing` keeping its
    /// original grant time.
    #[must_use]
    pub fn grant_or_refresh(
        reviewer_id: UserId,
        kind: AchievementType,
        evidence: &AchievementEvidence,
        existing: Option<&Self>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            reviewer_id,
            kind,
            data: kind.data(evidence),
            granted_at: existing.map_or(now, |held| held.granted_at),
        }
    }
}
