//! Keyword taxonomy for rejection notes.

use super::AnalyticsDomainError;
use crate::task::domain::{TaskId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed label assigned to rejection notes by keyword match.
///
/// Variant order is the tie-break order for equally frequent reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RejectionLabel {
    /// Off-brand or mismatched colours.
    #[serde(rename = "Brand color")]
    BrandColor,
    /// Font and text setting problems.
    #[serde(rename = "Typography")]
    Typography,
    /// Sound mix and voiceover problems.
    #[serde(rename = "Audio quality")]
    AudioQuality,
    /// Layout and spacing problems.
    #[serde(rename = "Grid alignment")]
    GridAlignment,
    /// Required content left out.
    #[serde(rename = "Missing elements")]
    MissingElements,
    /// Framing, crop, and resolution problems.
    #[serde(rename = "Aspect ratio")]
    AspectRatio,
    /// Legibility problems.
    #[serde(rename = "Contrast")]
    Contrast,
}

impl RejectionLabel {
    /// Every label in tie-break order.
    pub const ALL: [Self; 7] = [
        Self::BrandColor,
        Self::Typography,
        Self::AudioQuality,
        Self::GridAlignment,
        Self::MissingElements,
        Self::AspectRatio,
        Self::Contrast,
    ];

    /// Returns the display label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BrandColor => "Brand color",
            Self::Typography => "Typography",
            Self::AudioQuality => "Audio quality",
            Self::GridAlignment => "Grid alignment",
            Self::MissingElements => "Missing elements",
            Self::AspectRatio => "Aspect ratio",
            Self::Contrast => "Contrast",
        }
    }

    /// Returns the lowercase keywords that select this label.
    #[must_use]
    pub const fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::BrandColor => &["brand color", "color mismatch", "color match", "off-brand"],
            Self::Typography => &["font", "typography", "typeface", "kerning", "text size"],
            Self::AudioQuality => &["audio", "sound", "volume", "music level", "voiceover"],
            Self::GridAlignment => &["alignment", "misaligned", "grid", "spacing", "padding"],
            Self::MissingElements => &["missing", "not included", "forgot", "omitted", "absent"],
            Self::AspectRatio => &[
                "aspect ratio",
                "resolution",
                "crop",
                "dimensions",
                "cropped",
            ],
            Self::Contrast => &[
                "contrast",
                "readability",
                "too dark",
                "too light",
                "legibility",
            ],
        }
    }

    fn matches_lowercase(self, lowered: &str) -> bool {
        self.keywords()
            .iter()
            .any(|keyword| lowered.contains(keyword))
    }

    /// Returns every label whose keywords appear in `notes`.
    #[must_use]
    pub fn classify(notes: &str) -> Vec<Self> {
        let lowered = notes.to_lowercase();
        Self::ALL
            .into_iter()
            .filter(|label| label.matches_lowercase(&lowered))
            .collect()
    }
}

impl fmt::Display for RejectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for RejectionLabel {
    type Error = AnalyticsDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let wanted = value.trim();
        Self::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AnalyticsDomainError::UnknownRejectionLabel(value.to_owned()))
    }
}

/// Persisted tally of one rejection label for one reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionReason {
    /// Reviewer who issued the rejections.
    pub reviewer_id: UserId,
    /// Label being counted.
    pub label: RejectionLabel,
    /// Matching tasks in the most recent scan.
    pub case_count: u64,
    /// Identifiers of the matching tasks, newest first.
    pub matched_task_ids: Vec<TaskId>,
    /// When the label last matched.
    pub last_occurrence: DateTime<Utc>,
}

/// Report-facing summary of a rejection reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionReasonSummary {
    /// Display label.
    pub reason: String,
    /// Number of matching cases.
    pub cases: u64,
}

impl From<&RejectionReason> for RejectionReasonSummary {
    fn from(reason: &RejectionReason) -> Self {
        Self {
            reason: reason.label.as_str().to_owned(),
            cases: reason.case_count,
        }
    }
}
