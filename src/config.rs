//! Engine configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration.
//!
//! # Examples
//!
//! ```
//! use qcflow::config::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str("[analytics]\ntrend_months = 12\n")?;
//! assert_eq!(config.analytics.trend_months, 12);
//! assert_eq!(config.analytics.top_reasons_limit, 5);
//! # Ok::<(), qcflow::config::ConfigError>(())
//! ```

use crate::analytics::domain::{AchievementThresholds, QualityThresholds};
use crate::task::services::RetryPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level configuration for the workflow engine and analytics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Analytics limits and thresholds.
    pub analytics: AnalyticsConfig,
    /// Retry policy for cache invalidation and audit delivery.
    pub side_effects: RetryPolicy,
}

impl EngineConfig {
    /// Parses a TOML document, filling missing keys with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] when a value is out of range.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration that delivers side effects without backoff delays.
    ///
    /// Useful for tests.
    #[must_use]
    pub fn immediate_delivery() -> Self {
        Self {
            side_effects: RetryPolicy::immediate(RetryPolicy::default().max_attempts),
            ..Self::default()
        }
    }

    /// Checks value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analytics.validate()?;
        if self.side_effects.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "side_effects.max_attempts must be at least 1".to_owned(),
            ));
        }
        if !self.side_effects.multiplier.is_finite() || self.side_effects.multiplier < 1.0 {
            return Err(ConfigError::Invalid(
                "side_effects.multiplier must be a finite value of at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Limits and thresholds for reviewer analytics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Recent rejected tasks scanned by the rejection classifier.
    pub rejection_scan_limit: usize,
    /// Rejection reasons returned in a report.
    pub top_reasons_limit: usize,
    /// Months returned in the monthly trend.
    pub trend_months: usize,
    /// Monthly approval rate that earns quality champion.
    pub quality_champion_min_rate: f64,
    /// Weekly review count that earns speed reviewer.
    pub speed_reviewer_min_reviews: u64,
    /// Category approval rate labelled excellent.
    pub excellent_rate: f64,
    /// Category approval rate labelled good.
    pub good_rate: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        let quality = QualityThresholds::default();
        let achievements = AchievementThresholds::default();
        Self {
            rejection_scan_limit: 100,
            top_reasons_limit: 5,
            trend_months: 6,
            quality_champion_min_rate: achievements.quality_champion_min_rate,
            speed_reviewer_min_reviews: achievements.speed_reviewer_min_reviews,
            excellent_rate: quality.excellent,
            good_rate: quality.good,
        }
    }
}

impl AnalyticsConfig {
    /// Returns the category label thresholds.
    #[must_use]
    pub const fn quality_thresholds(&self) -> QualityThresholds {
        QualityThresholds {
            excellent: self.excellent_rate,
            good: self.good_rate,
        }
    }

    /// Returns the achievement thresholds.
    #[must_use]
    pub const fn achievement_thresholds(&self) -> AchievementThresholds {
        AchievementThresholds {
            quality_champion_min_rate: self.quality_champion_min_rate,
            speed_reviewer_min_reviews: self.speed_reviewer_min_reviews,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let rates = [
            ("analytics.quality_champion_min_rate", self.quality_champion_min_rate),
            ("analytics.excellent_rate", self.excellent_rate),
            ("analytics.good_rate", self.good_rate),
        ];
        if let Some((key, _)) = rates
            .iter()
            .find(|(_, rate)| !(0.0..=100.0).contains(rate))
        {
            return Err(ConfigError::Invalid(format!("{key} must be within 0..=100")));
        }
        if self.good_rate > self.excellent_rate {
            return Err(ConfigError::Invalid(
                "analytics.good_rate must not exceed analytics.excellent_rate".to_owned(),
            ));
        }
        if self.rejection_scan_limit == 0 || self.trend_months == 0 {
            return Err(ConfigError::Invalid(
                "analytics.rejection_scan_limit and analytics.trend_months must be positive"
                    .to_owned(),
            ));
        }
        Ok(())
    }
}

/// Errors returned while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML or has mistyped values.
    #[error("failed to parse configuration: {0}")]
    Parse(Box<toml::de::Error>),

    /// A value is outside its permitted range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(Box::new(err))
    }
}
