//! Application services for reviewer analytics.

mod achievement;
mod error;
mod metrics;
mod rejection;
mod report;
mod trend;

pub use achievement::AchievementEvaluator;
pub use error::{AnalyticsError, AnalyticsResult};
pub use metrics::MetricsAggregator;
pub use rejection::{DEFAULT_SCAN_LIMIT, RejectionClassifier};
pub use report::PerformanceReportService;
pub use trend::TrendMaterializer;
