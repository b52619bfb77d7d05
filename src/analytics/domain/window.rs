//! Calendar windows that scope analytics aggregations.
//!
//! All windows are aligned in UTC: weeks start on Monday, months on the
//! first, years on 1 January. Bounds are inclusive at both ends.

use super::AnalyticsDomainError;
use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Aggregation period requested by a report caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    /// The current calendar week.
    Week,
    /// The current calendar month.
    Month,
    /// The current calendar year.
    Year,
}

impl ReportPeriod {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Returns the window from the start of the period containing `now`
    /// up to `now`.
    #[must_use]
    pub fn window_ending(self, now: DateTime<Utc>) -> TimeWindow {
        let today = now.date_naive();
        let start_date = match self {
            Self::Week => today
                .checked_sub_days(Days::new(u64::from(
                    today.weekday().num_days_from_monday(),
                )))
                .unwrap_or(today),
            Self::Month => today.with_day(1).unwrap_or(today),
            Self::Year => today.with_ordinal(1).unwrap_or(today),
        };
        TimeWindow::new(start_of_day(start_date), now)
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ReportPeriod {
    type Error = AnalyticsDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(AnalyticsDomainError::UnknownPeriod(value.to_owned())),
        }
    }
}

/// Inclusive time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    /// First instant inside the window.
    pub start: DateTime<Utc>,
    /// Last instant inside the window.
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a window.
    #[must_use]
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Returns `true` when `instant` lies inside the window.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// A calendar month.
///
/// Deserialization goes through [`YearMonth::new`], so an out-of-range
/// month is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawYearMonth")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

#[derive(Deserialize)]
struct RawYearMonth {
    year: i32,
    month: u32,
}

impl TryFrom<RawYearMonth> for YearMonth {
    type Error = AnalyticsDomainError;

    fn try_from(raw: RawYearMonth) -> Result<Self, Self::Error> {
        Self::new(raw.year, raw.month)
    }
}

impl YearMonth {
    /// Creates a validated calendar month.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsDomainError::InvalidMonth`] when `month` is outside
    /// `1..=12` or the year is out of calendar range.
    pub fn new(year: i32, month: u32) -> Result<Self, AnalyticsDomainError> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(AnalyticsDomainError::InvalidMonth { year, month });
        }
        Ok(Self { year, month })
    }

    /// Returns the month containing `instant`.
    #[must_use]
    pub fn containing(instant: DateTime<Utc>) -> Self {
        Self {
            year: instant.year(),
            month: instant.month(),
        }
    }

    /// Returns the year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Returns the month number, `1..=12`.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// Returns the preceding month.
    #[must_use]
    pub const fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year.saturating_sub(1),
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Returns the following month.
    #[must_use]
    pub const fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year.saturating_add(1),
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Returns the first instant of the month.
    #[must_use]
    pub fn first_instant(self) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map_or(DateTime::<Utc>::MIN_UTC, start_of_day)
    }

    /// Returns the whole month as a window.
    #[must_use]
    pub fn window(self) -> TimeWindow {
        let end = self.next().first_instant() - Duration::nanoseconds(1);
        TimeWindow::new(self.first_instant(), end)
    }

    /// Returns `true` when the month has not ended at `now`.
    #[must_use]
    pub fn is_open_at(self, now: DateTime<Utc>) -> bool {
        self >= Self::containing(now)
    }

    /// Returns the `count` months ending with this one, oldest first.
    #[must_use]
    pub fn trailing(self, count: usize) -> Vec<Self> {
        let mut months: Vec<Self> =
            std::iter::successors(Some(self), |month| Some(month.previous()))
                .take(count)
                .collect();
        months.reverse();
        months
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}
