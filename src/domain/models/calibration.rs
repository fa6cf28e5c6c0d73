//! Period aggregates and reviewer calibration reports.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// The month must be representable and so must the month after it, so
    /// `start() < end()` always holds.
    pub fn new(year: i32, month: u32) -> DomainResult<Self> {
        let (next_year, next_month) = if month == 12 {
            (year.checked_add(1), 1)
        } else {
            (Some(year), month + 1)
        };
        let next_ok = next_year.is_some_and(|y| NaiveDate::from_ymd_opt(y, next_month, 1).is_some());
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() || !next_ok {
            return Err(DomainError::ValidationFailed(format!(
                "Invalid period {year:04}-{month:02}"
            )));
        }
        Ok(Self { year, month })
    }

    /// The period containing `instant` (UTC month).
    pub fn containing(instant: DateTime<Utc>) -> Self {
        Self {
            year: instant.year(),
            month: instant.month(),
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        let invalid = || DomainError::ValidationFailed(format!("Period '{s}' must be formatted YYYY-MM"));
        let (y, m) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = y.parse().map_err(|_| invalid())?;
        let month: u32 = m.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    /// First instant of the period (UTC midnight on the 1st).
    ///
    /// Past the last representable month this is the latest instant.
    pub fn start(&self) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// First instant after the period.
    pub fn end(&self) -> DateTime<Utc> {
        self.next().start()
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start() && instant < self.end()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl TryFrom<String> for Period {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Period> for String {
    fn from(value: Period) -> Self {
        value.to_string()
    }
}

/// A reviewer's mean aggregate score over one period.
///
/// Always recomputed from the submissions in the period, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackAggregate {
    pub tenant_id: Uuid,
    pub reviewer_id: Uuid,
    pub period: Period,
    pub average_score: f64,
    pub submission_count: u32,
}

/// One reviewer row of a calibration report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewerCalibration {
    pub reviewer_id: Uuid,
    pub avg: f64,
    /// Cross-reviewer standard deviation, identical on every row.
    pub sd: f64,
    pub n: u32,
}

/// How far a reviewer's average sits from the population mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewerBias {
    pub reviewer_id: Uuid,
    pub avg_diff_from_mean: f64,
}

/// Calibration statistics over all reviewers active in a period.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub reviewer_count: usize,
    pub mean: f64,
    pub variance: f64,
    pub sd: f64,
    /// `1 - sd/mean`; an approximation, not a rigorous ICC.
    pub icc_proxy: f64,
    pub per_reviewer: Vec<ReviewerCalibration>,
    pub bias_table: Vec<ReviewerBias>,
}

impl CalibrationReport {
    pub fn is_empty(&self) -> bool {
        self.reviewer_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_period_parse_and_display() {
        let p = Period::parse("2024-05").unwrap();
        assert_eq!(p.year(), 2024);
        assert_eq!(p.month(), 5);
        assert_eq!(p.to_string(), "2024-05");
        assert!(Period::parse("2024-13").is_err());
        assert!(Period::parse("May 2024").is_err());
    }

    #[test]
    fn test_period_bounds() {
        let dec = Period::new(2024, 12).unwrap();
        assert_eq!(dec.next(), Period::new(2025, 1).unwrap());
        assert_eq!(dec.start(), Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(dec.end(), Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        assert!(dec.contains(Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap()));
        assert!(!dec.contains(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_last_representable_month_is_rejected() {
        let last_year = NaiveDate::MAX.year();
        assert!(Period::new(last_year, 12).is_err());

        let nov = Period::new(last_year, 11).unwrap();
        assert!(nov.start() < nov.end());

        // Reachable only through `containing`; the window still runs forward.
        let dec = Period::containing(DateTime::<Utc>::MAX_UTC);
        assert!(dec.start() < dec.end());
    }

    #[test]
    fn test_period_serde_as_string() {
        let p = Period::new(2025, 2).unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"2025-02\"");
        let back: Period = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
