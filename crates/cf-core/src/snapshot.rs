//! Snapshot period keys.
//!
//! Snapshot tables are append-only per period: every row carries a
//! `snapshot_date`, and a load for a given key first removes whatever rows
//! that key already has. Weekly tables are keyed by the Monday of the ISO
//! week containing the run; the daily channel snapshot is keyed by the UTC
//! calendar date of the run.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;

/// Granularity of a snapshot table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotPeriod {
    /// One row set per calendar day
    Daily,
    /// One row set per ISO week, stamped with its Monday
    Weekly,
}

impl fmt::Display for SnapshotPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotPeriod::Daily => write!(f, "daily"),
            SnapshotPeriod::Weekly => write!(f, "weekly"),
        }
    }
}

/// The value written to `snapshot_date` for one run.
///
/// Computed once per job and shared by every snapshot table that job writes,
/// so all tables agree even if the run straddles midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SnapshotKey {
    date: NaiveDate,
    period: SnapshotPeriod,
}

impl SnapshotKey {
    /// Daily key for the UTC date of `now`
    pub fn daily(now: DateTime<Utc>) -> Self {
        Self {
            date: now.date_naive(),
            period: SnapshotPeriod::Daily,
        }
    }

    /// Weekly key: the Monday of the ISO week containing `now`
    pub fn weekly(now: DateTime<Utc>) -> Self {
        Self {
            date: week_monday(now.date_naive()),
            period: SnapshotPeriod::Weekly,
        }
    }

    /// Calendar date stamped into `snapshot_date`
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Period granularity
    pub fn period(&self) -> SnapshotPeriod {
        self.period
    }
}

impl fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.date, self.period)
    }
}

/// Monday of the ISO week containing `date` (Monday itself maps to itself).
pub fn week_monday(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    // Subtracting at most six days cannot leave chrono's supported range
    // for any date produced from a real clock.
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod tests;
