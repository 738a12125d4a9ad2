//! Job run reporting.

use cf_core::SnapshotKey;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Which job ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Daily,
    Weekly,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Daily => write!(f, "daily"),
            JobKind::Weekly => write!(f, "weekly"),
        }
    }
}

/// How a step wrote its rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Whole table replaced
    TruncateAndLoad,
    /// Rows for the snapshot key deleted, then the new rows appended
    ReplaceSnapshot,
}

/// Outcome of one table load
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub table: &'static str,
    pub rows_written: usize,
    pub write_mode: WriteMode,
}

/// Outcome of a completed job
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub job: JobKind,
    pub run_id: Uuid,
    pub snapshot_key: SnapshotKey,
    pub steps: Vec<StepReport>,
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

impl JobReport {
    /// Start an empty report
    pub fn new(job: JobKind, snapshot_key: SnapshotKey) -> Self {
        Self {
            job,
            run_id: Uuid::new_v4(),
            snapshot_key,
            steps: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Total rows written across all steps
    pub fn total_rows(&self) -> usize {
        self.steps.iter().map(|s| s.rows_written).sum()
    }

    /// Rows written to `table`, if the job loaded it
    pub fn rows_for(&self, table: &str) -> Option<usize> {
        self.steps
            .iter()
            .find(|s| s.table == table)
            .map(|s| s.rows_written)
    }
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}
