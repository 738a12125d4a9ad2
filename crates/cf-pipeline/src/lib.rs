//! cf-pipeline - Extract, transform and load steps for Channelflow
//!
//! [`transform`] holds the pure record-to-row mappings, [`steps`] the
//! individual table loads, and [`jobs`] composes them into the daily and
//! weekly jobs.

pub mod error;
pub mod jobs;
pub mod report;
pub mod steps;
pub mod transform;

pub use error::{PipelineError, PipelineResult};
pub use jobs::{
    daily, run_job, weekly, Pipeline, TriggerRequest, DAILY_SUCCESS_MESSAGE, SUCCESS_STATUS,
    WEEKLY_SUCCESS_MESSAGE,
};
pub use report::{JobKind, JobReport, StepReport, WriteMode};
pub use steps::Loaded;
