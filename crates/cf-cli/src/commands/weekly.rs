//! Weekly command implementation

use anyhow::Result;
use cf_pipeline::JobKind;

use crate::cli::{GlobalArgs, JobArgs};
use crate::commands::common::execute_job;

/// Execute the weekly command
pub(crate) async fn execute(args: &JobArgs, global: &GlobalArgs) -> Result<()> {
    execute_job(JobKind::Weekly, args, global).await
}
