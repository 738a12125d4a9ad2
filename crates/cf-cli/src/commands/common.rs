//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use cf_core::Settings;
use cf_pipeline::{run_job, JobKind, JobReport, PipelineError, WriteMode};
use log::{error, warn};
use std::fmt::Write as _;

use crate::cli::{GlobalArgs, JobArgs};

/// Structured exit code error for propagating exit codes through anyhow.
///
/// The job failure has already been logged; main exits with the code and
/// prints nothing more.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load `.env` (or `--env-file`) and resolve settings from the environment
pub(crate) fn load_settings(global: &GlobalArgs) -> Result<Settings> {
    match &global.env_file {
        Some(path) => {
            dotenv::from_path(path)
                .with_context(|| format!("Failed to load env file: {}", path.display()))?;
        }
        None => {
            // A missing ./.env is normal in deployed environments.
            let _ = dotenv::dotenv();
        }
    }

    Settings::from_env().context("Failed to resolve configuration from environment")
}

/// Run `job` once and print its report. Exit code 1 on failure.
pub(crate) async fn execute_job(job: JobKind, args: &JobArgs, global: &GlobalArgs) -> Result<()> {
    let settings = load_settings(global)?;

    match run_job(job, &settings).await {
        Ok(report) => {
            if args.json {
                let json = serde_json::to_string_pretty(&report)
                    .context("Failed to serialize job report")?;
                println!("{}", json);
            } else {
                print!("{}", format_report(&report));
            }
            Ok(())
        }
        Err(err) => {
            log_failure(job, err);
            Err(ExitCode(1).into())
        }
    }
}

/// Log a failed job and return its rendered error chain
pub(crate) fn log_failure(job: JobKind, err: PipelineError) -> String {
    if let PipelineError::Source(source) = &err {
        if source.is_quota_exceeded() {
            warn!("API quota exhausted; the {} job cannot run until it resets", job);
        }
    }
    let chain = format!("{:#}", anyhow::Error::from(err));
    error!("{} job failed: {}", job, chain);
    chain
}

/// Human readable job summary
pub(crate) fn format_report(report: &JobReport) -> String {
    let width = report
        .steps
        .iter()
        .map(|s| s.table.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} job {} ({})",
        report.job, report.run_id, report.snapshot_key
    );
    for step in &report.steps {
        let _ = writeln!(
            out,
            "  {:<width$}  {:>6} rows  {}",
            step.table,
            step.rows_written,
            write_mode_label(step.write_mode),
            width = width
        );
    }
    let _ = writeln!(
        out,
        "Wrote {} rows to {} tables in {:.2}s",
        report.total_rows(),
        report.steps.len(),
        report.elapsed.as_secs_f64()
    );
    out
}

fn write_mode_label(mode: WriteMode) -> &'static str {
    match mode {
        WriteMode::TruncateAndLoad => "replaced",
        WriteMode::ReplaceSnapshot => "snapshot",
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
