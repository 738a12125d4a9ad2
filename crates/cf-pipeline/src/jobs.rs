//! Daily and weekly jobs.
//!
//! A job is a fixed, strictly sequential list of steps. The first failing
//! step aborts the job; nothing is retried and there is no partial-success
//! report.

use crate::error::PipelineResult;
use crate::report::{JobKind, JobReport};
use crate::steps;
use cf_core::{Settings, SnapshotKey};
use cf_db::{DuckDbBackend, Warehouse};
use cf_source::{SourceReader, VideoPlatform, YouTubeClient};
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::time::Instant;

/// Message returned by a successful daily run
pub const DAILY_SUCCESS_MESSAGE: &str = "Daily pipeline executed successfully.";

/// Message returned by a successful weekly run
pub const WEEKLY_SUCCESS_MESSAGE: &str = "Weekly pipeline executed successfully.";

/// Status code returned by a successful run
pub const SUCCESS_STATUS: u16 = 200;

/// Payload of the trigger that started a job. Jobs do not depend on it.
#[derive(Debug, Clone, Default)]
pub struct TriggerRequest {
    /// Free-form description of the caller, for logs
    pub origin: Option<String>,
}

/// A source reader and a warehouse, wired for one job invocation
pub struct Pipeline<P, W> {
    source: SourceReader<P>,
    warehouse: W,
}

impl<P, W> Pipeline<P, W>
where
    P: VideoPlatform,
    W: Warehouse,
{
    pub fn new(source: SourceReader<P>, warehouse: W) -> Self {
        Self { source, warehouse }
    }

    pub fn source(&self) -> &SourceReader<P> {
        &self.source
    }

    pub fn warehouse(&self) -> &W {
        &self.warehouse
    }

    /// Run the daily job now
    pub async fn run_daily(&self) -> PipelineResult<JobReport> {
        self.run_daily_at(Utc::now()).await
    }

    /// Run the daily job as if started at `now`
    pub async fn run_daily_at(&self, now: DateTime<Utc>) -> PipelineResult<JobReport> {
        let started = Instant::now();
        let key = SnapshotKey::daily(now);
        let mut report = JobReport::new(JobKind::Daily, key);
        self.log_started(&report);

        report
            .steps
            .push(steps::update_channels_snapshot(&self.source, &self.warehouse, key).await?);
        report
            .steps
            .push(steps::update_latest_videos_current(&self.source, &self.warehouse).await?);

        report.elapsed = started.elapsed();
        log_finished(&report);
        Ok(report)
    }

    /// Run the weekly job now
    pub async fn run_weekly(&self) -> PipelineResult<JobReport> {
        self.run_weekly_at(Utc::now()).await
    }

    /// Run the weekly job as if started at `now`.
    ///
    /// The Monday key is computed once here and shared by both snapshot
    /// tables.
    pub async fn run_weekly_at(&self, now: DateTime<Utc>) -> PipelineResult<JobReport> {
        let started = Instant::now();
        let key = SnapshotKey::weekly(now);
        let mut report = JobReport::new(JobKind::Weekly, key);
        self.log_started(&report);

        let source = &self.source;
        let warehouse = &self.warehouse;

        report
            .steps
            .push(steps::update_channels_static(source, warehouse).await?);
        report
            .steps
            .push(steps::update_videos_static(source, warehouse).await?);

        let playlists = steps::update_playlists_manual_static(source, warehouse).await?;
        report.steps.push(playlists.report);

        let items =
            steps::update_playlist_items_manual_static(source, warehouse, &playlists.rows).await?;
        report.steps.push(items.report);

        report
            .steps
            .push(steps::update_playlist_items_snapshot(warehouse, &items.rows, key).await?);
        report
            .steps
            .push(steps::update_videos_snapshot(source, warehouse, key).await?);

        report.elapsed = started.elapsed();
        log_finished(&report);
        Ok(report)
    }

    fn log_started(&self, report: &JobReport) {
        info!(
            "Starting {} job {} ({}): {} -> {} dataset {}",
            report.job,
            report.run_id,
            report.snapshot_key,
            self.source.platform().platform_name(),
            self.warehouse.db_type(),
            self.warehouse.dataset()
        );
    }

    /// Run `job` now
    pub async fn run(&self, job: JobKind) -> PipelineResult<JobReport> {
        match job {
            JobKind::Daily => self.run_daily().await,
            JobKind::Weekly => self.run_weekly().await,
        }
    }
}

fn log_finished(report: &JobReport) {
    info!(
        "Finished {} job {} in {:.2?}: {} rows across {} tables",
        report.job,
        report.run_id,
        report.elapsed,
        report.total_rows(),
        report.steps.len()
    );
}

/// Build fresh clients from `settings` and run `job` once
pub async fn run_job(job: JobKind, settings: &Settings) -> PipelineResult<JobReport> {
    let client = YouTubeClient::new(&settings.source)?;
    let warehouse = DuckDbBackend::open(&settings.warehouse)?;
    let source = SourceReader::new(client, settings.source.channel_id.clone());

    Pipeline::new(source, warehouse).run(job).await
}

/// Daily entry point
pub async fn daily(
    settings: &Settings,
    request: Option<&TriggerRequest>,
) -> PipelineResult<(String, u16)> {
    log_trigger(JobKind::Daily, request);
    run_job(JobKind::Daily, settings).await?;
    Ok((DAILY_SUCCESS_MESSAGE.to_string(), SUCCESS_STATUS))
}

/// Weekly entry point
pub async fn weekly(
    settings: &Settings,
    request: Option<&TriggerRequest>,
) -> PipelineResult<(String, u16)> {
    log_trigger(JobKind::Weekly, request);
    run_job(JobKind::Weekly, settings).await?;
    Ok((WEEKLY_SUCCESS_MESSAGE.to_string(), SUCCESS_STATUS))
}

fn log_trigger(job: JobKind, request: Option<&TriggerRequest>) {
    let origin = request
        .and_then(|r| r.origin.as_deref())
        .unwrap_or("direct call");
    debug!("{} job triggered by {}", job, origin);
}
