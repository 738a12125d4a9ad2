//! HTTP trigger surface for an external scheduler

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;
use cf_core::Settings;
use cf_pipeline::{JobKind, PipelineResult, TriggerRequest};
use log::{debug, info, warn};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::cli::{GlobalArgs, ServeArgs};
use crate::commands::common::{load_settings, log_failure};

/// Shared by every request
pub(crate) struct AppState {
    settings: Settings,
    /// Held for the whole of a job. Jobs share one warehouse file and must
    /// never overlap.
    jobs: Mutex<()>,
}

impl AppState {
    pub(crate) fn new(settings: Settings) -> Self {
        Self {
            settings,
            jobs: Mutex::new(()),
        }
    }

    /// Run `job` once no other job is running
    pub(crate) async fn exclusive<F, T>(&self, kind: JobKind, job: F) -> T
    where
        F: Future<Output = T>,
    {
        let _guard = match self.jobs.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                debug!("{} job waiting for the running job to finish", kind);
                self.jobs.lock().await
            }
        };
        job.await
    }
}

/// Execute the serve command
pub(crate) async fn execute(args: &ServeArgs, global: &GlobalArgs) -> Result<()> {
    // Fail at startup rather than on the first trigger.
    let settings = load_settings(global)?;

    let addr: SocketAddr = args.addr.parse().context("Invalid listen address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        "Serving jobs at http://{} for channel {}",
        addr, settings.source.channel_id
    );

    axum::serve(listener, router(Arc::new(AppState::new(settings))))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

pub(crate) fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/daily", get(trigger_daily).post(trigger_daily))
        .route("/weekly", get(trigger_weekly).post(trigger_weekly))
        .route("/healthz", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn trigger_daily(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    let request = trigger_request(&headers);
    let outcome = state
        .exclusive(
            JobKind::Daily,
            cf_pipeline::daily(&state.settings, Some(&request)),
        )
        .await;
    job_response(JobKind::Daily, outcome)
}

async fn trigger_weekly(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    let request = trigger_request(&headers);
    let outcome = state
        .exclusive(
            JobKind::Weekly,
            cf_pipeline::weekly(&state.settings, Some(&request)),
        )
        .await;
    job_response(JobKind::Weekly, outcome)
}

fn trigger_request(headers: &HeaderMap) -> TriggerRequest {
    TriggerRequest {
        origin: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    }
}

/// Map a job outcome to a response. Failures become 500 with the full
/// error chain as the body.
pub(crate) fn job_response(
    job: JobKind,
    outcome: PipelineResult<(String, u16)>,
) -> (StatusCode, String) {
    match outcome {
        Ok((message, status)) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::OK),
            message,
        ),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, log_failure(job, err)),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
#[path = "serve_test.rs"]
mod tests;
