//! Error types for cf-pipeline

use cf_core::CoreError;
use cf_db::DbError;
use cf_source::SourceError;
use thiserror::Error;

/// Job errors. Every variant aborts the running job.
///
/// Wrapping variants name only their layer; render with `{:#}` through
/// `anyhow` to see the whole chain.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid configuration or a row that does not fit its table (P001)
    #[error("[P001] Core error")]
    Core(#[from] CoreError),

    /// Source API failure, propagated unchanged (P002)
    #[error("[P002] Source request failed")]
    Source(#[from] SourceError),

    /// Warehouse failure, propagated unchanged (P003)
    #[error("[P003] Warehouse operation failed")]
    Warehouse(#[from] DbError),

    /// The configured channel does not exist (P004)
    #[error("[P004] Channel not found: {channel_id}")]
    ChannelNotFound { channel_id: String },

    /// The channel has no uploads (P005)
    #[error("[P005] No videos found for channel {channel_id}")]
    NoVideos { channel_id: String },
}

/// Result type alias for PipelineError
pub type PipelineResult<T> = Result<T, PipelineError>;
