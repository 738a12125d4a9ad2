//! Runtime configuration resolved from environment variables.
//!
//! Every deployment targets exactly one channel and one warehouse dataset.
//! Required values are validated up front so that a misconfigured job fails
//! before any client is built or any request is sent.

use crate::error::{CoreError, CoreResult};
use crate::ids::ChannelId;
use std::path::PathBuf;
use std::time::Duration;

/// Source API key
pub const ENV_API_KEY: &str = "YOUTUBE_API_KEY";
/// Channel the deployment ingests
pub const ENV_CHANNEL_ID: &str = "YOUTUBE_CHANNEL_ID";
/// Override for the source API root (used by tests and proxies)
pub const ENV_API_BASE_URL: &str = "YOUTUBE_API_BASE_URL";
/// Per-request HTTP timeout in seconds
pub const ENV_HTTP_TIMEOUT_SECS: &str = "YOUTUBE_HTTP_TIMEOUT_SECS";
/// Warehouse project identifier
pub const ENV_WAREHOUSE_PROJECT: &str = "WAREHOUSE_PROJECT";
/// Warehouse dataset (schema) holding every table
pub const ENV_WAREHOUSE_DATASET: &str = "WAREHOUSE_DATASET";
/// DuckDB database file
pub const ENV_WAREHOUSE_PATH: &str = "WAREHOUSE_PATH";

/// Default source API root
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
/// Default dataset name
pub const DEFAULT_DATASET: &str = "channel_analytics";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Complete settings for one job invocation
#[derive(Debug, Clone)]
pub struct Settings {
    /// Source API client settings
    pub source: SourceConfig,

    /// Warehouse client settings
    pub warehouse: WarehouseConfig,
}

/// Settings for the video platform API client
#[derive(Clone)]
pub struct SourceConfig {
    /// API key sent with every request
    pub api_key: String,

    /// Channel whose data is ingested
    pub channel_id: ChannelId,

    /// API root, without trailing slash
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,
}

// The API key must never reach logs.
impl std::fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceConfig")
            .field("api_key", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Settings for the warehouse client
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    /// Warehouse project identifier
    pub project: String,

    /// Dataset (schema) every table is written to
    pub dataset: String,

    /// DuckDB database location (`:memory:` for an in-memory database)
    pub path: PathBuf,
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            source: SourceConfig::from_lookup(&lookup)?,
            warehouse: WarehouseConfig::from_lookup(&lookup)?,
        })
    }
}

impl SourceConfig {
    /// Resolve the source section, failing on the first missing value.
    pub fn from_lookup<F>(lookup: &F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = required(lookup, ENV_API_KEY)?;
        let channel_id = ChannelId::new(required(lookup, ENV_CHANNEL_ID)?);

        let base_url = optional(lookup, ENV_API_BASE_URL)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = match optional(lookup, ENV_HTTP_TIMEOUT_SECS) {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| CoreError::ConfigInvalid {
                    key: ENV_HTTP_TIMEOUT_SECS.to_string(),
                    message: format!("expected a positive number of seconds, got '{raw}'"),
                })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            channel_id,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl WarehouseConfig {
    /// Resolve the warehouse section.
    pub fn from_lookup<F>(lookup: &F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let project = required(lookup, ENV_WAREHOUSE_PROJECT)?;
        let dataset =
            optional(lookup, ENV_WAREHOUSE_DATASET).unwrap_or_else(|| DEFAULT_DATASET.to_string());

        if !dataset
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(CoreError::ConfigInvalid {
                key: ENV_WAREHOUSE_DATASET.to_string(),
                message: format!("'{dataset}' must contain only letters, digits and underscores"),
            });
        }

        let path = optional(lookup, ENV_WAREHOUSE_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(format!("{project}.duckdb")));

        Ok(Self {
            project,
            dataset,
            path,
        })
    }

    /// Whether the warehouse lives only in memory
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == ":memory:"
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, key: &str) -> CoreResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or_else(|| CoreError::ConfigMissing {
        key: key.to_string(),
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
