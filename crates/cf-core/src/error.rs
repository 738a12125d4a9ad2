//! Error types for cf-core

use thiserror::Error;

/// Core error type for Channelflow
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Required configuration value is missing or empty
    #[error("[E001] {key} not configured")]
    ConfigMissing { key: String },

    /// E002: Configuration value present but unusable
    #[error("[E002] Invalid config value for {key}: {message}")]
    ConfigInvalid { key: String, message: String },

    /// E003: Row width does not match the table's column list
    #[error("[E003] Row for table '{table}' has {found} values, expected {expected}")]
    RowShapeMismatch {
        table: String,
        expected: usize,
        found: usize,
    },

    /// E004: Value cannot be stored in its column
    #[error("[E004] Column '{table}.{column}' expects {expected}, got {value}")]
    ValueTypeMismatch {
        table: String,
        column: String,
        expected: &'static str,
        value: String,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
