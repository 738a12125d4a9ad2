//! cf-db - Warehouse abstraction layer for Channelflow
//!
//! This crate provides the `Warehouse` trait and its DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::Warehouse;
