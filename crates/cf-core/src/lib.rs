//! cf-core - Core library for Channelflow
//!
//! Shared configuration, error types, identifier newtypes, the warehouse
//! table catalog with its typed rows, and the snapshot key resolver.

pub mod config;
pub mod duration;
pub mod error;
pub mod ids;
mod newtype_string;
pub mod rows;
pub mod snapshot;
pub mod sql_utils;
pub mod table;

pub use config::{Settings, SourceConfig, WarehouseConfig};
pub use error::{CoreError, CoreResult};
pub use ids::{ChannelId, PlaylistId, VideoId};
pub use snapshot::{week_monday, SnapshotKey};
pub use table::{Column, ColumnType, RowSet, TableKind, TableRow, TableSpec, Value};
