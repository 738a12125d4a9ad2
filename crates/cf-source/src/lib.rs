//! cf-source - Video platform API boundary for Channelflow
//!
//! The [`VideoPlatform`] trait is the black-box surface of the public API:
//! one request per call. [`SourceReader`] layers the pagination and batching
//! policy on top of it, and [`YouTubeClient`] is the HTTP implementation.

pub mod api;
pub mod client;
pub mod error;
pub mod model;
pub mod paginate;
pub mod reader;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use api::{ChannelPart, PageRequest, VideoPlatform};
pub use client::YouTubeClient;
pub use error::{SourceError, SourceResult};
pub use paginate::{paginate, LATEST_VIDEOS_COUNT, MAX_IDS_PER_REQUEST, MAX_PAGE_SIZE};
pub use reader::{ChannelStats, SourceReader};
