//! Target tables and their typed rows.
//!
//! One struct per warehouse table. Field order matches the column order of the
//! table spec next to it.

use crate::ids::{ChannelId, PlaylistId, VideoId};
use crate::table::{Column, ColumnType, TableKind, TableRow, TableSpec, Value};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use ColumnType::{BigInt, Date, Timestamp, Varchar};

impl From<ChannelId> for Value {
    fn from(v: ChannelId) -> Self {
        Value::Text(v.into_inner())
    }
}

impl From<VideoId> for Value {
    fn from(v: VideoId) -> Self {
        Value::Text(v.into_inner())
    }
}

impl From<PlaylistId> for Value {
    fn from(v: PlaylistId) -> Self {
        Value::Text(v.into_inner())
    }
}

/// Daily channel metrics, one row per run date
pub static CHANNELS_SNAPSHOT: TableSpec = TableSpec {
    name: "channels_snapshot",
    kind: TableKind::Snapshot,
    columns: &[
        Column::new("snapshot_date", Date),
        Column::new("channel_id", Varchar),
        Column::new("subscriber_count", BigInt),
        Column::new("view_count", BigInt),
        Column::new("video_count", BigInt),
        Column::new("extracted_at", Timestamp),
    ],
};

/// Current channel metadata
pub static CHANNELS_STATIC: TableSpec = TableSpec {
    name: "channels_static",
    kind: TableKind::Replaced,
    columns: &[
        Column::new("channel_id", Varchar),
        Column::new("channel_title", Varchar),
        Column::new("description", Varchar),
        Column::new("country", Varchar),
        Column::new("published_at", Timestamp),
        Column::new("thumbnail_url", Varchar),
        Column::new("channel_url", Varchar),
        Column::new("extracted_at", Timestamp),
    ],
};

/// Current metadata of every video on the channel
pub static VIDEOS_STATIC: TableSpec = TableSpec {
    name: "videos_static",
    kind: TableKind::Replaced,
    columns: &[
        Column::new("video_id", Varchar),
        Column::new("channel_id", Varchar),
        Column::new("title", Varchar),
        Column::new("description", Varchar),
        Column::new("category_id", Varchar),
        Column::new("published_at", Timestamp),
        Column::new("duration_seconds", BigInt),
        Column::new("thumbnail_url", Varchar),
        Column::new("video_url", Varchar),
        Column::new("extracted_at", Timestamp),
    ],
};

/// Weekly per-video metrics
pub static VIDEOS_SNAPSHOT: TableSpec = TableSpec {
    name: "videos_snapshot",
    kind: TableKind::Snapshot,
    columns: &[
        Column::new("snapshot_date", Date),
        Column::new("video_id", Varchar),
        Column::new("channel_id", Varchar),
        Column::new("published_at", Timestamp),
        Column::new("duration_seconds", BigInt),
        Column::new("view_count", BigInt),
        Column::new("like_count", BigInt),
        Column::new("comment_count", BigInt),
        Column::new("extracted_at", Timestamp),
    ],
};

/// The most recent uploads with their current metrics
pub static LATEST_VIDEOS_CURRENT: TableSpec = TableSpec {
    name: "latest_videos_current",
    kind: TableKind::Replaced,
    columns: &[
        Column::new("video_id", Varchar),
        Column::new("title", Varchar),
        Column::new("published_at", Timestamp),
        Column::new("thumbnail_url", Varchar),
        Column::new("video_url", Varchar),
        Column::new("view_count", BigInt),
        Column::new("like_count", BigInt),
        Column::new("comment_count", BigInt),
        Column::new("extracted_at", Timestamp),
    ],
};

/// Manually curated playlists (the uploads playlist is excluded)
pub static PLAYLISTS_MANUAL_STATIC: TableSpec = TableSpec {
    name: "playlists_manual_static",
    kind: TableKind::Replaced,
    columns: &[
        Column::new("playlist_id", Varchar),
        Column::new("channel_id", Varchar),
        Column::new("title", Varchar),
        Column::new("description", Varchar),
        Column::new("item_count", BigInt),
        Column::new("privacy_status", Varchar),
        Column::new("published_at", Timestamp),
        Column::new("thumbnail_url", Varchar),
        Column::new("playlist_url", Varchar),
        Column::new("extracted_at", Timestamp),
    ],
};

/// Current membership and ordering of every manual playlist
pub static PLAYLIST_ITEMS_MANUAL_STATIC: TableSpec = TableSpec {
    name: "playlist_items_manual_static",
    kind: TableKind::Replaced,
    columns: &[
        Column::new("playlist_id", Varchar),
        Column::new("video_id", Varchar),
        Column::new("position", BigInt),
        Column::new("added_at", Timestamp),
        Column::new("extracted_at", Timestamp),
    ],
};

/// Weekly copy of playlist membership
pub static PLAYLIST_ITEMS_SNAPSHOT: TableSpec = TableSpec {
    name: "playlist_items_snapshot",
    kind: TableKind::Snapshot,
    columns: &[
        Column::new("snapshot_date", Date),
        Column::new("playlist_id", Varchar),
        Column::new("video_id", Varchar),
        Column::new("position", BigInt),
        Column::new("added_at", Timestamp),
        Column::new("extracted_at", Timestamp),
    ],
};

/// Every table the pipeline writes
pub static ALL_TABLES: [&TableSpec; 8] = [
    &CHANNELS_SNAPSHOT,
    &CHANNELS_STATIC,
    &VIDEOS_STATIC,
    &VIDEOS_SNAPSHOT,
    &LATEST_VIDEOS_CURRENT,
    &PLAYLISTS_MANUAL_STATIC,
    &PLAYLIST_ITEMS_MANUAL_STATIC,
    &PLAYLIST_ITEMS_SNAPSHOT,
];

/// Row of `channels_snapshot`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSnapshotRow {
    pub snapshot_date: NaiveDate,
    pub channel_id: ChannelId,
    pub subscriber_count: i64,
    pub view_count: i64,
    pub video_count: i64,
    pub extracted_at: DateTime<Utc>,
}

impl TableRow for ChannelSnapshotRow {
    fn table() -> &'static TableSpec {
        &CHANNELS_SNAPSHOT
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.snapshot_date.into(),
            self.channel_id.clone().into(),
            self.subscriber_count.into(),
            self.view_count.into(),
            self.video_count.into(),
            self.extracted_at.into(),
        ]
    }
}

/// Row of `channels_static`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelStaticRow {
    pub channel_id: ChannelId,
    pub channel_title: Option<String>,
    pub description: Option<String>,
    pub country: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail_url: Option<String>,
    pub channel_url: String,
    pub extracted_at: DateTime<Utc>,
}

impl TableRow for ChannelStaticRow {
    fn table() -> &'static TableSpec {
        &CHANNELS_STATIC
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.channel_id.clone().into(),
            self.channel_title.clone().into(),
            self.description.clone().into(),
            self.country.clone().into(),
            self.published_at.into(),
            self.thumbnail_url.clone().into(),
            self.channel_url.clone().into(),
            self.extracted_at.into(),
        ]
    }
}

/// Row of `videos_static`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoStaticRow {
    pub video_id: VideoId,
    pub channel_id: Option<ChannelId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub duration_seconds: Option<i64>,
    pub thumbnail_url: Option<String>,
    pub video_url: String,
    pub extracted_at: DateTime<Utc>,
}

impl TableRow for VideoStaticRow {
    fn table() -> &'static TableSpec {
        &VIDEOS_STATIC
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.video_id.clone().into(),
            self.channel_id.clone().into(),
            self.title.clone().into(),
            self.description.clone().into(),
            self.category_id.clone().into(),
            self.published_at.into(),
            self.duration_seconds.into(),
            self.thumbnail_url.clone().into(),
            self.video_url.clone().into(),
            self.extracted_at.into(),
        ]
    }
}

/// Row of `videos_snapshot`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoSnapshotRow {
    pub snapshot_date: NaiveDate,
    pub video_id: VideoId,
    pub channel_id: Option<ChannelId>,
    pub published_at: Option<DateTime<Utc>>,
    pub duration_seconds: Option<i64>,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub extracted_at: DateTime<Utc>,
}

impl TableRow for VideoSnapshotRow {
    fn table() -> &'static TableSpec {
        &VIDEOS_SNAPSHOT
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.snapshot_date.into(),
            self.video_id.clone().into(),
            self.channel_id.clone().into(),
            self.published_at.into(),
            self.duration_seconds.into(),
            self.view_count.into(),
            self.like_count.into(),
            self.comment_count.into(),
            self.extracted_at.into(),
        ]
    }
}

/// Row of `latest_videos_current`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestVideoRow {
    pub video_id: VideoId,
    pub title: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail_url: Option<String>,
    pub video_url: String,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub extracted_at: DateTime<Utc>,
}

impl TableRow for LatestVideoRow {
    fn table() -> &'static TableSpec {
        &LATEST_VIDEOS_CURRENT
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.video_id.clone().into(),
            self.title.clone().into(),
            self.published_at.into(),
            self.thumbnail_url.clone().into(),
            self.video_url.clone().into(),
            self.view_count.into(),
            self.like_count.into(),
            self.comment_count.into(),
            self.extracted_at.into(),
        ]
    }
}

/// Row of `playlists_manual_static`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistStaticRow {
    pub playlist_id: PlaylistId,
    pub channel_id: Option<ChannelId>,
    pub title: Option<String>,
    pub description: String,
    pub item_count: i64,
    pub privacy_status: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail_url: Option<String>,
    pub playlist_url: String,
    pub extracted_at: DateTime<Utc>,
}

impl TableRow for PlaylistStaticRow {
    fn table() -> &'static TableSpec {
        &PLAYLISTS_MANUAL_STATIC
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.playlist_id.clone().into(),
            self.channel_id.clone().into(),
            self.title.clone().into(),
            self.description.clone().into(),
            self.item_count.into(),
            self.privacy_status.clone().into(),
            self.published_at.into(),
            self.thumbnail_url.clone().into(),
            self.playlist_url.clone().into(),
            self.extracted_at.into(),
        ]
    }
}

/// Row of `playlist_items_manual_static`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistItemStaticRow {
    pub playlist_id: PlaylistId,
    pub video_id: VideoId,
    pub position: Option<i64>,
    pub added_at: Option<DateTime<Utc>>,
    pub extracted_at: DateTime<Utc>,
}

impl TableRow for PlaylistItemStaticRow {
    fn table() -> &'static TableSpec {
        &PLAYLIST_ITEMS_MANUAL_STATIC
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.playlist_id.clone().into(),
            self.video_id.clone().into(),
            self.position.into(),
            self.added_at.into(),
            self.extracted_at.into(),
        ]
    }
}

/// Row of `playlist_items_snapshot`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistItemSnapshotRow {
    pub snapshot_date: NaiveDate,
    pub playlist_id: PlaylistId,
    pub video_id: VideoId,
    pub position: Option<i64>,
    pub added_at: Option<DateTime<Utc>>,
    pub extracted_at: DateTime<Utc>,
}

impl TableRow for PlaylistItemSnapshotRow {
    fn table() -> &'static TableSpec {
        &PLAYLIST_ITEMS_SNAPSHOT
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.snapshot_date.into(),
            self.playlist_id.clone().into(),
            self.video_id.clone().into(),
            self.position.into(),
            self.added_at.into(),
            self.extracted_at.into(),
        ]
    }
}

#[cfg(test)]
#[path = "rows_test.rs"]
mod tests;
