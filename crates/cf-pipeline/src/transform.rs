//! Entity transformers.
//!
//! One pure function per target table. Each takes raw source records plus the
//! `extracted_at` instant the calling step captured, and never fails: absent
//! nested fields become `NULL`, absent counts become 0 and unparsable
//! durations or timestamps become `NULL`.

use cf_core::duration::duration_seconds;
use cf_core::rows::{
    ChannelSnapshotRow, ChannelStaticRow, LatestVideoRow, PlaylistItemSnapshotRow,
    PlaylistItemStaticRow, PlaylistStaticRow, VideoSnapshotRow, VideoStaticRow,
};
use cf_core::{ChannelId, PlaylistId, SnapshotKey, VideoId};
use cf_source::model::{ChannelSnippet, Playlist, PlaylistItem, Thumbnails, Video};
use cf_source::ChannelStats;
use chrono::{DateTime, Utc};
use log::warn;

/// Parse an RFC 3339 timestamp and normalize it to UTC
pub fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|ts| ts.with_timezone(&Utc))
}

/// An absent count reads as zero
pub fn count(raw: Option<u64>) -> i64 {
    i64::try_from(raw.unwrap_or(0)).unwrap_or(i64::MAX)
}

fn high_thumbnail(thumbnails: Option<&Thumbnails>) -> Option<String> {
    thumbnails.and_then(Thumbnails::high_url).map(str::to_string)
}

/// `channels_snapshot` row for one run
pub fn channel_snapshot_row(
    stats: &ChannelStats,
    key: SnapshotKey,
    extracted_at: DateTime<Utc>,
) -> ChannelSnapshotRow {
    ChannelSnapshotRow {
        snapshot_date: key.date(),
        channel_id: stats.channel_id.clone(),
        subscriber_count: count(Some(stats.subscriber_count)),
        view_count: count(Some(stats.view_count)),
        video_count: count(Some(stats.video_count)),
        extracted_at,
    }
}

/// `channels_static` row
pub fn channel_static_row(
    channel_id: &ChannelId,
    snippet: &ChannelSnippet,
    extracted_at: DateTime<Utc>,
) -> ChannelStaticRow {
    ChannelStaticRow {
        channel_id: channel_id.clone(),
        channel_title: snippet.title.clone(),
        description: snippet.description.clone(),
        country: snippet.country.clone(),
        published_at: parse_timestamp(snippet.published_at.as_deref()),
        thumbnail_url: high_thumbnail(snippet.thumbnails.as_ref()),
        channel_url: channel_id.url(),
        extracted_at,
    }
}

/// `videos_static` rows, one per video
pub fn video_static_rows(videos: &[Video], extracted_at: DateTime<Utc>) -> Vec<VideoStaticRow> {
    videos
        .iter()
        .map(|video| {
            let snippet = video.snippet.clone().unwrap_or_default();
            VideoStaticRow {
                video_id: video.id.clone(),
                channel_id: snippet.channel_id.and_then(ChannelId::try_new),
                title: snippet.title,
                description: snippet.description,
                category_id: snippet.category_id,
                published_at: parse_timestamp(snippet.published_at.as_deref()),
                duration_seconds: video_duration(video),
                thumbnail_url: high_thumbnail(snippet.thumbnails.as_ref()),
                video_url: video.id.url(),
                extracted_at,
            }
        })
        .collect()
}

/// `videos_snapshot` rows stamped with `key`
pub fn video_snapshot_rows(
    videos: &[Video],
    key: SnapshotKey,
    extracted_at: DateTime<Utc>,
) -> Vec<VideoSnapshotRow> {
    videos
        .iter()
        .map(|video| {
            let snippet = video.snippet.as_ref();
            let stats = video.statistics.clone().unwrap_or_default();
            VideoSnapshotRow {
                snapshot_date: key.date(),
                video_id: video.id.clone(),
                channel_id: snippet
                    .and_then(|s| s.channel_id.clone())
                    .and_then(ChannelId::try_new),
                published_at: parse_timestamp(snippet.and_then(|s| s.published_at.as_deref())),
                duration_seconds: video_duration(video),
                view_count: count(stats.view_count),
                like_count: count(stats.like_count),
                comment_count: count(stats.comment_count),
                extracted_at,
            }
        })
        .collect()
}

/// `latest_videos_current` rows
pub fn latest_video_rows(videos: &[Video], extracted_at: DateTime<Utc>) -> Vec<LatestVideoRow> {
    videos
        .iter()
        .map(|video| {
            let snippet = video.snippet.clone().unwrap_or_default();
            let stats = video.statistics.clone().unwrap_or_default();
            LatestVideoRow {
                video_id: video.id.clone(),
                title: snippet.title,
                published_at: parse_timestamp(snippet.published_at.as_deref()),
                thumbnail_url: high_thumbnail(snippet.thumbnails.as_ref()),
                video_url: video.id.url(),
                view_count: count(stats.view_count),
                like_count: count(stats.like_count),
                comment_count: count(stats.comment_count),
                extracted_at,
            }
        })
        .collect()
}

/// `playlists_manual_static` rows, leaving out the channel's uploads playlist
pub fn playlist_static_rows(
    playlists: &[Playlist],
    uploads_playlist_id: &PlaylistId,
    extracted_at: DateTime<Utc>,
) -> Vec<PlaylistStaticRow> {
    playlists
        .iter()
        .filter(|p| p.id != *uploads_playlist_id)
        .map(|playlist| {
            let snippet = playlist.snippet.clone().unwrap_or_default();
            PlaylistStaticRow {
                playlist_id: playlist.id.clone(),
                channel_id: snippet.channel_id.and_then(ChannelId::try_new),
                title: snippet.title,
                description: snippet.description.unwrap_or_default(),
                item_count: count(
                    playlist
                        .content_details
                        .as_ref()
                        .and_then(|d| d.item_count),
                ),
                privacy_status: playlist
                    .status
                    .as_ref()
                    .and_then(|s| s.privacy_status.clone()),
                published_at: parse_timestamp(snippet.published_at.as_deref()),
                thumbnail_url: high_thumbnail(snippet.thumbnails.as_ref()),
                playlist_url: playlist.id.url(),
                extracted_at,
            }
        })
        .collect()
}

/// `playlist_items_manual_static` rows for one playlist.
///
/// Items that no longer point at a video are skipped.
pub fn playlist_item_rows(
    playlist_id: &PlaylistId,
    items: &[PlaylistItem],
    extracted_at: DateTime<Utc>,
) -> Vec<PlaylistItemStaticRow> {
    items
        .iter()
        .filter_map(|item| {
            let Some(video_id) = item.video_id().and_then(VideoId::try_new) else {
                warn!("Skipping item without video in playlist {}", playlist_id);
                return None;
            };
            let snippet = item.snippet.as_ref();
            Some(PlaylistItemStaticRow {
                playlist_id: playlist_id.clone(),
                video_id,
                position: snippet
                    .and_then(|s| s.position)
                    .and_then(|p| i64::try_from(p).ok()),
                added_at: parse_timestamp(snippet.and_then(|s| s.published_at.as_deref())),
                extracted_at,
            })
        })
        .collect()
}

/// `playlist_items_snapshot` rows: the static rows of the same run stamped
/// with `key`. Nothing is fetched.
pub fn playlist_item_snapshot_rows(
    static_rows: &[PlaylistItemStaticRow],
    key: SnapshotKey,
) -> Vec<PlaylistItemSnapshotRow> {
    static_rows
        .iter()
        .map(|row| PlaylistItemSnapshotRow {
            snapshot_date: key.date(),
            playlist_id: row.playlist_id.clone(),
            video_id: row.video_id.clone(),
            position: row.position,
            added_at: row.added_at,
            extracted_at: row.extracted_at,
        })
        .collect()
}

fn video_duration(video: &Video) -> Option<i64> {
    duration_seconds(
        video
            .content_details
            .as_ref()
            .and_then(|c| c.duration.as_deref()),
    )
}

#[cfg(test)]
#[path = "transform_test.rs"]
mod tests;
