//! Channel-scoped reads built on [`VideoPlatform`].
//!
//! The reader owns the pagination and batching policy: list endpoints are
//! walked to the end with pages of [`MAX_PAGE_SIZE`], and video lookups are
//! split into requests of at most [`MAX_IDS_PER_REQUEST`] ids.

use crate::api::{ChannelPart, VideoPlatform};
use crate::error::{SourceError, SourceResult};
use crate::model::{Channel, ChannelSnippet, Playlist, PlaylistItem, Video};
use crate::paginate::{paginate, MAX_IDS_PER_REQUEST, MAX_PAGE_SIZE};
use cf_core::{ChannelId, PlaylistId, VideoId};
use futures::TryStreamExt;
use log::{debug, warn};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Headline channel counters; missing counters read as zero
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelStats {
    pub channel_id: ChannelId,
    pub subscriber_count: u64,
    pub view_count: u64,
    pub video_count: u64,
}

/// Reads one channel's data through a [`VideoPlatform`]
pub struct SourceReader<P> {
    platform: P,
    channel_id: ChannelId,
}

impl<P: VideoPlatform> SourceReader<P> {
    /// Create a reader for `channel_id`
    pub fn new(platform: P, channel_id: ChannelId) -> Self {
        Self {
            platform,
            channel_id,
        }
    }

    /// Underlying platform
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Channel this reader is bound to
    pub fn channel_id(&self) -> &ChannelId {
        &self.channel_id
    }

    /// Ids of the `n` most recent uploads, newest first
    pub async fn recent_video_ids(&self, n: u32) -> SourceResult<Vec<VideoId>> {
        let response = self
            .platform
            .search_recent_videos(&self.channel_id, n.clamp(1, MAX_PAGE_SIZE))
            .await?;

        let ids: Vec<VideoId> = response
            .items
            .into_iter()
            .filter_map(|hit| hit.id.video_id)
            .filter_map(VideoId::try_new)
            .collect();

        debug!("Found {} recent videos on {}", ids.len(), self.channel_id);
        Ok(ids)
    }

    /// Full records for `ids`, in input order.
    ///
    /// Duplicate ids are looked up once. Ids the API does not return
    /// (deleted or private videos) are left out of the result.
    pub async fn video_details(&self, ids: &[VideoId]) -> SourceResult<Vec<Video>> {
        let mut seen = HashSet::new();
        let unique: Vec<VideoId> = ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect();

        let mut by_id: HashMap<VideoId, Video> = HashMap::with_capacity(unique.len());
        for chunk in unique.chunks(MAX_IDS_PER_REQUEST) {
            let response = self.platform.list_videos(chunk).await?;
            for video in response.items {
                by_id.insert(video.id.clone(), video);
            }
        }

        let videos: Vec<Video> = unique.iter().filter_map(|id| by_id.remove(id)).collect();
        if videos.len() < unique.len() {
            warn!(
                "{} of {} requested videos were not returned",
                unique.len() - videos.len(),
                unique.len()
            );
        }
        Ok(videos)
    }

    async fn channel(&self, parts: &[ChannelPart]) -> SourceResult<Option<Channel>> {
        let response = self.platform.list_channels(&self.channel_id, parts).await?;
        Ok(response.items.into_iter().next())
    }

    /// Subscriber, view and video counters; `None` when the channel is unknown
    pub async fn channel_statistics(&self) -> SourceResult<Option<ChannelStats>> {
        let Some(channel) = self.channel(&[ChannelPart::Statistics]).await? else {
            return Ok(None);
        };

        let stats = channel.statistics.unwrap_or_default();
        Ok(Some(ChannelStats {
            channel_id: channel.id,
            subscriber_count: stats.subscriber_count.unwrap_or(0),
            view_count: stats.view_count.unwrap_or(0),
            video_count: stats.video_count.unwrap_or(0),
        }))
    }

    /// Channel metadata; `None` when the channel is unknown
    pub async fn channel_snippet(&self) -> SourceResult<Option<ChannelSnippet>> {
        let channel = self.channel(&[ChannelPart::Snippet]).await?;
        Ok(channel.map(|c| c.snippet.unwrap_or_default()))
    }

    /// The auto-generated playlist listing every upload
    pub async fn uploads_playlist_id(&self) -> SourceResult<PlaylistId> {
        let uploads = self
            .channel(&[ChannelPart::ContentDetails])
            .await?
            .and_then(|c| c.content_details)
            .and_then(|d| d.related_playlists)
            .and_then(|r| r.uploads)
            .and_then(PlaylistId::try_new);

        uploads.ok_or_else(|| SourceError::NotFound {
            resource: "uploads playlist",
            id: self.channel_id.to_string(),
        })
    }

    /// Every video id on the channel, in uploads-playlist order
    pub async fn all_video_ids(&self) -> SourceResult<Vec<VideoId>> {
        let uploads = self.uploads_playlist_id().await?;
        let items = self.playlist_items(&uploads).await?;
        Ok(items
            .iter()
            .filter_map(PlaylistItem::video_id)
            .filter_map(VideoId::try_new)
            .collect())
    }

    /// Every playlist owned by the channel, uploads playlist included
    pub async fn all_playlists(&self) -> SourceResult<Vec<Playlist>> {
        let platform = &self.platform;
        let channel_id = &self.channel_id;

        let playlists: Vec<Playlist> = paginate(MAX_PAGE_SIZE, move |page| async move {
            platform.list_playlists_page(channel_id, &page).await
        })
        .try_concat()
        .await?;

        debug!("Found {} playlists on {}", playlists.len(), channel_id);
        Ok(playlists)
    }

    /// Every item of a playlist, in playlist order
    pub async fn playlist_items(&self, playlist_id: &PlaylistId) -> SourceResult<Vec<PlaylistItem>> {
        let platform = &self.platform;

        let items: Vec<PlaylistItem> = paginate(MAX_PAGE_SIZE, move |page| async move {
            platform.list_playlist_items_page(playlist_id, &page).await
        })
        .try_concat()
        .await?;

        debug!("Found {} items in playlist {}", items.len(), playlist_id);
        Ok(items)
    }
}

#[cfg(test)]
#[path = "reader_test.rs"]
mod tests;
