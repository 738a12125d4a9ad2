//! Video platform API trait definition

use crate::error::SourceResult;
use crate::model::{Channel, ListResponse, Playlist, PlaylistItem, SearchResult, Video};
use async_trait::async_trait;
use cf_core::{ChannelId, PlaylistId, VideoId};

/// Optional `channels` resource parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelPart {
    Snippet,
    Statistics,
    ContentDetails,
}

impl ChannelPart {
    /// Name used in the `part` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelPart::Snippet => "snippet",
            ChannelPart::Statistics => "statistics",
            ChannelPart::ContentDetails => "contentDetails",
        }
    }
}

impl std::fmt::Display for ChannelPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position within a paginated listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Requested page size
    pub max_results: u32,
    /// Cursor from the previous page; `None` for the first page
    pub page_token: Option<String>,
}

impl PageRequest {
    /// First page of size `max_results`
    pub fn first(max_results: u32) -> Self {
        Self {
            max_results,
            page_token: None,
        }
    }
}

/// Video platform abstraction for Channelflow
///
/// Each method issues exactly one request. Pagination and batching live in
/// [`crate::SourceReader`]. Implementations must be Send + Sync.
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Most recent uploads of a channel, newest first
    async fn search_recent_videos(
        &self,
        channel_id: &ChannelId,
        max_results: u32,
    ) -> SourceResult<ListResponse<SearchResult>>;

    /// Snippet, statistics and content details for at most 50 videos
    async fn list_videos(&self, ids: &[VideoId]) -> SourceResult<ListResponse<Video>>;

    /// Selected parts of a channel
    async fn list_channels(
        &self,
        channel_id: &ChannelId,
        parts: &[ChannelPart],
    ) -> SourceResult<ListResponse<Channel>>;

    /// One page of a channel's playlists
    async fn list_playlists_page(
        &self,
        channel_id: &ChannelId,
        page: &PageRequest,
    ) -> SourceResult<ListResponse<Playlist>>;

    /// One page of a playlist's items
    async fn list_playlist_items_page(
        &self,
        playlist_id: &PlaylistId,
        page: &PageRequest,
    ) -> SourceResult<ListResponse<PlaylistItem>>;

    /// Implementation identifier for logging
    fn platform_name(&self) -> &'static str;
}

#[async_trait]
impl<T: VideoPlatform + ?Sized> VideoPlatform for std::sync::Arc<T> {
    async fn search_recent_videos(
        &self,
        channel_id: &ChannelId,
        max_results: u32,
    ) -> SourceResult<ListResponse<SearchResult>> {
        (**self).search_recent_videos(channel_id, max_results).await
    }

    async fn list_videos(&self, ids: &[VideoId]) -> SourceResult<ListResponse<Video>> {
        (**self).list_videos(ids).await
    }

    async fn list_channels(
        &self,
        channel_id: &ChannelId,
        parts: &[ChannelPart],
    ) -> SourceResult<ListResponse<Channel>> {
        (**self).list_channels(channel_id, parts).await
    }

    async fn list_playlists_page(
        &self,
        channel_id: &ChannelId,
        page: &PageRequest,
    ) -> SourceResult<ListResponse<Playlist>> {
        (**self).list_playlists_page(channel_id, page).await
    }

    async fn list_playlist_items_page(
        &self,
        playlist_id: &PlaylistId,
        page: &PageRequest,
    ) -> SourceResult<ListResponse<PlaylistItem>> {
        (**self).list_playlist_items_page(playlist_id, page).await
    }

    fn platform_name(&self) -> &'static str {
        (**self).platform_name()
    }
}
