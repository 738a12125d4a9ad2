//! In-memory [`VideoPlatform`] for tests.
//!
//! Fixtures are built from JSON shaped like real API responses. Every call is
//! recorded so tests can assert on request counts and parameters.

use crate::api::{ChannelPart, PageRequest, VideoPlatform};
use crate::error::{SourceError, SourceResult};
use crate::model::{Channel, ListResponse, Playlist, PlaylistItem, SearchResult, Video};
use crate::paginate::MAX_IDS_PER_REQUEST;
use async_trait::async_trait;
use cf_core::{ChannelId, PlaylistId, VideoId};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// API endpoint families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Search,
    Videos,
    Channels,
    Playlists,
    PlaylistItems,
}

/// A recorded request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Search {
        channel_id: String,
        max_results: u32,
    },
    Videos {
        ids: Vec<String>,
    },
    Channels {
        channel_id: String,
        parts: Vec<ChannelPart>,
    },
    Playlists {
        channel_id: String,
        page: PageRequest,
    },
    PlaylistItems {
        playlist_id: String,
        page: PageRequest,
    },
}

impl Call {
    /// Endpoint this call went to
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Call::Search { .. } => Endpoint::Search,
            Call::Videos { .. } => Endpoint::Videos,
            Call::Channels { .. } => Endpoint::Channels,
            Call::Playlists { .. } => Endpoint::Playlists,
            Call::PlaylistItems { .. } => Endpoint::PlaylistItems,
        }
    }
}

/// Fixture-backed platform
#[derive(Default)]
pub struct FakePlatform {
    channel: Option<Channel>,
    recent: Vec<VideoId>,
    videos: Vec<Video>,
    playlists: Vec<Playlist>,
    playlist_items: HashMap<PlaylistId, Vec<PlaylistItem>>,
    failing: HashSet<Endpoint>,
    calls: Mutex<Vec<Call>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `channel` from the `channels` endpoint
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Search results, newest first
    pub fn with_recent(mut self, ids: &[&str]) -> Self {
        self.recent = ids.iter().map(|id| VideoId::new(*id)).collect();
        self
    }

    /// Records served by the `videos` endpoint
    pub fn with_videos(mut self, videos: Vec<Video>) -> Self {
        self.videos = videos;
        self
    }

    /// Playlists owned by the channel
    pub fn with_playlists(mut self, playlists: Vec<Playlist>) -> Self {
        self.playlists = playlists;
        self
    }

    /// Items of one playlist
    pub fn with_playlist_items(mut self, playlist_id: &str, items: Vec<PlaylistItem>) -> Self {
        self.playlist_items.insert(PlaylistId::new(playlist_id), items);
        self
    }

    /// Answer every request to `endpoint` with a quota error
    pub fn failing(mut self, endpoint: Endpoint) -> Self {
        self.failing.insert(endpoint);
        self
    }

    /// Every call so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of calls made to `endpoint`
    pub fn count(&self, endpoint: Endpoint) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.endpoint() == endpoint)
            .count()
    }

    fn record(&self, call: Call) -> SourceResult<()> {
        let endpoint = call.endpoint();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if self.failing.contains(&endpoint) {
            return Err(SourceError::Api {
                resource: format!("{:?}", endpoint),
                status: 403,
                reason: "quotaExceeded".to_string(),
                message: "The request cannot be completed because you have exceeded your quota."
                    .to_string(),
            });
        }
        Ok(())
    }
}

/// Serve `page` of `items` using offset cursors `page-N`
fn page_of<T: Clone>(items: &[T], page: &PageRequest) -> ListResponse<T> {
    let start = page
        .page_token
        .as_deref()
        .and_then(|t| t.strip_prefix("page-"))
        .and_then(|n| n.parse::<usize>().ok())
        .unwrap_or(0)
        .min(items.len());
    let end = (start + page.max_results as usize).min(items.len());

    let chunk = items[start..end].to_vec();
    if end < items.len() {
        ListResponse::with_next(chunk, format!("page-{end}"))
    } else {
        ListResponse::last(chunk)
    }
}

#[async_trait]
impl VideoPlatform for FakePlatform {
    async fn search_recent_videos(
        &self,
        channel_id: &ChannelId,
        max_results: u32,
    ) -> SourceResult<ListResponse<SearchResult>> {
        self.record(Call::Search {
            channel_id: channel_id.to_string(),
            max_results,
        })?;

        let items = self
            .recent
            .iter()
            .take(max_results as usize)
            .map(|id| search_result(id.as_str()))
            .collect();
        Ok(ListResponse::last(items))
    }

    async fn list_videos(&self, ids: &[VideoId]) -> SourceResult<ListResponse<Video>> {
        self.record(Call::Videos {
            ids: ids.iter().map(|id| id.to_string()).collect(),
        })?;

        if ids.len() > MAX_IDS_PER_REQUEST {
            return Err(SourceError::Api {
                resource: "videos".to_string(),
                status: 400,
                reason: "invalidParameter".to_string(),
                message: "Too many ids".to_string(),
            });
        }

        // fixture order, not request order
        let items = self
            .videos
            .iter()
            .filter(|v| ids.contains(&v.id))
            .cloned()
            .collect();
        Ok(ListResponse::last(items))
    }

    async fn list_channels(
        &self,
        channel_id: &ChannelId,
        parts: &[ChannelPart],
    ) -> SourceResult<ListResponse<Channel>> {
        self.record(Call::Channels {
            channel_id: channel_id.to_string(),
            parts: parts.to_vec(),
        })?;

        let items = self
            .channel
            .iter()
            .filter(|c| c.id == *channel_id)
            .map(|c| {
                let mut c = c.clone();
                if !parts.contains(&ChannelPart::Snippet) {
                    c.snippet = None;
                }
                if !parts.contains(&ChannelPart::Statistics) {
                    c.statistics = None;
                }
                if !parts.contains(&ChannelPart::ContentDetails) {
                    c.content_details = None;
                }
                c
            })
            .collect();
        Ok(ListResponse::last(items))
    }

    async fn list_playlists_page(
        &self,
        channel_id: &ChannelId,
        page: &PageRequest,
    ) -> SourceResult<ListResponse<Playlist>> {
        self.record(Call::Playlists {
            channel_id: channel_id.to_string(),
            page: page.clone(),
        })?;
        Ok(page_of(&self.playlists, page))
    }

    async fn list_playlist_items_page(
        &self,
        playlist_id: &PlaylistId,
        page: &PageRequest,
    ) -> SourceResult<ListResponse<PlaylistItem>> {
        self.record(Call::PlaylistItems {
            playlist_id: playlist_id.to_string(),
            page: page.clone(),
        })?;

        match self.playlist_items.get(playlist_id) {
            Some(items) => Ok(page_of(items, page)),
            None => Err(SourceError::Api {
                resource: "playlistItems".to_string(),
                status: 404,
                reason: "playlistNotFound".to_string(),
                message: format!("Playlist {} not found", playlist_id),
            }),
        }
    }

    fn platform_name(&self) -> &'static str {
        "fake"
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
    serde_json::from_value(value).expect("fixture must match the API schema")
}

fn search_result(video_id: &str) -> SearchResult {
    decode(json!({ "id": { "kind": "youtube#video", "videoId": video_id } }))
}

/// Channel with statistics, snippet and an uploads playlist
pub fn channel(id: &str, title: &str, subscribers: u64, views: u64, videos: u64, uploads: &str) -> Channel {
    decode(json!({
        "id": id,
        "snippet": {
            "title": title,
            "description": format!("{title} channel"),
            "country": "US",
            "publishedAt": "2015-06-01T12:00:00Z",
            "thumbnails": { "high": { "url": format!("https://yt3.example.com/{id}/high.jpg") } }
        },
        "statistics": {
            "subscriberCount": subscribers.to_string(),
            "viewCount": views.to_string(),
            "videoCount": videos.to_string(),
            "hiddenSubscriberCount": false
        },
        "contentDetails": { "relatedPlaylists": { "uploads": uploads } }
    }))
}

/// Fully populated video
pub fn video(id: &str, channel_id: &str, published_at: &str, views: u64, likes: u64, comments: u64) -> Video {
    decode(json!({
        "id": id,
        "snippet": {
            "publishedAt": published_at,
            "channelId": channel_id,
            "title": format!("Video {id}"),
            "description": format!("About {id}"),
            "categoryId": "27",
            "thumbnails": { "high": { "url": format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg") } }
        },
        "statistics": {
            "viewCount": views.to_string(),
            "likeCount": likes.to_string(),
            "commentCount": comments.to_string()
        },
        "contentDetails": { "duration": "PT4M13S" }
    }))
}

/// Video with only an id
pub fn bare_video(id: &str) -> Video {
    decode(json!({ "id": id }))
}

/// Playlist with snippet, item count and status
pub fn playlist(id: &str, channel_id: &str, title: &str, item_count: u64) -> Playlist {
    decode(json!({
        "id": id,
        "snippet": {
            "channelId": channel_id,
            "title": title,
            "description": format!("{title} playlist"),
            "publishedAt": "2022-09-14T10:00:00Z",
            "thumbnails": { "high": { "url": format!("https://i.ytimg.com/pl/{id}/hq.jpg") } }
        },
        "contentDetails": { "itemCount": item_count },
        "status": { "privacyStatus": "public" }
    }))
}

/// Playlist with only an id
pub fn bare_playlist(id: &str) -> Playlist {
    decode(json!({ "id": id }))
}

/// Playlist item pointing at `video_id`
pub fn playlist_item(video_id: &str, position: u64) -> PlaylistItem {
    decode(json!({
        "snippet": { "position": position, "publishedAt": "2024-01-05T09:00:00Z" },
        "contentDetails": { "videoId": video_id }
    }))
}

/// Playlist item whose video is gone
pub fn orphan_playlist_item(position: u64) -> PlaylistItem {
    decode(json!({ "snippet": { "position": position, "title": "Deleted video" } }))
}
