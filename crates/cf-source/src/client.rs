//! HTTP implementation of [`VideoPlatform`].

use crate::api::{ChannelPart, PageRequest, VideoPlatform};
use crate::error::{SourceError, SourceResult};
use crate::model::{Channel, ListResponse, Playlist, PlaylistItem, SearchResult, Video};
use async_trait::async_trait;
use cf_core::{ChannelId, PlaylistId, SourceConfig, VideoId};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;

const USER_AGENT: &str = concat!("channelflow/", env!("CARGO_PKG_VERSION"));

/// Carries the API key. The key must never appear in a request URL.
const API_KEY_HEADER: &str = "X-Goog-Api-Key";

type Query = Vec<(&'static str, String)>;

/// Client for the public video platform Data API
pub struct YouTubeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    /// Build a client from configuration
    pub fn new(config: &SourceConfig) -> SourceResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Issue one GET and decode the body
    async fn get<T: DeserializeOwned>(&self, resource: &str, query: Query) -> SourceResult<T> {
        let url = format!("{}/{}", self.base_url, resource);
        debug!("GET {} {:?}", url, query);

        let response = self
            .http
            .get(&url)
            .query(&query)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(resource, status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|source| SourceError::Decode {
            resource: resource.to_string(),
            source,
        })
    }
}

#[async_trait]
impl VideoPlatform for YouTubeClient {
    async fn search_recent_videos(
        &self,
        channel_id: &ChannelId,
        max_results: u32,
    ) -> SourceResult<ListResponse<SearchResult>> {
        self.get("search", search_query(channel_id, max_results))
            .await
    }

    async fn list_videos(&self, ids: &[VideoId]) -> SourceResult<ListResponse<Video>> {
        if ids.is_empty() {
            return Ok(ListResponse::last(Vec::new()));
        }
        self.get("videos", videos_query(ids)).await
    }

    async fn list_channels(
        &self,
        channel_id: &ChannelId,
        parts: &[ChannelPart],
    ) -> SourceResult<ListResponse<Channel>> {
        self.get("channels", channels_query(channel_id, parts)).await
    }

    async fn list_playlists_page(
        &self,
        channel_id: &ChannelId,
        page: &PageRequest,
    ) -> SourceResult<ListResponse<Playlist>> {
        self.get("playlists", playlists_query(channel_id, page)).await
    }

    async fn list_playlist_items_page(
        &self,
        playlist_id: &PlaylistId,
        page: &PageRequest,
    ) -> SourceResult<ListResponse<PlaylistItem>> {
        self.get("playlistItems", playlist_items_query(playlist_id, page))
            .await
    }

    fn platform_name(&self) -> &'static str {
        "youtube"
    }
}

fn search_query(channel_id: &ChannelId, max_results: u32) -> Query {
    vec![
        ("part", "snippet".to_string()),
        ("channelId", channel_id.to_string()),
        ("order", "date".to_string()),
        ("type", "video".to_string()),
        ("maxResults", max_results.to_string()),
    ]
}

fn videos_query(ids: &[VideoId]) -> Query {
    let joined = ids.iter().map(VideoId::as_str).collect::<Vec<_>>().join(",");
    vec![
        ("part", "snippet,statistics,contentDetails".to_string()),
        ("id", joined),
    ]
}

fn channels_query(channel_id: &ChannelId, parts: &[ChannelPart]) -> Query {
    let parts = parts
        .iter()
        .map(ChannelPart::as_str)
        .collect::<Vec<_>>()
        .join(",");
    vec![("part", parts), ("id", channel_id.to_string())]
}

fn paged(mut query: Query, page: &PageRequest) -> Query {
    query.push(("maxResults", page.max_results.to_string()));
    if let Some(token) = &page.page_token {
        query.push(("pageToken", token.clone()));
    }
    query
}

fn playlists_query(channel_id: &ChannelId, page: &PageRequest) -> Query {
    paged(
        vec![
            ("part", "snippet,contentDetails,status".to_string()),
            ("channelId", channel_id.to_string()),
        ],
        page,
    )
}

fn playlist_items_query(playlist_id: &PlaylistId, page: &PageRequest) -> Query {
    paged(
        vec![
            ("part", "snippet,contentDetails".to_string()),
            ("playlistId", playlist_id.to_string()),
        ],
        page,
    )
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    reason: String,
}

/// Map a non-success response to [`SourceError::Api`]
fn api_error(resource: &str, status: u16, body: &str) -> SourceError {
    let (reason, message) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => (
            envelope
                .error
                .errors
                .into_iter()
                .map(|e| e.reason)
                .find(|r| !r.is_empty())
                .unwrap_or_else(|| "unknown".to_string()),
            envelope.error.message,
        ),
        Err(_) => ("unknown".to_string(), body.chars().take(200).collect()),
    };

    SourceError::Api {
        resource: resource.to_string(),
        status,
        reason,
        message,
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
