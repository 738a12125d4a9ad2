//! Raw API records.
//!
//! Shapes follow the public JSON resources. Every nested part is optional so
//! a missing `snippet`, `statistics`, `contentDetails` or thumbnail size
//! deserializes to `None` instead of failing the whole page.

use cf_core::{ChannelId, PlaylistId, VideoId};
use serde::{Deserialize, Deserializer};

/// One page of a list endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    /// Records on this page
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,

    /// Continuation cursor; absent on the last page
    #[serde(default)]
    pub next_page_token: Option<String>,

    /// Result counts reported by the API
    #[serde(default)]
    pub page_info: Option<PageInfo>,
}

impl<T> ListResponse<T> {
    /// A final page holding `items`
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page_token: None,
            page_info: None,
        }
    }

    /// A page followed by another one
    pub fn with_next(items: Vec<T>, token: impl Into<String>) -> Self {
        Self {
            items,
            next_page_token: Some(token.into()),
            page_info: None,
        }
    }

    /// The continuation cursor, treating an empty token as absent
    pub fn next_token(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// `pageInfo` block
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default, deserialize_with = "de_count")]
    pub total_results: Option<u64>,
    #[serde(default, deserialize_with = "de_count")]
    pub results_per_page: Option<u64>,
}

/// A single thumbnail size
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnail {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Available thumbnail sizes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnails {
    #[serde(default)]
    pub default: Option<Thumbnail>,
    #[serde(default)]
    pub medium: Option<Thumbnail>,
    #[serde(default)]
    pub high: Option<Thumbnail>,
    #[serde(default)]
    pub standard: Option<Thumbnail>,
    #[serde(default)]
    pub maxres: Option<Thumbnail>,
}

impl Thumbnails {
    /// URL of the `high` size, the one stored in the warehouse
    pub fn high_url(&self) -> Option<&str> {
        self.high.as_ref().and_then(|t| t.url.as_deref())
    }
}

/// `search` result
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub id: SearchResultId,
}

/// Identity of a search hit
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultId {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub video_id: Option<String>,
}

/// `videos` resource
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: VideoId,
    #[serde(default)]
    pub snippet: Option<VideoSnippet>,
    #[serde(default)]
    pub statistics: Option<VideoStatistics>,
    #[serde(default)]
    pub content_details: Option<VideoContentDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnails: Option<Thumbnails>,
    #[serde(default)]
    pub channel_title: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[serde(default, deserialize_with = "de_count")]
    pub view_count: Option<u64>,
    #[serde(default, deserialize_with = "de_count")]
    pub like_count: Option<u64>,
    #[serde(default, deserialize_with = "de_count")]
    pub comment_count: Option<u64>,
    #[serde(default, deserialize_with = "de_count")]
    pub favorite_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoContentDetails {
    /// ISO 8601 duration, e.g. `PT4M13S`
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
}

/// `channels` resource
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: ChannelId,
    #[serde(default)]
    pub snippet: Option<ChannelSnippet>,
    #[serde(default)]
    pub statistics: Option<ChannelStatistics>,
    #[serde(default)]
    pub content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSnippet {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub custom_url: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    #[serde(default, deserialize_with = "de_count")]
    pub view_count: Option<u64>,
    #[serde(default, deserialize_with = "de_count")]
    pub subscriber_count: Option<u64>,
    #[serde(default, deserialize_with = "de_count")]
    pub video_count: Option<u64>,
    #[serde(default)]
    pub hidden_subscriber_count: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    #[serde(default)]
    pub related_playlists: Option<RelatedPlaylists>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelatedPlaylists {
    /// Auto-generated playlist holding every upload
    #[serde(default)]
    pub uploads: Option<String>,
    #[serde(default)]
    pub likes: Option<String>,
}

/// `playlists` resource
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: PlaylistId,
    #[serde(default)]
    pub snippet: Option<PlaylistSnippet>,
    #[serde(default)]
    pub content_details: Option<PlaylistContentDetails>,
    #[serde(default)]
    pub status: Option<PlaylistStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSnippet {
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistContentDetails {
    #[serde(default, deserialize_with = "de_count")]
    pub item_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistStatus {
    #[serde(default)]
    pub privacy_status: Option<String>,
}

/// `playlistItems` resource
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub snippet: Option<PlaylistItemSnippet>,
    #[serde(default)]
    pub content_details: Option<PlaylistItemContentDetails>,
}

impl PlaylistItem {
    /// Video the item points at
    pub fn video_id(&self) -> Option<&str> {
        self.content_details
            .as_ref()
            .and_then(|c| c.video_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    /// When the item was added to the playlist
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub playlist_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "de_count")]
    pub position: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemContentDetails {
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub video_published_at: Option<String>,
}

/// Counts arrive as decimal strings (`"12345"`); accept numbers too and turn
/// anything else into `None`.
fn de_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCount {
        Number(u64),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match Option::<RawCount>::deserialize(deserializer)? {
        Some(RawCount::Number(n)) => Some(n),
        Some(RawCount::Text(s)) => s.trim().parse().ok(),
        Some(RawCount::Other(_)) | None => None,
    })
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
