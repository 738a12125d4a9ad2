use super::*;
use std::time::Duration;

fn value<'a>(query: &'a Query, key: &str) -> Option<&'a str> {
    query
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.as_str())
}

#[test]
fn test_search_query() {
    let q = search_query(&ChannelId::new("UC1"), 5);
    assert_eq!(value(&q, "part"), Some("snippet"));
    assert_eq!(value(&q, "channelId"), Some("UC1"));
    assert_eq!(value(&q, "order"), Some("date"));
    assert_eq!(value(&q, "type"), Some("video"));
    assert_eq!(value(&q, "maxResults"), Some("5"));
}

#[test]
fn test_videos_query_joins_ids() {
    let ids = vec![VideoId::new("a"), VideoId::new("b"), VideoId::new("c")];
    let q = videos_query(&ids);
    assert_eq!(value(&q, "id"), Some("a,b,c"));
    assert_eq!(value(&q, "part"), Some("snippet,statistics,contentDetails"));
}

#[test]
fn test_channels_query_parts() {
    let q = channels_query(
        &ChannelId::new("UC1"),
        &[ChannelPart::Snippet, ChannelPart::ContentDetails],
    );
    assert_eq!(value(&q, "part"), Some("snippet,contentDetails"));
    assert_eq!(value(&q, "id"), Some("UC1"));
}

#[test]
fn test_paged_queries() {
    let first = playlists_query(&ChannelId::new("UC1"), &PageRequest::first(50));
    assert_eq!(value(&first, "maxResults"), Some("50"));
    assert_eq!(value(&first, "pageToken"), None);
    assert_eq!(value(&first, "part"), Some("snippet,contentDetails,status"));

    let next = playlist_items_query(
        &PlaylistId::new("PL1"),
        &PageRequest {
            max_results: 50,
            page_token: Some("CDIQAA".to_string()),
        },
    );
    assert_eq!(value(&next, "playlistId"), Some("PL1"));
    assert_eq!(value(&next, "pageToken"), Some("CDIQAA"));
}

#[test]
fn test_query_never_contains_key() {
    let q = search_query(&ChannelId::new("UC1"), 5);
    assert!(value(&q, "key").is_none());
}

#[test]
fn test_api_error_from_google_envelope() {
    let body = r#"{
        "error": {
            "code": 403,
            "message": "The request cannot be completed because you have exceeded your quota.",
            "errors": [{ "message": "quota", "domain": "youtube.quota", "reason": "quotaExceeded" }]
        }
    }"#;

    let err = api_error("search", 403, body);
    assert!(err.is_quota_exceeded());
    assert!(matches!(err, SourceError::Api { status: 403, .. }));
    assert!(err.to_string().starts_with("[S002] search request returned HTTP 403 (quotaExceeded)"));
}

#[test]
fn test_api_error_from_plain_body() {
    let err = api_error("videos", 502, "Bad Gateway");
    match err {
        SourceError::Api {
            status,
            reason,
            message,
            ..
        } => {
            assert_eq!(status, 502);
            assert_eq!(reason, "unknown");
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_client_creation() {
    let config = SourceConfig {
        api_key: "k".to_string(),
        channel_id: ChannelId::new("UC1"),
        base_url: "http://127.0.0.1:9/youtube/v3/".to_string(),
        timeout: Duration::from_secs(1),
    };
    let client = YouTubeClient::new(&config).unwrap();
    assert_eq!(client.base_url, "http://127.0.0.1:9/youtube/v3");
    assert_eq!(client.platform_name(), "youtube");
}
