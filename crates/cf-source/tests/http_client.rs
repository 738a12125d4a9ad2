//! Exercise YouTubeClient against a local one-shot HTTP responder.

use cf_core::{ChannelId, PlaylistId, SourceConfig, VideoId};
use cf_source::{ChannelPart, PageRequest, SourceError, SourceReader, VideoPlatform, YouTubeClient};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve `responses` in order, one per connection, returning each request head
async fn serve(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let text = String::from_utf8_lossy(&buf).to_string();
            requests.push(text);

            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
        requests
    });

    (format!("http://{}/youtube/v3", addr), handle)
}

fn request_line(request: &str) -> &str {
    request.lines().next().unwrap_or_default()
}

fn client(base_url: String) -> YouTubeClient {
    YouTubeClient::new(&SourceConfig {
        api_key: "test-key".to_string(),
        channel_id: ChannelId::new("UC_test"),
        base_url,
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn test_list_videos_request_and_decode() {
    let (base, server) = serve(vec![(
        200,
        r#"{"items":[{"id":"v1","statistics":{"viewCount":"10"}}]}"#,
    )])
    .await;

    let response = client(base)
        .list_videos(&[VideoId::new("v1"), VideoId::new("v2")])
        .await
        .unwrap();
    assert_eq!(response.items.len(), 1);
    assert_eq!(response.items[0].statistics.as_ref().unwrap().view_count, Some(10));

    let requests = server.await.unwrap();
    let line = request_line(&requests[0]);
    assert!(line.starts_with("GET /youtube/v3/videos?"));
    assert!(line.contains("id=v1%2Cv2"));
    assert!(!line.contains("test-key"));
    assert!(requests[0]
        .to_ascii_lowercase()
        .contains("x-goog-api-key: test-key"));
}

#[tokio::test]
async fn test_reader_follows_page_tokens() {
    let (base, server) = serve(vec![
        (
            200,
            r#"{"nextPageToken":"TOKEN2","items":[{"contentDetails":{"videoId":"a"}}]}"#,
        ),
        (200, r#"{"items":[{"contentDetails":{"videoId":"b"}}]}"#),
    ])
    .await;

    let reader = SourceReader::new(client(base), ChannelId::new("UC_test"));
    let items = reader
        .playlist_items(&PlaylistId::new("UU_test"))
        .await
        .unwrap();
    assert_eq!(items.len(), 2);

    let requests = server.await.unwrap();
    assert!(!request_line(&requests[0]).contains("pageToken"));
    assert!(request_line(&requests[1]).contains("pageToken=TOKEN2"));
    assert!(request_line(&requests[1]).contains("maxResults=50"));
}

#[tokio::test]
async fn test_quota_error_surfaces() {
    let (base, server) = serve(vec![(
        403,
        r#"{"error":{"code":403,"message":"quota","errors":[{"reason":"quotaExceeded"}]}}"#,
    )])
    .await;

    let err = client(base)
        .list_playlists_page(&ChannelId::new("UC_test"), &PageRequest::first(50))
        .await
        .unwrap_err();
    assert!(err.is_quota_exceeded());
    server.await.unwrap();
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let (base, server) = serve(vec![(200, "not json")]).await;

    let err = client(base)
        .search_recent_videos(&ChannelId::new("UC_test"), 5)
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::Decode { .. }));
    server.await.unwrap();
}

#[tokio::test]
async fn test_transport_error_does_not_reveal_key() {
    let client = YouTubeClient::new(&SourceConfig {
        api_key: "SUPER-SECRET-KEY".to_string(),
        channel_id: ChannelId::new("UC_test"),
        base_url: "http://127.0.0.1:1".to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap();

    let err = client
        .list_channels(&ChannelId::new("UC_test"), &[ChannelPart::Statistics])
        .await
        .unwrap_err();

    assert!(matches!(err, SourceError::Http(_)));
    assert!(!err.to_string().contains("SUPER-SECRET-KEY"));
    assert!(!format!("{:?}", err).contains("SUPER-SECRET-KEY"));
}
