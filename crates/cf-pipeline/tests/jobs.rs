//! End-to-end job runs against the fake platform and in-memory DuckDB.

use cf_core::{ChannelId, Settings};
use cf_db::{DuckDbBackend, Warehouse};
use cf_pipeline::{daily, JobKind, Pipeline, PipelineError, WriteMode};
use cf_source::testing::{self, Endpoint, FakePlatform};
use cf_source::{SourceError, SourceReader};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Arc;

const CHANNEL: &str = "UC_test";
const UPLOADS: &str = "UU_test";
const DATASET: &str = "channel_analytics";

type TestPipeline = Pipeline<Arc<FakePlatform>, Arc<DuckDbBackend>>;

/// Channel with `n` uploads, two manual playlists and the uploads playlist
fn platform(n: usize) -> FakePlatform {
    let ids: Vec<String> = (0..n).map(|i| format!("v{i:03}")).collect();
    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();

    let videos = ids
        .iter()
        .map(|id| testing::video(id, CHANNEL, "2024-03-01T10:00:00Z", 100, 10, 1))
        .collect();
    let uploads = ids
        .iter()
        .enumerate()
        .map(|(i, id)| testing::playlist_item(id, i as u64))
        .collect();

    FakePlatform::new()
        .with_channel(testing::channel(CHANNEL, "Test Channel", 250, 10_000, n as u64, UPLOADS))
        .with_recent(&refs)
        .with_videos(videos)
        .with_playlists(vec![
            testing::playlist("PL_a", CHANNEL, "Tutorials", 2),
            testing::playlist(UPLOADS, CHANNEL, "Uploads from Test Channel", n as u64),
            testing::playlist("PL_b", CHANNEL, "Live", 1),
        ])
        .with_playlist_items(UPLOADS, uploads)
        .with_playlist_items(
            "PL_a",
            vec![
                testing::playlist_item("v000", 0),
                testing::playlist_item("v001", 1),
            ],
        )
        .with_playlist_items("PL_b", vec![testing::playlist_item("v002", 0)])
}

fn warehouse() -> Arc<DuckDbBackend> {
    Arc::new(DuckDbBackend::in_memory(DATASET).unwrap())
}

fn pipeline(platform: &Arc<FakePlatform>, db: &Arc<DuckDbBackend>) -> TestPipeline {
    Pipeline::new(
        SourceReader::new(platform.clone(), ChannelId::new(CHANNEL)),
        db.clone(),
    )
}

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
}

/// Wednesday; its ISO week starts on 2024-03-18
fn wednesday() -> DateTime<Utc> {
    at(2024, 3, 20)
}

async fn count(db: &DuckDbBackend, table: &str) -> usize {
    db.query_count(&format!("SELECT * FROM {DATASET}.{table}"))
        .await
        .unwrap()
}

async fn column(db: &DuckDbBackend, sql: &str) -> Vec<String> {
    db.query_strings(sql)
        .await
        .unwrap()
        .into_iter()
        .map(|row| row.into_iter().next().flatten().unwrap_or_default())
        .collect()
}

#[tokio::test]
async fn test_daily_writes_snapshot_and_latest() {
    let platform = Arc::new(platform(7));
    let db = warehouse();

    let report = pipeline(&platform, &db)
        .run_daily_at(wednesday())
        .await
        .unwrap();

    assert_eq!(report.job, JobKind::Daily);
    let tables: Vec<&str> = report.steps.iter().map(|s| s.table).collect();
    assert_eq!(tables, vec!["channels_snapshot", "latest_videos_current"]);
    assert_eq!(report.steps[0].write_mode, WriteMode::ReplaceSnapshot);
    assert_eq!(report.steps[1].write_mode, WriteMode::TruncateAndLoad);

    assert_eq!(count(&db, "channels_snapshot").await, 1);
    assert_eq!(count(&db, "latest_videos_current").await, 5);
    assert_eq!(
        column(
            &db,
            "SELECT CAST(snapshot_date AS VARCHAR) FROM channel_analytics.channels_snapshot"
        )
        .await,
        vec!["2024-03-20"]
    );
    assert_eq!(
        column(
            &db,
            "SELECT CAST(subscriber_count AS VARCHAR) FROM channel_analytics.channels_snapshot"
        )
        .await,
        vec!["250"]
    );
}

#[tokio::test]
async fn test_daily_rerun_same_day_keeps_one_snapshot() {
    let platform = Arc::new(platform(3));
    let db = warehouse();
    let pipeline = pipeline(&platform, &db);

    pipeline.run_daily_at(wednesday()).await.unwrap();
    pipeline.run_daily_at(wednesday()).await.unwrap();
    assert_eq!(count(&db, "channels_snapshot").await, 1);
    assert_eq!(count(&db, "latest_videos_current").await, 3);

    pipeline.run_daily_at(at(2024, 3, 21)).await.unwrap();
    assert_eq!(count(&db, "channels_snapshot").await, 2);
}

#[tokio::test]
async fn test_daily_unknown_channel_aborts() {
    let platform = Arc::new(FakePlatform::new().with_recent(&["v1"]));
    let db = warehouse();

    let err = pipeline(&platform, &db)
        .run_daily_at(wednesday())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::ChannelNotFound { ref channel_id } if channel_id == CHANNEL));
    assert_eq!(platform.count(Endpoint::Search), 0);
}

#[tokio::test]
async fn test_weekly_writes_every_table_in_order() {
    let platform = Arc::new(platform(4));
    let db = warehouse();

    let report = pipeline(&platform, &db)
        .run_weekly_at(wednesday())
        .await
        .unwrap();

    let tables: Vec<&str> = report.steps.iter().map(|s| s.table).collect();
    assert_eq!(
        tables,
        vec![
            "channels_static",
            "videos_static",
            "playlists_manual_static",
            "playlist_items_manual_static",
            "playlist_items_snapshot",
            "videos_snapshot",
        ]
    );

    let expected: HashMap<&str, usize> = [
        ("channels_static", 1),
        ("videos_static", 4),
        ("playlists_manual_static", 2),
        ("playlist_items_manual_static", 3),
        ("playlist_items_snapshot", 3),
        ("videos_snapshot", 4),
    ]
    .into_iter()
    .collect();
    for (table, rows) in &expected {
        assert_eq!(report.rows_for(table), Some(*rows), "report for {table}");
        assert_eq!(count(&db, table).await, *rows, "rows in {table}");
    }
    assert_eq!(report.total_rows(), 17);
}

#[tokio::test]
async fn test_weekly_snapshots_share_the_monday_key() {
    let platform = Arc::new(platform(3));
    let db = warehouse();

    let report = pipeline(&platform, &db)
        .run_weekly_at(wednesday())
        .await
        .unwrap();
    assert_eq!(report.snapshot_key.date().to_string(), "2024-03-18");

    for table in ["videos_snapshot", "playlist_items_snapshot"] {
        let dates = column(
            &db,
            &format!("SELECT DISTINCT CAST(snapshot_date AS VARCHAR) FROM {DATASET}.{table}"),
        )
        .await;
        assert_eq!(dates, vec!["2024-03-18"], "{table}");
    }
}

#[tokio::test]
async fn test_weekly_rerun_same_week_is_idempotent() {
    let platform = Arc::new(platform(5));
    let db = warehouse();
    let pipeline = pipeline(&platform, &db);

    pipeline.run_weekly_at(at(2024, 3, 18)).await.unwrap();
    pipeline.run_weekly_at(at(2024, 3, 24)).await.unwrap();

    assert_eq!(count(&db, "videos_snapshot").await, 5);
    assert_eq!(count(&db, "playlist_items_snapshot").await, 3);
    assert_eq!(count(&db, "videos_static").await, 5);

    pipeline.run_weekly_at(at(2024, 3, 25)).await.unwrap();
    assert_eq!(count(&db, "videos_snapshot").await, 10);
    assert_eq!(count(&db, "playlist_items_snapshot").await, 6);
}

#[tokio::test]
async fn test_static_tables_drop_removed_entities() {
    let db = warehouse();

    let before = Arc::new(platform(4));
    pipeline(&before, &db)
        .run_weekly_at(wednesday())
        .await
        .unwrap();
    assert_eq!(count(&db, "videos_static").await, 4);

    let after = Arc::new(platform(3));
    pipeline(&after, &db)
        .run_weekly_at(at(2024, 3, 27))
        .await
        .unwrap();

    let ids = column(
        &db,
        "SELECT video_id FROM channel_analytics.videos_static ORDER BY video_id",
    )
    .await;
    assert_eq!(ids, vec!["v000", "v001", "v002"]);
}

#[tokio::test]
async fn test_uploads_playlist_is_excluded() {
    let platform = Arc::new(platform(3));
    let db = warehouse();

    pipeline(&platform, &db)
        .run_weekly_at(wednesday())
        .await
        .unwrap();

    let ids = column(
        &db,
        "SELECT playlist_id FROM channel_analytics.playlists_manual_static ORDER BY playlist_id",
    )
    .await;
    assert_eq!(ids, vec!["PL_a", "PL_b"]);

    let member_lists = column(
        &db,
        "SELECT DISTINCT playlist_id FROM channel_analytics.playlist_items_manual_static ORDER BY playlist_id",
    )
    .await;
    assert_eq!(member_lists, vec!["PL_a", "PL_b"]);
}

#[tokio::test]
async fn test_playlist_items_fetched_once_per_manual_playlist() {
    let platform = Arc::new(platform(3));
    let db = warehouse();

    pipeline(&platform, &db)
        .run_weekly_at(wednesday())
        .await
        .unwrap();

    let mut fetched: HashMap<String, usize> = HashMap::new();
    for call in platform.calls() {
        if let testing::Call::PlaylistItems { playlist_id, .. } = call {
            *fetched.entry(playlist_id).or_default() += 1;
        }
    }
    assert_eq!(fetched.get("PL_a"), Some(&1));
    assert_eq!(fetched.get("PL_b"), Some(&1));
    // videos_static and videos_snapshot each walk the uploads playlist
    assert_eq!(fetched.get(UPLOADS), Some(&2));
}

#[tokio::test]
async fn test_weekly_batches_video_lookups() {
    let platform = Arc::new(platform(120));
    let db = warehouse();

    pipeline(&platform, &db)
        .run_weekly_at(wednesday())
        .await
        .unwrap();

    // ceil(120 / 50) lookups for each of the two video steps
    assert_eq!(platform.count(Endpoint::Videos), 6);
    assert_eq!(count(&db, "videos_static").await, 120);
    assert_eq!(count(&db, "videos_snapshot").await, 120);
}

#[tokio::test]
async fn test_failing_step_aborts_remaining_steps() {
    let platform = Arc::new(platform(3).failing(Endpoint::Playlists));
    let db = warehouse();

    let err = pipeline(&platform, &db)
        .run_weekly_at(wednesday())
        .await
        .unwrap_err();

    match err {
        PipelineError::Source(ref source) => assert!(source.is_quota_exceeded()),
        other => panic!("unexpected error {other:?}"),
    }

    // steps before the failure completed, nothing after it ran
    assert_eq!(count(&db, "channels_static").await, 1);
    assert_eq!(count(&db, "videos_static").await, 3);
    for table in [
        &cf_core::rows::PLAYLISTS_MANUAL_STATIC,
        &cf_core::rows::PLAYLIST_ITEMS_SNAPSHOT,
        &cf_core::rows::VIDEOS_SNAPSHOT,
    ] {
        assert!(!db.relation_exists(table).await.unwrap(), "{}", table.name);
    }
    assert_eq!(platform.count(Endpoint::Playlists), 1);
}

#[tokio::test]
async fn test_channel_without_videos_is_fatal() {
    let platform = Arc::new(
        FakePlatform::new()
            .with_channel(testing::channel(CHANNEL, "Empty", 0, 0, 0, UPLOADS))
            .with_playlist_items(UPLOADS, Vec::new()),
    );
    let db = warehouse();

    let err = pipeline(&platform, &db)
        .run_weekly_at(wednesday())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::NoVideos { .. }));
    assert_eq!(count(&db, "channels_static").await, 1);
}

#[tokio::test]
async fn test_report_serializes() {
    let platform = Arc::new(platform(2));
    let db = warehouse();

    let report = pipeline(&platform, &db)
        .run_weekly_at(wednesday())
        .await
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["job"], "weekly");
    assert_eq!(json["snapshot_key"]["date"], "2024-03-18");
    assert_eq!(json["snapshot_key"]["period"], "weekly");
    assert_eq!(json["steps"][0]["table"], "channels_static");
    assert_eq!(json["steps"][0]["write_mode"], "truncate_and_load");
    assert!(json["run_id"].is_string());
}

#[tokio::test]
async fn test_entry_point_propagates_transport_errors() {
    let settings = Settings::from_lookup(|key| {
        match key {
            "YOUTUBE_API_KEY" => Some("k"),
            "YOUTUBE_CHANNEL_ID" => Some(CHANNEL),
            "YOUTUBE_API_BASE_URL" => Some("http://127.0.0.1:9/youtube/v3"),
            "YOUTUBE_HTTP_TIMEOUT_SECS" => Some("2"),
            "WAREHOUSE_PROJECT" => Some("test-project"),
            "WAREHOUSE_PATH" => Some(":memory:"),
            _ => None,
        }
        .map(str::to_string)
    })
    .unwrap();

    let err = daily(&settings, None).await.unwrap_err();
    assert!(matches!(err, PipelineError::Source(SourceError::Http(_))));
}
