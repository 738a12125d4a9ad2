//! Table load steps.
//!
//! Each step extracts through the [`SourceReader`], transforms with the
//! functions in [`crate::transform`] and writes one table. Steps whose rows
//! feed a later step return them in a [`Loaded`].

use crate::error::{PipelineError, PipelineResult};
use crate::report::{StepReport, WriteMode};
use crate::transform;
use cf_core::rows::{PlaylistItemStaticRow, PlaylistStaticRow};
use cf_core::table::SNAPSHOT_DATE_COLUMN;
use cf_core::{RowSet, SnapshotKey, TableRow, Value};
use cf_db::Warehouse;
use cf_source::model::Video;
use cf_source::{SourceReader, VideoPlatform, LATEST_VIDEOS_COUNT};
use chrono::Utc;
use log::info;

/// Rows a step wrote, kept for the next step
#[derive(Debug, Clone)]
pub struct Loaded<R> {
    pub rows: Vec<R>,
    pub report: StepReport,
}

/// Overwrite the whole table with `rows`
async fn load_replaced<W, R>(warehouse: &W, rows: &[R]) -> PipelineResult<StepReport>
where
    W: Warehouse + ?Sized,
    R: TableRow,
{
    let set = RowSet::from_rows(rows)?;
    let written = warehouse.truncate_and_load(&set).await?;
    info!("Loaded {} rows into {}", written, set.table());
    Ok(StepReport {
        table: set.table().name,
        rows_written: written,
        write_mode: WriteMode::TruncateAndLoad,
    })
}

/// Replace the rows of `key` with `rows`
async fn load_snapshot<W, R>(warehouse: &W, key: SnapshotKey, rows: &[R]) -> PipelineResult<StepReport>
where
    W: Warehouse + ?Sized,
    R: TableRow,
{
    let set = RowSet::from_rows(rows)?;
    let written = warehouse
        .replace_partition(SNAPSHOT_DATE_COLUMN, &Value::Date(key.date()), &set)
        .await?;
    info!("Wrote {} rows to {} for {}", written, set.table(), key);
    Ok(StepReport {
        table: set.table().name,
        rows_written: written,
        write_mode: WriteMode::ReplaceSnapshot,
    })
}

/// Details of every video on the channel; an empty channel is an error
async fn all_videos<P: VideoPlatform>(source: &SourceReader<P>) -> PipelineResult<Vec<Video>> {
    let ids = source.all_video_ids().await?;
    if ids.is_empty() {
        return Err(PipelineError::NoVideos {
            channel_id: source.channel_id().to_string(),
        });
    }
    info!("Fetching details for {} videos", ids.len());
    Ok(source.video_details(&ids).await?)
}

/// Daily: append today's channel counters to `channels_snapshot`
pub async fn update_channels_snapshot<P, W>(
    source: &SourceReader<P>,
    warehouse: &W,
    key: SnapshotKey,
) -> PipelineResult<StepReport>
where
    P: VideoPlatform,
    W: Warehouse + ?Sized,
{
    info!("Updating channels_snapshot for {}", key);
    let stats = source
        .channel_statistics()
        .await?
        .ok_or_else(|| PipelineError::ChannelNotFound {
            channel_id: source.channel_id().to_string(),
        })?;

    let row = transform::channel_snapshot_row(&stats, key, Utc::now());
    load_snapshot(warehouse, key, &[row]).await
}

/// Daily: overwrite `latest_videos_current` with the newest uploads
pub async fn update_latest_videos_current<P, W>(
    source: &SourceReader<P>,
    warehouse: &W,
) -> PipelineResult<StepReport>
where
    P: VideoPlatform,
    W: Warehouse + ?Sized,
{
    info!("Updating latest_videos_current");
    let ids = source.recent_video_ids(LATEST_VIDEOS_COUNT).await?;
    let videos = source.video_details(&ids).await?;

    let rows = transform::latest_video_rows(&videos, Utc::now());
    load_replaced(warehouse, &rows).await
}

/// Weekly: overwrite `channels_static`
pub async fn update_channels_static<P, W>(
    source: &SourceReader<P>,
    warehouse: &W,
) -> PipelineResult<StepReport>
where
    P: VideoPlatform,
    W: Warehouse + ?Sized,
{
    info!("Updating channels_static");
    let snippet = source
        .channel_snippet()
        .await?
        .ok_or_else(|| PipelineError::ChannelNotFound {
            channel_id: source.channel_id().to_string(),
        })?;

    let row = transform::channel_static_row(source.channel_id(), &snippet, Utc::now());
    load_replaced(warehouse, &[row]).await
}

/// Weekly: overwrite `videos_static` with every video on the channel
pub async fn update_videos_static<P, W>(
    source: &SourceReader<P>,
    warehouse: &W,
) -> PipelineResult<StepReport>
where
    P: VideoPlatform,
    W: Warehouse + ?Sized,
{
    info!("Updating videos_static");
    let videos = all_videos(source).await?;

    let rows = transform::video_static_rows(&videos, Utc::now());
    load_replaced(warehouse, &rows).await
}

/// Weekly: overwrite `playlists_manual_static` and hand the rows on
pub async fn update_playlists_manual_static<P, W>(
    source: &SourceReader<P>,
    warehouse: &W,
) -> PipelineResult<Loaded<PlaylistStaticRow>>
where
    P: VideoPlatform,
    W: Warehouse + ?Sized,
{
    info!("Updating playlists_manual_static");
    let uploads = source.uploads_playlist_id().await?;
    let playlists = source.all_playlists().await?;

    let rows = transform::playlist_static_rows(&playlists, &uploads, Utc::now());
    let report = load_replaced(warehouse, &rows).await?;
    Ok(Loaded { rows, report })
}

/// Weekly: overwrite `playlist_items_manual_static` from the playlists just
/// loaded and hand the rows on
pub async fn update_playlist_items_manual_static<P, W>(
    source: &SourceReader<P>,
    warehouse: &W,
    playlists: &[PlaylistStaticRow],
) -> PipelineResult<Loaded<PlaylistItemStaticRow>>
where
    P: VideoPlatform,
    W: Warehouse + ?Sized,
{
    info!(
        "Updating playlist_items_manual_static for {} playlists",
        playlists.len()
    );
    let extracted_at = Utc::now();

    let mut rows = Vec::new();
    for playlist in playlists {
        let items = source.playlist_items(&playlist.playlist_id).await?;
        rows.extend(transform::playlist_item_rows(
            &playlist.playlist_id,
            &items,
            extracted_at,
        ));
    }

    let report = load_replaced(warehouse, &rows).await?;
    Ok(Loaded { rows, report })
}

/// Weekly: derive `playlist_items_snapshot` from this run's membership rows.
/// Takes no source, so nothing can be re-fetched.
pub async fn update_playlist_items_snapshot<W>(
    warehouse: &W,
    items: &[PlaylistItemStaticRow],
    key: SnapshotKey,
) -> PipelineResult<StepReport>
where
    W: Warehouse + ?Sized,
{
    info!("Updating playlist_items_snapshot for {}", key);
    let rows = transform::playlist_item_snapshot_rows(items, key);
    load_snapshot(warehouse, key, &rows).await
}

/// Weekly: append this week's per-video counters to `videos_snapshot`
pub async fn update_videos_snapshot<P, W>(
    source: &SourceReader<P>,
    warehouse: &W,
    key: SnapshotKey,
) -> PipelineResult<StepReport>
where
    P: VideoPlatform,
    W: Warehouse + ?Sized,
{
    info!("Updating videos_snapshot for {}", key);
    let videos = all_videos(source).await?;

    let rows = transform::video_snapshot_rows(&videos, key, Utc::now());
    load_snapshot(warehouse, key, &rows).await
}
