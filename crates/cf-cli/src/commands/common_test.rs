use super::*;
use cf_core::SnapshotKey;
use cf_pipeline::StepReport;
use chrono::{TimeZone, Utc};
use std::io::Write as _;
use std::time::Duration;

#[test]
fn test_exit_code_displays_nothing() {
    let err: anyhow::Error = ExitCode(1).into();
    assert_eq!(err.to_string(), "");
    assert_eq!(err.downcast_ref::<ExitCode>().map(|c| c.0), Some(1));
}

#[test]
fn test_format_report_lists_steps_and_totals() {
    let now = Utc.with_ymd_and_hms(2024, 3, 20, 6, 0, 0).unwrap();
    let mut report = JobReport::new(JobKind::Weekly, SnapshotKey::weekly(now));
    report.steps.push(StepReport {
        table: "channels_static",
        rows_written: 1,
        write_mode: WriteMode::TruncateAndLoad,
    });
    report.steps.push(StepReport {
        table: "videos_snapshot",
        rows_written: 42,
        write_mode: WriteMode::ReplaceSnapshot,
    });
    report.elapsed = Duration::from_millis(1500);

    let text = format_report(&report);
    let lines: Vec<&str> = text.lines().collect();

    assert!(lines[0].starts_with("weekly job "));
    assert!(lines[0].ends_with("(2024-03-18 (weekly))"));
    assert_eq!(lines[1], "  channels_static       1 rows  replaced");
    assert_eq!(lines[2], "  videos_snapshot      42 rows  snapshot");
    assert_eq!(lines[3], "Wrote 43 rows to 2 tables in 1.50s");
}

#[test]
fn test_load_settings_from_env_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "WAREHOUSE_PROJECT=from_env_file").unwrap();
    writeln!(file, "YOUTUBE_API_KEY=file-key").unwrap();
    writeln!(file, "YOUTUBE_CHANNEL_ID=UCfile").unwrap();

    let global = GlobalArgs {
        verbose: false,
        env_file: Some(file.path().to_path_buf()),
    };
    let settings = load_settings(&global).unwrap();

    assert_eq!(settings.warehouse.project, "from_env_file");
}

#[test]
fn test_load_settings_missing_env_file() {
    let global = GlobalArgs {
        verbose: false,
        env_file: Some("/nonexistent/channelflow.env".into()),
    };
    let err = load_settings(&global).unwrap_err();
    assert!(err.to_string().contains("Failed to load env file"));
}
