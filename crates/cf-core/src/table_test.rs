use super::*;
use crate::rows::{PlaylistItemStaticRow, PLAYLIST_ITEMS_MANUAL_STATIC};
use crate::{PlaylistId, VideoId};
use chrono::TimeZone;

#[test]
fn test_column_type_sql_names() {
    assert_eq!(ColumnType::Varchar.as_sql(), "VARCHAR");
    assert_eq!(ColumnType::BigInt.as_sql(), "BIGINT");
    assert_eq!(ColumnType::Date.as_sql(), "DATE");
    assert_eq!(ColumnType::Timestamp.to_string(), "TIMESTAMP");
}

#[test]
fn test_value_from_option() {
    assert_eq!(Value::from(None::<i64>), Value::Null);
    assert_eq!(Value::from(Some(7i64)), Value::Int(7));
    assert_eq!(Value::from(Some("x")), Value::Text("x".to_string()));
}

#[test]
fn test_value_fits() {
    assert!(Value::Null.fits(ColumnType::Date));
    assert!(Value::Int(1).fits(ColumnType::BigInt));
    assert!(!Value::Int(1).fits(ColumnType::Varchar));
    assert!(!Value::Text("2024-01-01".into()).fits(ColumnType::Date));
}

#[test]
fn test_row_set_from_typed_rows() {
    let extracted_at = Utc.with_ymd_and_hms(2024, 3, 20, 8, 0, 0).unwrap();
    let rows = vec![PlaylistItemStaticRow {
        playlist_id: PlaylistId::new("PL1"),
        video_id: VideoId::new("v1"),
        position: Some(0),
        added_at: None,
        extracted_at,
    }];

    let set = RowSet::from_rows(&rows).unwrap();
    assert_eq!(set.table().name, "playlist_items_manual_static");
    assert_eq!(set.len(), 1);
    assert_eq!(
        set.rows()[0],
        vec![
            Value::Text("PL1".into()),
            Value::Text("v1".into()),
            Value::Int(0),
            Value::Null,
            Value::Timestamp(extracted_at),
        ]
    );
}

#[test]
fn test_push_rejects_wrong_width() {
    let mut set = RowSet::empty(&PLAYLIST_ITEMS_MANUAL_STATIC);
    let err = set.push(vec![Value::Null]).unwrap_err();
    assert!(matches!(
        err,
        CoreError::RowShapeMismatch {
            expected: 5,
            found: 1,
            ..
        }
    ));
    assert!(set.is_empty());
}

#[test]
fn test_push_rejects_wrong_type() {
    let mut set = RowSet::empty(&PLAYLIST_ITEMS_MANUAL_STATIC);
    let err = set
        .push(vec![
            Value::Text("PL1".into()),
            Value::Text("v1".into()),
            Value::Text("zero".into()),
            Value::Null,
            Value::Null,
        ])
        .unwrap_err();
    assert!(matches!(err, CoreError::ValueTypeMismatch { ref column, .. } if column == "position"));
}

#[test]
fn test_table_spec_lookup() {
    let spec = &PLAYLIST_ITEMS_MANUAL_STATIC;
    assert_eq!(spec.column("position").unwrap().ty, ColumnType::BigInt);
    assert!(spec.column(SNAPSHOT_DATE_COLUMN).is_none());
    assert_eq!(
        spec.column_names(),
        vec!["playlist_id", "video_id", "position", "added_at", "extracted_at"]
    );
}

/// Row type whose values disagree with its table
struct MisdeclaredRow;

impl TableRow for MisdeclaredRow {
    fn table() -> &'static TableSpec {
        &PLAYLIST_ITEMS_MANUAL_STATIC
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text("PL1".into()),
            Value::Text("v1".into()),
            Value::Text("first".into()),
            Value::Null,
            Value::Null,
        ]
    }
}

#[test]
fn test_from_rows_rejects_rows_that_do_not_fit() {
    let err = RowSet::from_rows(&[MisdeclaredRow]).unwrap_err();
    assert!(matches!(err, CoreError::ValueTypeMismatch { ref column, .. } if column == "position"));
    assert!(err.to_string().starts_with("[E004]"));
}
