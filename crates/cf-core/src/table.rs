//! Warehouse table schemas and in-memory row sets.
//!
//! Every target table has a fixed column list. A [`RowSet`] is the unit that
//! moves from a transformer to the warehouse: a table spec plus rows whose
//! values line up with that spec's columns.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;

/// Column used to key append-only snapshot tables
pub const SNAPSHOT_DATE_COLUMN: &str = "snapshot_date";

/// Warehouse column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Variable-length text
    Varchar,
    /// 64-bit signed integer
    BigInt,
    /// Calendar date
    Date,
    /// Instant, stored as UTC wall-clock time
    Timestamp,
}

impl ColumnType {
    /// SQL type name
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::Varchar => "VARCHAR",
            ColumnType::BigInt => "BIGINT",
            ColumnType::Date => "DATE",
            ColumnType::Timestamp => "TIMESTAMP",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A named, typed column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Column name
    pub name: &'static str,
    /// Column type
    pub ty: ColumnType,
}

impl Column {
    /// Define a column
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        Self { name, ty }
    }
}

/// How a table is maintained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// Latest state only; every load overwrites the whole table
    Replaced,
    /// Append-only history with at most one row set per `snapshot_date`
    Snapshot,
}

/// Static description of a warehouse table
#[derive(Debug, PartialEq, Eq)]
pub struct TableSpec {
    /// Unqualified table name
    pub name: &'static str,
    /// Maintenance strategy
    pub kind: TableKind,
    /// Columns in load order
    pub columns: &'static [Column],
}

impl TableSpec {
    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in load order
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }
}

impl fmt::Display for TableSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL
    Null,
    /// Text
    Text(String),
    /// Integer
    Int(i64),
    /// Calendar date
    Date(NaiveDate),
    /// UTC instant
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Whether this value can be stored in a column of type `ty`
    pub fn fits(&self, ty: ColumnType) -> bool {
        matches!(
            (self, ty),
            (Value::Null, _)
                | (Value::Text(_), ColumnType::Varchar)
                | (Value::Int(_), ColumnType::BigInt)
                | (Value::Date(_), ColumnType::Date)
                | (Value::Timestamp(_), ColumnType::Timestamp)
        )
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// A typed row belonging to one table
pub trait TableRow {
    /// The table this row is written to
    fn table() -> &'static TableSpec;

    /// Cell values in the table's column order
    fn values(&self) -> Vec<Value>;
}

/// Rows ready to be written to one table
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
    table: &'static TableSpec,
    rows: Vec<Vec<Value>>,
}

impl RowSet {
    /// An empty row set for `table`
    pub fn empty(table: &'static TableSpec) -> Self {
        Self {
            table,
            rows: Vec::new(),
        }
    }

    /// Build from typed rows, checking each against the table's columns
    pub fn from_rows<R: TableRow>(rows: &[R]) -> CoreResult<Self> {
        let mut set = Self::empty(R::table());
        set.rows.reserve(rows.len());
        for row in rows {
            set.push(row.values())?;
        }
        Ok(set)
    }

    /// Append an untyped row, checking width and value types.
    pub fn push(&mut self, values: Vec<Value>) -> CoreResult<()> {
        if values.len() != self.table.columns.len() {
            return Err(CoreError::RowShapeMismatch {
                table: self.table.name.to_string(),
                expected: self.table.columns.len(),
                found: values.len(),
            });
        }
        if let Some((column, value)) = self
            .table
            .columns
            .iter()
            .zip(&values)
            .find(|(column, value)| !value.fits(column.ty))
        {
            return Err(CoreError::ValueTypeMismatch {
                table: self.table.name.to_string(),
                column: column.name.to_string(),
                expected: column.ty.as_sql(),
                value: format!("{:?}", value),
            });
        }
        self.rows.push(values);
        Ok(())
    }

    /// Target table
    pub fn table(&self) -> &'static TableSpec {
        self.table
    }

    /// Rows in insertion order
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
