//! Warehouse trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use cf_core::{RowSet, TableSpec, Value};

/// Tabular sink abstraction for Channelflow
///
/// Every table lives in one dataset (schema). Implementations must be
/// Send + Sync for async operation.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Create the dataset and the table if they do not exist yet
    async fn ensure_table(&self, table: &TableSpec) -> DbResult<()>;

    /// Replace the entire table content with `rows`, atomically
    async fn truncate_and_load(&self, rows: &RowSet) -> DbResult<usize>;

    /// Append `rows` without touching existing rows
    async fn append(&self, rows: &RowSet) -> DbResult<usize>;

    /// Delete every row where `column = value`, returns deleted rows
    async fn delete_where(&self, table: &TableSpec, column: &str, value: &Value)
        -> DbResult<usize>;

    /// Replace the rows keyed by `column = value` with `rows`.
    ///
    /// The default is a plain `delete_where` followed by `append`; a failure
    /// between the two leaves the key empty until the next run.
    async fn replace_partition(&self, column: &str, value: &Value, rows: &RowSet) -> DbResult<usize> {
        self.delete_where(rows.table(), column, value).await?;
        self.append(rows).await
    }

    /// Check if a table exists in the dataset
    async fn relation_exists(&self, table: &TableSpec) -> DbResult<bool>;

    /// Execute query returning row count (for tests)
    async fn query_count(&self, sql: &str) -> DbResult<usize>;

    /// Execute query returning every cell as text; columns must be VARCHAR
    async fn query_strings(&self, sql: &str) -> DbResult<Vec<Vec<Option<String>>>>;

    /// Dataset (schema) holding every table
    fn dataset(&self) -> &str;

    /// Warehouse type identifier for logging
    fn db_type(&self) -> &'static str;
}

#[async_trait]
impl<T: Warehouse + ?Sized> Warehouse for std::sync::Arc<T> {
    async fn ensure_table(&self, table: &TableSpec) -> DbResult<()> {
        (**self).ensure_table(table).await
    }

    async fn truncate_and_load(&self, rows: &RowSet) -> DbResult<usize> {
        (**self).truncate_and_load(rows).await
    }

    async fn append(&self, rows: &RowSet) -> DbResult<usize> {
        (**self).append(rows).await
    }

    async fn delete_where(&self, table: &TableSpec, column: &str, value: &Value)
        -> DbResult<usize> {
        (**self).delete_where(table, column, value).await
    }

    async fn replace_partition(&self, column: &str, value: &Value, rows: &RowSet) -> DbResult<usize> {
        (**self).replace_partition(column, value, rows).await
    }

    async fn relation_exists(&self, table: &TableSpec) -> DbResult<bool> {
        (**self).relation_exists(table).await
    }

    async fn query_count(&self, sql: &str) -> DbResult<usize> {
        (**self).query_count(sql).await
    }

    async fn query_strings(&self, sql: &str) -> DbResult<Vec<Vec<Option<String>>>> {
        (**self).query_strings(sql).await
    }

    fn dataset(&self) -> &str {
        (**self).dataset()
    }

    fn db_type(&self) -> &'static str {
        (**self).db_type()
    }
}
