//! DuckDB warehouse backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::Warehouse;
use async_trait::async_trait;
use cf_core::sql_utils::{quote_ident, quote_table};
use cf_core::{ColumnType, RowSet, TableSpec, Value, WarehouseConfig};
use duckdb::types::Value as DuckValue;
use duckdb::{params, params_from_iter, Connection};
use log::{debug, info};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB warehouse backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
    dataset: String,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB warehouse
    pub fn in_memory(dataset: &str) -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::with_connection(conn, dataset))
    }

    /// Create a new DuckDB warehouse from a file path
    pub fn from_path(path: &Path, dataset: &str) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{}: {}", path.display(), e)))?;
        Ok(Self::with_connection(conn, dataset))
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str, dataset: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory(dataset)
        } else {
            Self::from_path(Path::new(path), dataset)
        }
    }

    /// Open the warehouse described by `config`
    pub fn open(config: &WarehouseConfig) -> DbResult<Self> {
        info!(
            "Opening warehouse {} (dataset {}) at {}",
            config.project,
            config.dataset,
            config.path.display()
        );
        if config.is_in_memory() {
            Self::in_memory(&config.dataset)
        } else {
            Self::from_path(&config.path, &config.dataset)
        }
    }

    fn with_connection(conn: Connection, dataset: &str) -> Self {
        Self {
            conn: Mutex::new(conn),
            dataset: dataset.to_string(),
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn qualified(&self, table: &TableSpec) -> String {
        quote_table(&self.dataset, table.name)
    }

    /// Run `body` inside `BEGIN` / `COMMIT`, rolling back on error
    fn with_transaction<T, F>(conn: &Connection, body: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        conn.execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

        let result = body(conn);

        match &result {
            Ok(_) => {
                if let Err(commit_err) = conn.execute_batch("COMMIT") {
                    let _ = conn.execute_batch("ROLLBACK");
                    return Err(DbError::TransactionError(format!(
                        "COMMIT failed: {commit_err}"
                    )));
                }
            }
            Err(_) => {
                let _ = conn.execute_batch("ROLLBACK");
            }
        }
        result
    }

    fn ensure_table_sync(&self, conn: &Connection, table: &TableSpec) -> DbResult<()> {
        let columns = table
            .columns
            .iter()
            .map(|c| format!("{} {}", quote_ident(c.name), c.ty.as_sql()))
            .collect::<Vec<_>>()
            .join(", ");

        let sql = format!(
            "CREATE SCHEMA IF NOT EXISTS {}; CREATE TABLE IF NOT EXISTS {} ({});",
            quote_ident(&self.dataset),
            self.qualified(table),
            columns
        );
        conn.execute_batch(&sql)
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
    }

    /// Insert every row through one prepared statement
    fn insert_sync(&self, conn: &Connection, rows: &RowSet) -> DbResult<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let table = rows.table();
        let columns = table
            .columns
            .iter()
            .map(|c| quote_ident(c.name))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = table
            .columns
            .iter()
            .map(|c| format!("CAST(? AS {})", c.ty.as_sql()))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.qualified(table),
            columns,
            placeholders
        );

        let mut stmt = conn.prepare(&sql)?;
        let mut inserted = 0;
        for row in rows.rows() {
            inserted += stmt.execute(params_from_iter(row.iter().map(to_duck_value)))?;
        }
        Ok(inserted)
    }

    fn delete_sync(
        &self,
        conn: &Connection,
        table: &TableSpec,
        column: &str,
        value: &Value,
    ) -> DbResult<usize> {
        let ty = column_type(table, column)?;
        let sql = format!(
            "DELETE FROM {} WHERE {} = CAST(? AS {})",
            self.qualified(table),
            quote_ident(column),
            ty.as_sql()
        );
        Ok(conn.execute(&sql, params![to_duck_value(value)])?)
    }

    fn query_count_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM ({})", sql), [], |row| {
                row.get(0)
            })
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Ok(count as usize)
    }

    fn query_strings_sync(&self, sql: &str) -> DbResult<Vec<Vec<Option<String>>>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([])?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let width = row.as_ref().column_count();
            let mut cells = Vec::with_capacity(width);
            for i in 0..width {
                cells.push(row.get::<_, Option<String>>(i)?);
            }
            out.push(cells);
        }
        Ok(out)
    }

    fn relation_exists_sync(&self, table: &TableSpec) -> DbResult<bool> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
                params![self.dataset, table.name],
                |row| row.get(0),
            )
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Ok(count > 0)
    }
}

#[async_trait]
impl Warehouse for DuckDbBackend {
    async fn ensure_table(&self, table: &TableSpec) -> DbResult<()> {
        let conn = self.lock()?;
        self.ensure_table_sync(&conn, table)
    }

    async fn truncate_and_load(&self, rows: &RowSet) -> DbResult<usize> {
        let table = rows.table();
        let conn = self.lock()?;
        self.ensure_table_sync(&conn, table)?;

        let written = Self::with_transaction(&conn, |conn| {
            let removed = conn.execute(&format!("DELETE FROM {}", self.qualified(table)), [])?;
            debug!("Cleared {} rows from {}", removed, table);
            self.insert_sync(conn, rows)
        })?;
        debug!("Loaded {} rows into {}", written, table);
        Ok(written)
    }

    async fn append(&self, rows: &RowSet) -> DbResult<usize> {
        let table = rows.table();
        let conn = self.lock()?;
        self.ensure_table_sync(&conn, table)?;

        let written = Self::with_transaction(&conn, |conn| self.insert_sync(conn, rows))?;
        debug!("Appended {} rows to {}", written, table);
        Ok(written)
    }

    async fn delete_where(
        &self,
        table: &TableSpec,
        column: &str,
        value: &Value,
    ) -> DbResult<usize> {
        let conn = self.lock()?;
        self.ensure_table_sync(&conn, table)?;

        let deleted = self.delete_sync(&conn, table, column, value)?;
        debug!("Deleted {} rows from {} where {} = {:?}", deleted, table, column, value);
        Ok(deleted)
    }

    async fn replace_partition(&self, column: &str, value: &Value, rows: &RowSet) -> DbResult<usize> {
        let table = rows.table();
        let conn = self.lock()?;
        self.ensure_table_sync(&conn, table)?;

        // delete and append commit together
        let written = Self::with_transaction(&conn, |conn| {
            let deleted = self.delete_sync(conn, table, column, value)?;
            debug!("Replacing {} rows in {} where {} = {:?}", deleted, table, column, value);
            self.insert_sync(conn, rows)
        })?;
        Ok(written)
    }

    async fn relation_exists(&self, table: &TableSpec) -> DbResult<bool> {
        self.relation_exists_sync(table)
    }

    async fn query_count(&self, sql: &str) -> DbResult<usize> {
        self.query_count_sync(sql)
    }

    async fn query_strings(&self, sql: &str) -> DbResult<Vec<Vec<Option<String>>>> {
        self.query_strings_sync(sql)
    }

    fn dataset(&self) -> &str {
        &self.dataset
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

fn column_type(table: &TableSpec, column: &str) -> DbResult<ColumnType> {
    table
        .column(column)
        .map(|c| c.ty)
        .ok_or_else(|| DbError::UnknownColumn {
            table: table.name.to_string(),
            column: column.to_string(),
        })
}

/// Bind representation; dates and timestamps travel as text and are cast in SQL
fn to_duck_value(value: &Value) -> DuckValue {
    match value {
        Value::Null => DuckValue::Null,
        Value::Text(s) => DuckValue::Text(s.clone()),
        Value::Int(n) => DuckValue::BigInt(*n),
        Value::Date(d) => DuckValue::Text(d.format("%Y-%m-%d").to_string()),
        Value::Timestamp(ts) => DuckValue::Text(ts.format("%Y-%m-%d %H:%M:%S%.6f").to_string()),
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
