//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::sql::{
    relation_exists_sql, replace_table_statements, select_as_text_sql, table_columns_sql,
    LIST_BASE_TABLES_SQL,
};
use crate::traits::Database;
use async_trait::async_trait;
use bf_core::Table;
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn list_base_tables_sync(&self) -> DbResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(LIST_BASE_TABLES_SQL)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    fn read_table_sync(&self, name: &str) -> DbResult<Table> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&table_columns_sql(name))?;
        let columns = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        if columns.is_empty() {
            return Err(DbError::TableNotFound(name.to_string()));
        }

        let sql = select_as_text_sql(name, &columns);
        let width = columns.len();
        let mut table = Table::new(columns.into_iter().map(|(column, _)| column));
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            (0..width)
                .map(|i| row.get::<_, Option<String>>(i))
                .collect::<Result<Vec<_>, _>>()
        })?;
        for row in rows {
            table.push_row(row?);
        }
        Ok(table)
    }

    fn replace_table_sync(&self, name: &str, table: &Table) -> DbResult<()> {
        let statements = replace_table_statements(name, table)?;
        let conn = self.lock()?;
        let batch = format!("BEGIN TRANSACTION; {}; COMMIT;", statements.join("; "));
        if let Err(e) = conn.execute_batch(&batch) {
            let _ = conn.execute_batch("ROLLBACK");
            return Err(e.into());
        }
        Ok(())
    }

    fn relation_exists_sync(&self, name: &str) -> DbResult<bool> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(&relation_exists_sql(name), [], |row| row.get(0))?;
        Ok(count > 0)
    }

    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn list_base_tables(&self) -> DbResult<Vec<String>> {
        self.list_base_tables_sync()
    }

    async fn read_table(&self, name: &str) -> DbResult<Table> {
        self.read_table_sync(name)
    }

    async fn replace_table(&self, name: &str, table: &Table) -> DbResult<()> {
        self.replace_table_sync(name, table)
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.relation_exists_sync(name)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
