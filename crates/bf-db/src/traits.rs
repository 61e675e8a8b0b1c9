//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use bf_core::Table;

/// Database abstraction used by the extractor (source side) and the loader
/// (destination side)
///
/// Implementations must be Send + Sync for async operation. The connection is
/// released when the implementation is dropped.
#[async_trait]
pub trait Database: Send + Sync {
    /// Names of the base tables (not views) visible to this connection
    async fn list_base_tables(&self) -> DbResult<Vec<String>>;

    /// Read every row of a table, every cell rendered as text
    async fn read_table(&self, name: &str) -> DbResult<Table>;

    /// Drop `name` if present and recreate it holding exactly `table`
    async fn replace_table(&self, name: &str, table: &Table) -> DbResult<()>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Execute multiple SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
