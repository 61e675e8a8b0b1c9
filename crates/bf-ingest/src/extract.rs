//! Relational extraction: dump every categorized base table to staging

use crate::error::{IngestError, IngestResult};
use bf_core::{DatabaseConfig, StagingLayout, TableCategory};
use bf_db::Database;
use std::path::{Path, PathBuf};

/// A table that was staged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTable {
    pub table: String,
    pub category: TableCategory,
    pub rows: usize,
    pub path: PathBuf,
}

/// A table whose extraction failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedTable {
    pub table: String,
    pub error: String,
}

/// Outcome of one extraction pass
#[derive(Debug, Clone, Default)]
pub struct ExtractReport {
    /// Staged tables, in discovery order
    pub extracted: Vec<ExtractedTable>,
    /// Base tables outside the category lookup
    pub skipped: Vec<String>,
    /// Tables that failed; the rest were still extracted
    pub failed: Vec<FailedTable>,
}

impl ExtractReport {
    /// True when no table failed
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Stage every categorized base table visible to `db`
///
/// Only discovery failures are returned as errors. A table that cannot be
/// read or written is logged and recorded in the report.
pub async fn extract_tables(
    db: &dyn Database,
    layout: &StagingLayout,
) -> IngestResult<ExtractReport> {
    let tables = db.list_base_tables().await?;
    log::debug!("Found {} base tables on {}", tables.len(), db.db_type());

    let mut report = ExtractReport::default();
    for table in tables {
        let Some(category) = TableCategory::for_table(&table) else {
            log::debug!("Skipping uncategorized table {}", table);
            report.skipped.push(table);
            continue;
        };

        let path = layout.table_path(category, &table);
        match extract_one(db, &table, &path).await {
            Ok(rows) => {
                log::info!("Extracted {} ({} rows) to {}", table, rows, path.display());
                report.extracted.push(ExtractedTable {
                    table,
                    category,
                    rows,
                    path,
                });
            }
            Err(e) => {
                log::error!("Error extracting {}: {}", table, e);
                report.failed.push(FailedTable {
                    table,
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}

async fn extract_one(db: &dyn Database, table: &str, path: &Path) -> IngestResult<usize> {
    let data = db.read_table(table).await?;
    data.write_csv(path)?;
    Ok(data.len())
}

/// Connect to the configured source database and extract from it
///
/// The connection is dropped before returning, whatever the outcome.
pub async fn extract_sql(
    config: &DatabaseConfig,
    layout: &StagingLayout,
) -> IngestResult<ExtractReport> {
    let db = bf_db::connect(config).await.map_err(IngestError::from)?;
    let result = extract_tables(db.as_ref(), layout).await;
    drop(db);
    log::debug!("Closed source connection");
    result
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
