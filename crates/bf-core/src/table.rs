//! Untyped tabular data: the shape staged and transformed artifacts take on
//! disk and in the databases
//!
//! Every cell is text or null. Typed access is layered on top by the
//! transformer; the extractor and loader move tables around unchanged.

use crate::error::{CoreError, CoreResult};
use chrono::NaiveDateTime;
use std::fs;
use std::path::Path;

/// A single cell; `None` is SQL NULL / an empty CSV field
pub type Cell = Option<String>;

/// Column names plus rows of cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; short rows are padded with nulls, long rows truncated
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = Option<&str>> {
        self.rows
            .iter()
            .map(move |row| row.get(index).and_then(|c| c.as_deref()))
    }

    /// Read a CSV file with a header row; empty fields become nulls
    pub fn read_csv(path: &Path) -> CoreResult<Self> {
        let csv_err = |source| CoreError::Csv {
            path: path.display().to_string(),
            source,
        };
        let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
        let headers = reader.headers().map_err(csv_err)?.clone();
        let mut table = Table::new(headers.iter());
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            table.push_row(
                record
                    .iter()
                    .map(|field| (!field.is_empty()).then(|| field.to_string()))
                    .collect(),
            );
        }
        Ok(table)
    }

    /// Write the table as CSV with a header row, replacing any existing file
    /// and creating parent directories as needed
    pub fn write_csv(&self, path: &Path) -> CoreResult<()> {
        ensure_parent_dir(path)?;
        let csv_err = |source| CoreError::Csv {
            path: path.display().to_string(),
            source,
        };
        let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
        writer.write_record(&self.columns).map_err(csv_err)?;
        for row in &self.rows {
            writer
                .write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))
                .map_err(csv_err)?;
        }
        writer.flush().map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(())
    }

    /// Infer a SQL column type for every column from its non-null values
    pub fn infer_column_types(&self) -> Vec<ColumnType> {
        (0..self.columns.len())
            .map(|i| ColumnType::infer(self.column_values(i)))
            .collect()
    }
}

/// Create the parent directory of `path` if it does not exist
pub fn ensure_parent_dir(path: &Path) -> CoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CoreError::IoWithPath {
            path: parent.display().to_string(),
            source: e,
        })?;
    }
    Ok(())
}

/// Column type used when a table is recreated in a database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    BigInt,
    Double,
    Boolean,
    Timestamp,
    Text,
}

/// Timestamp layout written by the transformer; the fraction is optional
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

impl ColumnType {
    /// SQL type name understood by both PostgreSQL and DuckDB
    pub fn sql_name(self) -> &'static str {
        match self {
            ColumnType::BigInt => "BIGINT",
            ColumnType::Double => "DOUBLE PRECISION",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Timestamp => "TIMESTAMP",
            ColumnType::Text => "TEXT",
        }
    }

    /// Narrowest type every non-null value fits; all-null columns are text
    pub fn infer<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut int = true;
        let mut double = true;
        let mut boolean = true;
        let mut timestamp = true;
        let mut seen = false;

        for value in values.into_iter().flatten() {
            seen = true;
            int &= value.parse::<i64>().is_ok();
            double &= value.parse::<f64>().is_ok_and(f64::is_finite);
            boolean &= value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false");
            timestamp &= NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).is_ok();
            if !(int || double || boolean || timestamp) {
                return ColumnType::Text;
            }
        }

        match (seen, int, double, boolean, timestamp) {
            (false, ..) => ColumnType::Text,
            (_, true, ..) => ColumnType::BigInt,
            (_, _, true, ..) => ColumnType::Double,
            (_, _, _, true, _) => ColumnType::Boolean,
            (_, _, _, _, true) => ColumnType::Timestamp,
            _ => ColumnType::Text,
        }
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
