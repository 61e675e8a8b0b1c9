//! Error types for bf-transform

use bf_core::CoreError;
use thiserror::Error;

/// Transformation errors
#[derive(Error, Debug)]
pub enum TransformError {
    /// T001: Required staged artifacts are absent
    #[error("[T001] Missing staged artifacts: {}", .0.join(", "))]
    MissingArtifacts(Vec<String>),

    /// T002: A staged artifact lacks a column the model reads
    #[error("[T002] Staged table '{table}' is missing column '{column}'")]
    MissingColumn { table: String, column: String },

    /// T003: A value cannot be interpreted
    #[error("[T003] Invalid value in '{table}': {message}")]
    InvalidValue { table: String, message: String },

    /// T004: Staged or transformed CSV could not be read or written
    #[error("[T004] CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// T005: Staging root could not be scanned
    #[error("[T005] Invalid staging pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// T006: Filesystem error
    #[error("[T006] {0}")]
    Core(#[from] CoreError),
}

/// Result type alias for TransformError
pub type TransformResult<T> = Result<T, TransformError>;
