//! Error types for bf-ingest

use bf_core::CoreError;
use bf_db::DbError;
use thiserror::Error;

/// Ingestion errors
#[derive(Error, Debug)]
pub enum IngestError {
    /// I001: HTTP client could not be built
    #[error("[I001] Failed to build HTTP client: {0}")]
    HttpClient(String),

    /// I002: Credential cannot be sent as a header
    #[error("[I002] Invalid Authorization header value: {0}")]
    InvalidHeader(String),

    /// I003: Request never produced a response
    #[error("[I003] Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// I004: Staging area error
    #[error("[I004] Staging error: {0}")]
    Staging(#[from] CoreError),

    /// I005: Database error
    #[error("[I005] {0}")]
    Database(#[from] DbError),
}

/// Result type alias for IngestError
pub type IngestResult<T> = Result<T, IngestError>;
