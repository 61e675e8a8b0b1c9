//! Error types for bf-core

use thiserror::Error;

/// Core error type for Brickflow
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Failed to parse configuration file
    #[error("[C002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// C003: Invalid configuration value
    #[error("[C003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C004: Required configuration options are not set
    #[error("[C004] Missing required configuration: {}", options.join(", "))]
    ConfigMissing { options: Vec<String> },

    /// C005: IO error
    #[error("[C005] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// C006: IO error with file path context
    #[error("[C006] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// C007: CSV read/write error
    #[error("[C007] CSV error in '{path}': {source}")]
    Csv { path: String, source: csv::Error },

    /// C008: Stage graph contains a cycle
    #[error("[C008] Circular stage dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// Config YAML parse error
    #[error("[C002] Failed to parse config: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
