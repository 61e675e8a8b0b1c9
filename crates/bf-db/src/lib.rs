//! bf-db - Database abstraction layer for Brickflow
//!
//! This crate provides the `Database` trait and implementations for
//! PostgreSQL (the source and warehouse in production) and DuckDB (local
//! files and tests).

pub mod duckdb;
pub mod error;
pub mod postgres;
pub(crate) mod sql;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use postgres::PostgresBackend;
pub use traits::Database;

use bf_core::{DatabaseConfig, DbType};

/// Open a connection for a configured database
pub async fn connect(config: &DatabaseConfig) -> DbResult<Box<dyn Database>> {
    match config.db_type {
        DbType::Postgres => Ok(Box::new(PostgresBackend::connect(config).await?)),
        DbType::DuckDb => {
            let path = config.path.as_deref().unwrap_or(":memory:");
            let db = DuckDbBackend::new(path)?;
            log::info!("Opened {}", config.redacted());
            Ok(Box::new(db))
        }
    }
}
