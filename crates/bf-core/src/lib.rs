//! bf-core - Core library for Brickflow
//!
//! This crate provides the configuration model, the staging area layout, the
//! untyped `Table` used for every artifact, and the pipeline stage graph
//! shared by all Brickflow components.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod sql_utils;
pub mod staging;
pub mod table;

pub use config::{ApiConfig, Config, DatabaseConfig, DbType, FetchConfig, StorageConfig};
pub use error::{CoreError, CoreResult};
pub use pipeline::{Stage, StageGraph, StageStatus};
pub use staging::{StagingCheck, StagingLayout, TableCategory};
pub use table::{Cell, ColumnType, Table};
