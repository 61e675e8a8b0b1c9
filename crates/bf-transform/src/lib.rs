//! bf-transform - Dimensional transformer for Brickflow
//!
//! Reads the staged tables, joins them into three dimensions (sets, colors,
//! parts) and three facts (inventory minifigs, sets, and parts), and writes
//! one CSV artifact per table. The whole model is derived in memory before
//! anything is written, so a failing run leaves the previous artifacts alone.

pub mod discover;
pub mod error;
pub mod model;
pub mod output;
pub mod relationships;
pub mod schema;
pub mod timestamp;

pub use discover::{StagedArtifacts, REQUIRED_KEYS};
pub use error::{TransformError, TransformResult};
pub use model::{DimensionalModel, WrittenArtifact};
pub use schema::StagedTables;

use std::path::Path;

/// Artifacts produced by one transform run
#[derive(Debug, Clone, Default)]
pub struct TransformReport {
    pub artifacts: Vec<WrittenArtifact>,
}

impl TransformReport {
    /// Rows written for an artifact
    pub fn rows(&self, name: &str) -> Option<usize> {
        self.artifacts
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.rows)
    }
}

/// Transform everything under `staging_root` into `transformed_root`
pub fn transform(staging_root: &Path, transformed_root: &Path) -> TransformResult<TransformReport> {
    let artifacts = StagedArtifacts::discover(staging_root)?;
    let staged = StagedTables::load(&artifacts)?;
    let model = DimensionalModel::build(&staged)?;
    let artifacts = model.write(transformed_root)?;
    log::info!(
        "All fact and dimension tables saved to {}",
        transformed_root.display()
    );
    Ok(TransformReport { artifacts })
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
