//! Staged artifact discovery

use crate::error::{TransformError, TransformResult};
use bf_core::staging::ARTIFACT_EXTENSION;
use bf_core::{CoreError, StagingLayout};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Keys the dimensional model reads; a missing one aborts the transform
pub const REQUIRED_KEYS: [&str; 11] = [
    "inventory_tbl_inventory_parts",
    "parts_tbl_part_relationships",
    "parts_tbl_colors",
    "parts_tbl_parts",
    "parts_tbl_part_categories",
    "sets_tbl_sets",
    "sets_tbl_themes",
    "inventory_tbl_inventories",
    "inventory_tbl_inventory_minifigs",
    "rebrickable_minifigs_minifigs",
    "inventory_tbl_inventory_sets",
];

/// Every staged CSV under a root, by artifact key
#[derive(Debug, Clone, Default)]
pub struct StagedArtifacts {
    paths: BTreeMap<String, PathBuf>,
}

impl StagedArtifacts {
    /// Recursively find staged CSV files under `root`
    pub fn discover(root: &Path) -> TransformResult<Self> {
        let layout = StagingLayout::new(root);
        let pattern = format!(
            "{}/**/*.{}",
            glob::Pattern::escape(&root.to_string_lossy()),
            ARTIFACT_EXTENSION
        );
        let mut paths = BTreeMap::new();

        for entry in glob::glob(&pattern)? {
            let path = entry.map_err(|e| {
                TransformError::Core(CoreError::IoWithPath {
                    path: e.path().display().to_string(),
                    source: e.into_error(),
                })
            })?;
            if let Some(key) = layout.artifact_key(&path) {
                log::debug!("Found staged artifact {} -> {}", key, path.display());
                paths.insert(key, path);
            }
        }

        log::info!("Found {} staged CSV files", paths.len());
        Ok(Self { paths })
    }

    /// Path of an artifact by key
    pub fn get(&self, key: &str) -> Option<&Path> {
        self.paths.get(key).map(PathBuf::as_path)
    }

    /// Fail if any required key was not found
    pub fn require_all(&self) -> TransformResult<()> {
        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|key| !self.paths.contains_key(**key))
            .map(|key| key.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(TransformError::MissingArtifacts(missing))
        }
    }

    /// Path of a required artifact
    pub fn required(&self, key: &str) -> TransformResult<&Path> {
        self.get(key)
            .ok_or_else(|| TransformError::MissingArtifacts(vec![key.to_string()]))
    }
}

#[cfg(test)]
#[path = "discover_test.rs"]
mod tests;
