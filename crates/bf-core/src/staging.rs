//! Staging area layout
//!
//! The staging root holds one subdirectory per source-table category plus one
//! for the API resource, with one CSV file per table:
//!
//! ```text
//! <root>/inventory_tbl/inventories.csv
//! <root>/parts_tbl/colors.csv
//! <root>/sets_tbl/themes.csv
//! <root>/rebrickable_minifigs/minifigs.csv
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

/// Extension used for every staged and transformed artifact
pub const ARTIFACT_EXTENSION: &str = "csv";

/// Subdirectory holding API-sourced artifacts
pub const API_MINIFIGS_DIR: &str = "rebrickable_minifigs";

/// Table name of the API-sourced minifig artifact
pub const API_MINIFIGS_TABLE: &str = "minifigs";

/// Fixed category of a source table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableCategory {
    /// Inventory tables
    Inventory,
    /// Part, color, and relationship tables
    Parts,
    /// Set and theme tables
    Sets,
}

/// Static table -> category lookup; tables not listed are never staged
const CATEGORY_TABLES: [(&str, TableCategory); 11] = [
    ("inventory_parts", TableCategory::Inventory),
    ("inventories", TableCategory::Inventory),
    ("inventory_minifigs", TableCategory::Inventory),
    ("inventory_sets", TableCategory::Inventory),
    ("parts", TableCategory::Parts),
    ("part_relationships", TableCategory::Parts),
    ("part_categories", TableCategory::Parts),
    ("colors", TableCategory::Parts),
    ("elements", TableCategory::Parts),
    ("sets", TableCategory::Sets),
    ("themes", TableCategory::Sets),
];

impl TableCategory {
    /// All categories
    pub const ALL: [TableCategory; 3] = [
        TableCategory::Inventory,
        TableCategory::Parts,
        TableCategory::Sets,
    ];

    /// Look up the category of a source table
    pub fn for_table(table: &str) -> Option<Self> {
        CATEGORY_TABLES
            .iter()
            .find(|(name, _)| *name == table)
            .map(|(_, category)| *category)
    }

    /// Tables belonging to this category, in lookup order
    pub fn tables(self) -> impl Iterator<Item = &'static str> {
        CATEGORY_TABLES
            .iter()
            .filter(move |(_, category)| *category == self)
            .map(|(name, _)| *name)
    }

    /// Staging subdirectory name
    pub fn dir_name(self) -> &'static str {
        match self {
            TableCategory::Inventory => "inventory_tbl",
            TableCategory::Parts => "parts_tbl",
            TableCategory::Sets => "sets_tbl",
        }
    }
}

impl fmt::Display for TableCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Paths inside one staging root
#[derive(Debug, Clone)]
pub struct StagingLayout {
    root: PathBuf,
}

/// Result of the staging existence check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingCheck {
    /// Expected artifacts that are not on disk, in check order
    pub missing: Vec<PathBuf>,
}

impl StagingCheck {
    /// True when every expected artifact exists and ingestion can be skipped
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

impl StagingLayout {
    /// Create a layout rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Staging root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for a category
    pub fn category_dir(&self, category: TableCategory) -> PathBuf {
        self.root.join(category.dir_name())
    }

    /// Artifact path of a categorized source table
    pub fn table_path(&self, category: TableCategory, table: &str) -> PathBuf {
        self.category_dir(category)
            .join(format!("{}.{}", table, ARTIFACT_EXTENSION))
    }

    /// Artifact path of the API minifig records
    pub fn minifigs_path(&self) -> PathBuf {
        self.root
            .join(API_MINIFIGS_DIR)
            .join(format!("{}.{}", API_MINIFIGS_TABLE, ARTIFACT_EXTENSION))
    }

    /// Every artifact a complete ingestion produces
    pub fn expected_artifacts(&self) -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(CATEGORY_TABLES.len() + 1);
        for category in TableCategory::ALL {
            let mut tables: Vec<&str> = category.tables().collect();
            tables.sort_unstable();
            for table in tables {
                paths.push(self.table_path(category, table));
            }
            if category == TableCategory::Inventory {
                paths.push(self.minifigs_path());
            }
        }
        paths
    }

    /// Check which expected artifacts are already present
    pub fn check(&self) -> StagingCheck {
        let missing: Vec<PathBuf> = self
            .expected_artifacts()
            .into_iter()
            .filter(|path| !path.exists())
            .collect();

        match missing.first() {
            Some(first) => log::info!(
                "Staging file {} does not exist. Ingestion is required.",
                first.display()
            ),
            None => log::info!("All staging files exist. Skipping ingestion."),
        }

        StagingCheck { missing }
    }

    /// Lookup key of a staged artifact: its path relative to the root with
    /// separators replaced by `_` and the extension removed
    /// (`parts_tbl/colors.csv` -> `parts_tbl_colors`)
    pub fn artifact_key(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let stem = relative.with_extension("");
        let parts: Vec<String> = stem
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("_"))
        }
    }
}

#[cfg(test)]
#[path = "staging_test.rs"]
mod tests;
