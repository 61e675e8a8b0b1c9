//! Typed rows of the staged tables
//!
//! Each staged artifact is read into a row struct. The header is checked
//! against [`StagedRow::REQUIRED`] before any row is decoded, so a renamed or
//! dropped source column fails with the table and column named. Columns the
//! model never reads are ignored.

use crate::discover::StagedArtifacts;
use crate::error::{TransformError, TransformResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;

/// A row type backed by one staged artifact
pub trait StagedRow: DeserializeOwned {
    /// Artifact key
    const KEY: &'static str;
    /// Columns that must be present in the header
    const REQUIRED: &'static [&'static str];
}

/// Read every row of an artifact after checking its header
pub fn read_rows<T: StagedRow>(path: &Path) -> TransformResult<Vec<T>> {
    let csv_err = |source| TransformError::Csv {
        path: path.display().to_string(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let headers = reader.headers().map_err(csv_err)?.clone();

    if let Some(column) = T::REQUIRED
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(TransformError::MissingColumn {
            table: T::KEY.to_string(),
            column: column.to_string(),
        });
    }

    let mut rows = Vec::new();
    for (i, record) in reader.deserialize::<T>().enumerate() {
        let row = record.map_err(|e| TransformError::InvalidValue {
            table: T::KEY.to_string(),
            message: format!("row {}: {}", i + 1, e),
        })?;
        rows.push(row);
    }
    log::debug!("Loaded {} rows from {}", rows.len(), T::KEY);
    Ok(rows)
}

/// A blank `inventory_id` is read as null; the row is kept and simply
/// matches nothing
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryPartRow {
    pub inventory_id: Option<i64>,
    pub part_num: String,
    pub color_id: Option<i64>,
    pub quantity: Option<i64>,
    pub is_spare: Option<String>,
    pub img_url: Option<String>,
}

impl StagedRow for InventoryPartRow {
    const KEY: &'static str = "inventory_tbl_inventory_parts";
    const REQUIRED: &'static [&'static str] = &[
        "inventory_id",
        "part_num",
        "color_id",
        "quantity",
        "is_spare",
        "img_url",
    ];
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartRow {
    pub part_num: String,
    pub name: Option<String>,
    pub part_cat_id: Option<i64>,
    pub part_material: Option<String>,
}

impl StagedRow for PartRow {
    const KEY: &'static str = "parts_tbl_parts";
    const REQUIRED: &'static [&'static str] = &["part_num", "name", "part_cat_id", "part_material"];
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartRelationshipRow {
    pub rel_type: String,
    pub child_part_num: String,
    pub parent_part_num: String,
}

impl StagedRow for PartRelationshipRow {
    const KEY: &'static str = "parts_tbl_part_relationships";
    const REQUIRED: &'static [&'static str] = &["rel_type", "child_part_num", "parent_part_num"];
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartCategoryRow {
    pub id: i64,
    pub name: Option<String>,
}

impl StagedRow for PartCategoryRow {
    const KEY: &'static str = "parts_tbl_part_categories";
    const REQUIRED: &'static [&'static str] = &["id", "name"];
}

/// Color attributes other than the key are passed through untouched
#[derive(Debug, Clone, Deserialize)]
pub struct ColorRow {
    pub id: i64,
    pub name: Option<String>,
    pub rgb: Option<String>,
    pub is_trans: Option<String>,
    pub num_parts: Option<i64>,
    pub num_sets: Option<i64>,
    pub y1: Option<String>,
    pub y2: Option<String>,
}

impl StagedRow for ColorRow {
    const KEY: &'static str = "parts_tbl_colors";
    const REQUIRED: &'static [&'static str] = &[
        "id",
        "name",
        "rgb",
        "is_trans",
        "num_parts",
        "num_sets",
        "y1",
        "y2",
    ];
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetRow {
    pub set_num: String,
    pub name: Option<String>,
    pub year: Option<i64>,
    pub theme_id: Option<i64>,
    pub num_parts: Option<i64>,
    pub img_url: Option<String>,
}

impl StagedRow for SetRow {
    const KEY: &'static str = "sets_tbl_sets";
    const REQUIRED: &'static [&'static str] =
        &["set_num", "name", "year", "theme_id", "num_parts", "img_url"];
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThemeRow {
    pub id: i64,
    pub name: Option<String>,
}

impl StagedRow for ThemeRow {
    const KEY: &'static str = "sets_tbl_themes";
    const REQUIRED: &'static [&'static str] = &["id", "name"];
}

#[derive(Debug, Clone, Deserialize)]
pub struct InventoryRow {
    pub id: i64,
    pub version: Option<i64>,
    pub set_num: Option<String>,
}

impl StagedRow for InventoryRow {
    const KEY: &'static str = "inventory_tbl_inventories";
    const REQUIRED: &'static [&'static str] = &["id", "version", "set_num"];
}

/// `set_url` and `last_modified_dt` are usually supplied by the matched
/// minifig rather than the inventory row
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryMinifigRow {
    pub inventory_id: Option<i64>,
    pub fig_num: String,
    pub quantity: Option<i64>,
    #[serde(default)]
    pub set_url: Option<String>,
    #[serde(default)]
    pub last_modified_dt: Option<String>,
}

impl StagedRow for InventoryMinifigRow {
    const KEY: &'static str = "inventory_tbl_inventory_minifigs";
    const REQUIRED: &'static [&'static str] = &["inventory_id", "fig_num", "quantity"];
}

/// Minifig record from the API; `set_num` is the fig number
#[derive(Debug, Clone, Deserialize)]
pub struct MinifigRow {
    pub set_num: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub set_url: Option<String>,
    #[serde(default)]
    pub last_modified_dt: Option<String>,
}

impl StagedRow for MinifigRow {
    const KEY: &'static str = "rebrickable_minifigs_minifigs";
    const REQUIRED: &'static [&'static str] = &["set_num"];
}

#[derive(Debug, Clone, Deserialize)]
pub struct InventorySetRow {
    pub inventory_id: Option<i64>,
    pub set_num: String,
    pub quantity: Option<i64>,
}

impl StagedRow for InventorySetRow {
    const KEY: &'static str = "inventory_tbl_inventory_sets";
    const REQUIRED: &'static [&'static str] = &["inventory_id", "set_num", "quantity"];
}

/// All staged tables the model reads
#[derive(Debug, Clone, Default)]
pub struct StagedTables {
    pub inventory_parts: Vec<InventoryPartRow>,
    pub part_relationships: Vec<PartRelationshipRow>,
    pub colors: Vec<ColorRow>,
    pub parts: Vec<PartRow>,
    pub part_categories: Vec<PartCategoryRow>,
    pub sets: Vec<SetRow>,
    pub themes: Vec<ThemeRow>,
    pub inventories: Vec<InventoryRow>,
    pub inventory_minifigs: Vec<InventoryMinifigRow>,
    pub minifigs: Vec<MinifigRow>,
    pub inventory_sets: Vec<InventorySetRow>,
}

impl StagedTables {
    /// Load every required artifact
    pub fn load(artifacts: &StagedArtifacts) -> TransformResult<Self> {
        artifacts.require_all()?;
        Ok(Self {
            inventory_parts: load(artifacts)?,
            part_relationships: load(artifacts)?,
            colors: load(artifacts)?,
            parts: load(artifacts)?,
            part_categories: load(artifacts)?,
            sets: load(artifacts)?,
            themes: load(artifacts)?,
            inventories: load(artifacts)?,
            inventory_minifigs: load(artifacts)?,
            minifigs: load(artifacts)?,
            inventory_sets: load(artifacts)?,
        })
    }
}

fn load<T: StagedRow>(artifacts: &StagedArtifacts) -> TransformResult<Vec<T>> {
    read_rows(artifacts.required(T::KEY)?)
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
