//! Fact and dimension rows as written to the transformed root

use crate::error::{TransformError, TransformResult};
use bf_core::table::ensure_parent_dir;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A row type written as one transformed artifact
pub trait OutputRow: Serialize {
    /// Artifact file stem
    const ARTIFACT: &'static str;
    /// Header, in serialization order
    const COLUMNS: &'static [&'static str];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimSet {
    pub set_num: String,
    pub set_name: Option<String>,
    pub year: Option<i64>,
    pub theme_id: Option<i64>,
    pub num_parts: Option<i64>,
    pub image_url: Option<String>,
}

impl OutputRow for DimSet {
    const ARTIFACT: &'static str = "dimension_sets";
    const COLUMNS: &'static [&'static str] =
        &["setNum", "setName", "year", "themeId", "numParts", "imageUrl"];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimColor {
    pub color_id: i64,
    pub color_name: Option<String>,
    pub rgb: Option<String>,
    pub is_transparent: Option<String>,
    pub num_parts: Option<i64>,
    pub num_sets: Option<i64>,
    pub year1: Option<String>,
    pub year2: Option<String>,
}

impl OutputRow for DimColor {
    const ARTIFACT: &'static str = "dimension_colors";
    const COLUMNS: &'static [&'static str] = &[
        "colorId",
        "colorName",
        "rgb",
        "isTransparent",
        "numParts",
        "numSets",
        "year1",
        "year2",
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimPart {
    pub part_name: Option<String>,
    pub part_number: String,
    pub part_category_id: Option<i64>,
    pub part_category_name: Option<String>,
    pub part_material: Option<String>,
    pub relationship_type: Option<String>,
    pub relationship_type_desc: Option<String>,
}

impl OutputRow for DimPart {
    const ARTIFACT: &'static str = "dimension_parts";
    const COLUMNS: &'static [&'static str] = &[
        "partName",
        "partNumber",
        "partCategoryId",
        "partCategoryName",
        "partMaterial",
        "relationshipType",
        "relationshipTypeDesc",
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactInventoryMinifig {
    pub inventory_id: Option<i64>,
    pub fig_num: String,
    pub quantity: Option<i64>,
    /// Fig number of the matched minifig; null when unmatched
    pub set_num: Option<String>,
    pub set_url: Option<String>,
    pub last_modified: Option<String>,
}

impl OutputRow for FactInventoryMinifig {
    const ARTIFACT: &'static str = "ft_inv_minifigs";
    const COLUMNS: &'static [&'static str] = &[
        "inventory_id",
        "fig_num",
        "quantity",
        "set_num",
        "set_url",
        "last_modified",
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactInventorySet {
    pub inventory_id: Option<i64>,
    pub setnum: String,
    pub num_parts: Option<i64>,
    pub set_img_url: Option<String>,
    pub quantity: Option<i64>,
}

impl OutputRow for FactInventorySet {
    const ARTIFACT: &'static str = "ft_inv_sets";
    const COLUMNS: &'static [&'static str] = &[
        "inventory_id",
        "setnum",
        "num_parts",
        "set_img_url",
        "quantity",
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactInventoryPart {
    pub inventory_id: Option<i64>,
    pub part_num_id: String,
    pub color_id: Option<i64>,
    pub quantity: Option<i64>,
    pub is_spare: Option<String>,
    pub img_url: Option<String>,
}

impl OutputRow for FactInventoryPart {
    const ARTIFACT: &'static str = "ft_inv_parts";
    const COLUMNS: &'static [&'static str] = &[
        "inventory_id",
        "part_num_id",
        "color_id",
        "quantity",
        "is_spare",
        "img_url",
    ];
}

/// Path of an artifact inside the transformed root
pub fn artifact_path(root: &Path, artifact: &str) -> PathBuf {
    root.join(format!("{}.{}", artifact, bf_core::staging::ARTIFACT_EXTENSION))
}

/// Write rows with their header, replacing any previous file
///
/// The header is written even when there are no rows.
pub fn write_rows<T: OutputRow>(root: &Path, rows: &[T]) -> TransformResult<PathBuf> {
    let path = artifact_path(root, T::ARTIFACT);
    ensure_parent_dir(&path)?;
    let csv_err = |source| TransformError::Csv {
        path: path.display().to_string(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&path)
        .map_err(csv_err)?;
    writer.write_record(T::COLUMNS).map_err(csv_err)?;
    for row in rows {
        writer.serialize(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|e| {
        TransformError::Core(bf_core::CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })
    })?;

    Ok(path)
}

#[cfg(test)]
#[path = "output_test.rs"]
mod tests;
