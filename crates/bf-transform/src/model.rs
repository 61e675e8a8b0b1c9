//! Dimensional model derivation
//!
//! Every join here is a left join done through a hash lookup: the left row
//! count is preserved exactly and unmatched right-hand columns come out null.
//! When a right-hand key repeats, its first row wins.

use crate::error::{TransformError, TransformResult};
use crate::output::{
    write_rows, DimColor, DimPart, DimSet, FactInventoryMinifig, FactInventoryPart,
    FactInventorySet, OutputRow,
};
use crate::relationships::{summarize, RelationshipSummary};
use crate::schema::{
    InventoryMinifigRow, InventoryRow, InventorySetRow, MinifigRow, PartCategoryRow, PartRow,
    SetRow, StagedRow, StagedTables, ThemeRow,
};
use crate::timestamp::{format_timestamp, parse_timestamp};
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::path::{Path, PathBuf};

/// First row per key
fn index_first<'a, K, T, F>(rows: &'a [T], key: F) -> HashMap<K, &'a T>
where
    K: Eq + Hash,
    F: Fn(&'a T) -> K,
{
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        index.entry(key(row)).or_insert(row);
    }
    index
}

/// A set with its theme resolved
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry<'a> {
    pub set: &'a SetRow,
    pub theme: Option<&'a ThemeRow>,
}

/// Sets joined to themes, looked up by set number
#[derive(Debug)]
pub struct SetCatalog<'a> {
    sets: HashMap<&'a str, CatalogEntry<'a>>,
}

impl<'a> SetCatalog<'a> {
    pub fn build(sets: &'a [SetRow], themes: &'a [ThemeRow]) -> Self {
        let themes = index_first(themes, |t| t.id);
        let sets = index_first(sets, |s| s.set_num.as_str())
            .into_iter()
            .map(|(set_num, set)| {
                let theme = set.theme_id.and_then(|id| themes.get(&id).copied());
                (set_num, CatalogEntry { set, theme })
            })
            .collect();
        Self { sets }
    }

    pub fn get(&self, set_num: &str) -> Option<&CatalogEntry<'a>> {
        self.sets.get(set_num)
    }
}

/// An inventory with its set and theme, when they resolve
#[derive(Debug, Clone, Copy)]
pub struct EnrichedInventory<'a> {
    pub inventory: &'a InventoryRow,
    pub catalog: Option<CatalogEntry<'a>>,
}

/// Inventories left-joined to sets and themes
///
/// Built once per run and shared by the minifig and set facts.
#[derive(Debug)]
pub struct InventoryView<'a> {
    catalog: SetCatalog<'a>,
    inventories: HashMap<i64, EnrichedInventory<'a>>,
}

impl<'a> InventoryView<'a> {
    pub fn build(
        inventories: &'a [InventoryRow],
        sets: &'a [SetRow],
        themes: &'a [ThemeRow],
    ) -> Self {
        let catalog = SetCatalog::build(sets, themes);
        let inventories: HashMap<i64, EnrichedInventory<'a>> = index_first(inventories, |i| i.id)
            .into_iter()
            .map(|(id, inventory)| {
                let entry = inventory
                    .set_num
                    .as_deref()
                    .and_then(|set_num| catalog.get(set_num).copied());
                (
                    id,
                    EnrichedInventory {
                        inventory,
                        catalog: entry,
                    },
                )
            })
            .collect();

        let mut orphaned = 0usize;
        for enriched in inventories.values().filter(|i| i.catalog.is_none()) {
            orphaned += 1;
            log::debug!(
                "Inventory {} references unknown set {}",
                enriched.inventory.id,
                enriched.inventory.set_num.as_deref().unwrap_or("<null>")
            );
        }
        if orphaned > 0 {
            log::warn!("{} inventories reference unknown sets", orphaned);
        }
        Self {
            catalog,
            inventories,
        }
    }

    /// Set and theme by set number
    pub fn set(&self, set_num: &str) -> Option<&CatalogEntry<'a>> {
        self.catalog.get(set_num)
    }

    /// Inventory by id; a null id matches nothing
    pub fn inventory(&self, id: Option<i64>) -> Option<&EnrichedInventory<'a>> {
        id.and_then(|id| self.inventories.get(&id))
    }
}

fn warn_unresolved(table: &str, count: usize) {
    if count > 0 {
        log::warn!("{} {} rows reference unknown inventories", count, table);
    }
}

/// An inventory part with its part, category, and relationship summary
#[derive(Debug, Clone)]
struct EnrichedInventoryPart<'a> {
    part: Option<&'a PartRow>,
    category: Option<&'a PartCategoryRow>,
    relationships: Option<&'a RelationshipSummary>,
}

/// The six derived artifacts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionalModel {
    pub dimension_sets: Vec<DimSet>,
    pub dimension_colors: Vec<DimColor>,
    pub dimension_parts: Vec<DimPart>,
    pub ft_inv_minifigs: Vec<FactInventoryMinifig>,
    pub ft_inv_sets: Vec<FactInventorySet>,
    pub ft_inv_parts: Vec<FactInventoryPart>,
}

/// An artifact written to the transformed root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifact {
    pub name: &'static str,
    pub rows: usize,
    pub path: PathBuf,
}

impl DimensionalModel {
    /// Derive every fact and dimension table from the staged tables
    pub fn build(staged: &StagedTables) -> TransformResult<Self> {
        let inventories =
            InventoryView::build(&staged.inventories, &staged.sets, &staged.themes);
        let relationships = summarize(&staged.part_relationships);

        let (dimension_parts, ft_inv_parts) = parts_tables(staged, &relationships);

        Ok(Self {
            dimension_sets: dimension_sets(&staged.sets),
            dimension_colors: dimension_colors(staged),
            dimension_parts,
            ft_inv_minifigs: ft_inv_minifigs(
                &staged.inventory_minifigs,
                &staged.minifigs,
                &inventories,
            )?,
            ft_inv_sets: ft_inv_sets(&staged.inventory_sets, &inventories),
            ft_inv_parts,
        })
    }

    /// Write all six artifacts under `root`
    pub fn write(&self, root: &Path) -> TransformResult<Vec<WrittenArtifact>> {
        Ok(vec![
            write_artifact(root, &self.dimension_sets)?,
            write_artifact(root, &self.dimension_colors)?,
            write_artifact(root, &self.dimension_parts)?,
            write_artifact(root, &self.ft_inv_minifigs)?,
            write_artifact(root, &self.ft_inv_sets)?,
            write_artifact(root, &self.ft_inv_parts)?,
        ])
    }
}

fn write_artifact<T: OutputRow>(root: &Path, rows: &[T]) -> TransformResult<WrittenArtifact> {
    let path = write_rows(root, rows)?;
    log::info!("Wrote {} ({} rows)", path.display(), rows.len());
    Ok(WrittenArtifact {
        name: T::ARTIFACT,
        rows: rows.len(),
        path,
    })
}

fn dimension_sets(sets: &[SetRow]) -> Vec<DimSet> {
    sets.iter()
        .map(|s| DimSet {
            set_num: s.set_num.clone(),
            set_name: s.name.clone(),
            year: s.year,
            theme_id: s.theme_id,
            num_parts: s.num_parts,
            image_url: s.img_url.clone(),
        })
        .collect()
}

fn dimension_colors(staged: &StagedTables) -> Vec<DimColor> {
    let mut seen = HashSet::new();
    staged
        .colors
        .iter()
        .filter(|c| seen.insert(c.id))
        .map(|c| DimColor {
            color_id: c.id,
            color_name: c.name.clone(),
            rgb: c.rgb.clone(),
            is_transparent: c.is_trans.clone(),
            num_parts: c.num_parts,
            num_sets: c.num_sets,
            year1: c.y1.clone(),
            year2: c.y2.clone(),
        })
        .collect()
}

/// Inventory parts joined to parts, categories, colors, and relationships;
/// yields the parts dimension and the inventory parts fact
fn parts_tables(
    staged: &StagedTables,
    relationships: &IndexMap<String, RelationshipSummary>,
) -> (Vec<DimPart>, Vec<FactInventoryPart>) {
    let parts = index_first(&staged.parts, |p| p.part_num.as_str());
    let categories = index_first(&staged.part_categories, |c| c.id);

    let mut dimension: IndexSet<DimPart> = IndexSet::new();
    let mut facts = Vec::with_capacity(staged.inventory_parts.len());

    for row in &staged.inventory_parts {
        let part = parts.get(row.part_num.as_str()).copied();
        let enriched = EnrichedInventoryPart {
            part,
            category: part
                .and_then(|p| p.part_cat_id)
                .and_then(|id| categories.get(&id).copied()),
            relationships: relationships.get(row.part_num.as_str()),
        };

        dimension.insert(DimPart {
            part_name: enriched.part.and_then(|p| p.name.clone()),
            part_number: row.part_num.clone(),
            part_category_id: enriched.part.and_then(|p| p.part_cat_id),
            part_category_name: enriched.category.and_then(|c| c.name.clone()),
            part_material: enriched.part.and_then(|p| p.part_material.clone()),
            relationship_type: enriched.relationships.map(|r| r.rel_type.clone()),
            relationship_type_desc: enriched.relationships.map(|r| r.rel_type_desc.clone()),
        });

        facts.push(FactInventoryPart {
            inventory_id: row.inventory_id,
            part_num_id: row.part_num.clone(),
            color_id: row.color_id,
            quantity: row.quantity,
            is_spare: row.is_spare.clone(),
            img_url: row.img_url.clone(),
        });
    }

    (dimension.into_iter().collect(), facts)
}

fn ft_inv_minifigs(
    inventory_minifigs: &[InventoryMinifigRow],
    minifigs: &[MinifigRow],
    inventories: &InventoryView<'_>,
) -> TransformResult<Vec<FactInventoryMinifig>> {
    let minifigs = index_first(minifigs, |m| m.set_num.as_str());
    let mut unresolved = 0usize;
    let mut facts = Vec::with_capacity(inventory_minifigs.len());

    for row in inventory_minifigs {
        let minifig = minifigs.get(row.fig_num.as_str()).copied();
        if inventories.inventory(row.inventory_id).is_none() {
            unresolved += 1;
        }

        let last_modified = row
            .last_modified_dt
            .as_deref()
            .or_else(|| minifig.and_then(|m| m.last_modified_dt.as_deref()))
            .map(|value| {
                parse_timestamp(value)
                    .map(|dt| format_timestamp(&dt))
                    .ok_or_else(|| TransformError::InvalidValue {
                        table: InventoryMinifigRow::KEY.to_string(),
                        message: format!(
                            "last_modified_dt '{}' for fig {} is not a timestamp",
                            value, row.fig_num
                        ),
                    })
            })
            .transpose()?;

        facts.push(FactInventoryMinifig {
            inventory_id: row.inventory_id,
            fig_num: row.fig_num.clone(),
            quantity: row.quantity,
            set_num: minifig.map(|m| m.set_num.clone()),
            set_url: row
                .set_url
                .clone()
                .or_else(|| minifig.and_then(|m| m.set_url.clone())),
            last_modified,
        });
    }

    warn_unresolved(InventoryMinifigRow::KEY, unresolved);
    Ok(facts)
}

fn ft_inv_sets(
    inventory_sets: &[InventorySetRow],
    inventories: &InventoryView<'_>,
) -> Vec<FactInventorySet> {
    let mut unresolved = 0usize;
    let facts = inventory_sets
        .iter()
        .map(|row| {
            if inventories.inventory(row.inventory_id).is_none() {
                unresolved += 1;
            }
            let set = inventories.set(&row.set_num).map(|entry| entry.set);
            FactInventorySet {
                inventory_id: row.inventory_id,
                setnum: row.set_num.clone(),
                num_parts: set.and_then(|s| s.num_parts),
                set_img_url: set.and_then(|s| s.img_url.clone()),
                quantity: row.quantity,
            }
        })
        .collect();
    warn_unresolved(InventorySetRow::KEY, unresolved);
    facts
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
