//! Load command implementation: replace warehouse tables with the
//! transformed artifacts

use anyhow::{Context, Result};
use bf_core::{Stage, Table};
use bf_db::Database;
use bf_transform::output::artifact_path;
use std::path::Path;

use crate::cli::GlobalArgs;
use crate::commands::common::{load_context_for, PipelineContext};

/// Transformed artifact -> destination table
pub(crate) const DESTINATION_TABLES: [(&str, &str); 6] = [
    ("dimension_sets", "sets_dim"),
    ("dimension_colors", "colors_dim"),
    ("dimension_parts", "parts_dim"),
    ("ft_inv_minifigs", "inventory_minifigs_ft"),
    ("ft_inv_sets", "inventory_sets_ft"),
    ("ft_inv_parts", "inventory_parts_ft"),
];

/// A destination table that was replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LoadedTable {
    pub(crate) table: &'static str,
    pub(crate) rows: usize,
}

/// Read all six artifacts, then drop and recreate each destination table
///
/// Every artifact is read before the first table is touched, so a missing
/// artifact leaves the warehouse as it was.
pub(crate) async fn load_artifacts(
    db: &dyn Database,
    transformed_root: &Path,
) -> Result<Vec<LoadedTable>> {
    let mut tables = Vec::with_capacity(DESTINATION_TABLES.len());
    for (artifact, table) in DESTINATION_TABLES {
        let path = artifact_path(transformed_root, artifact);
        let data = Table::read_csv(&path)
            .with_context(|| format!("Failed to read transformed artifact {}", path.display()))?;
        tables.push((table, data));
    }

    let mut loaded = Vec::with_capacity(tables.len());
    for (table, data) in tables {
        db.replace_table(table, &data)
            .await
            .with_context(|| format!("Failed to replace {}", table))?;
        log::info!("Loaded {} rows into {}", data.len(), table);
        loaded.push(LoadedTable {
            table,
            rows: data.len(),
        });
    }
    Ok(loaded)
}

/// Connect to the destination and load every artifact
pub(crate) async fn run_stage(ctx: &PipelineContext) -> Result<Vec<LoadedTable>> {
    let destination = ctx.database(&ctx.config.destination);
    let db = bf_db::connect(&destination)
        .await
        .with_context(|| format!("Failed to connect to {}", destination.redacted()))?;
    let result = load_artifacts(db.as_ref(), &ctx.transformed_root()).await;
    drop(db);
    log::debug!("Closed destination connection");
    result
}

/// Execute the load command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = load_context_for(global, &[Stage::Load])?;
    let loaded = run_stage(&ctx).await?;

    for table in &loaded {
        println!("  {:<24} {:>8} rows", table.table, table.rows);
    }
    println!();
    println!(
        "Loaded {} tables into {}",
        loaded.len(),
        ctx.config.destination.redacted()
    );
    Ok(())
}

#[cfg(test)]
#[path = "load_test.rs"]
mod tests;
