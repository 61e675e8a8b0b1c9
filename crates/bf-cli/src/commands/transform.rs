//! Transform command implementation

use anyhow::{Context, Result};
use bf_transform::TransformReport;

use crate::cli::GlobalArgs;
use crate::commands::common::{display_path, load_context, PipelineContext};

/// Build the dimensional model from staging into the transformed root
pub(crate) async fn run_stage(ctx: &PipelineContext) -> Result<TransformReport> {
    let staging_root = ctx.staging_root();
    let transformed_root = ctx.transformed_root();
    bf_transform::transform(&staging_root, &transformed_root).with_context(|| {
        format!(
            "Failed to transform {} into {}",
            staging_root.display(),
            transformed_root.display()
        )
    })
}

/// Execute the transform command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = load_context(global)?;
    let report = run_stage(&ctx).await?;

    for artifact in &report.artifacts {
        println!(
            "  {:<20} {:>8} rows  {}",
            artifact.name,
            artifact.rows,
            display_path(&ctx.project_dir, &artifact.path)
        );
    }
    println!();
    println!("Wrote {} artifacts", report.artifacts.len());
    Ok(())
}
