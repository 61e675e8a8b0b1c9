//! Extract-sql command implementation

use anyhow::{Context, Result};
use bf_core::Stage;
use bf_ingest::ExtractReport;

use crate::cli::GlobalArgs;
use crate::commands::common::{display_path, load_context_for, ExitCode, PipelineContext};

/// Extract every categorized source table into staging
pub(crate) async fn run_stage(ctx: &PipelineContext) -> Result<ExtractReport> {
    let source = ctx.database(&ctx.config.source);
    let report = bf_ingest::extract_sql(&source, &ctx.layout())
        .await
        .with_context(|| format!("Extraction from {} failed", source.redacted()))?;
    if !report.is_success() {
        log::warn!(
            "{} of {} tables failed to extract",
            report.failed.len(),
            report.failed.len() + report.extracted.len()
        );
    }
    Ok(report)
}

/// Execute the extract-sql command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = load_context_for(global, &[Stage::ExtractSql])?;
    let report = run_stage(&ctx).await?;

    for table in &report.extracted {
        println!(
            "  {:<24} {:>8} rows  {}",
            table.table,
            table.rows,
            display_path(&ctx.project_dir, &table.path)
        );
    }
    for table in &report.failed {
        eprintln!("  {:<24} FAILED  {}", table.table, table.error);
    }
    if !report.skipped.is_empty() {
        println!("  Skipped uncategorized: {}", report.skipped.join(", "));
    }
    println!();
    println!(
        "Extracted {} tables, {} failed, {} skipped",
        report.extracted.len(),
        report.failed.len(),
        report.skipped.len()
    );

    if report.is_success() {
        Ok(())
    } else {
        Err(ExitCode(1).into())
    }
}
