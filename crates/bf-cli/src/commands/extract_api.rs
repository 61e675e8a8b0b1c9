//! Extract-api command implementation

use anyhow::{Context, Result};
use bf_core::Stage;
use bf_ingest::{ApiIngestReport, Completion, FetchSettings, PaginatedFetcher, ReqwestClient};
use std::time::Duration;

use crate::cli::GlobalArgs;
use crate::commands::common::{display_path, load_context_for, PipelineContext};

/// Per-request timeout for API calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch every API page and stage the records
pub(crate) async fn run_stage(ctx: &PipelineContext) -> Result<ApiIngestReport> {
    let (Some(url), Some(key)) = (ctx.config.api.url.as_deref(), ctx.config.api.key.as_deref())
    else {
        anyhow::bail!("API url and key must be configured");
    };

    let client = ReqwestClient::new(REQUEST_TIMEOUT)?;
    let fetcher = PaginatedFetcher::new(client, FetchSettings::from(&ctx.config.fetch));
    let report = bf_ingest::ingest_api(&fetcher, url, key, &ctx.layout())
        .await
        .context("API ingestion failed")?;
    Ok(report)
}

/// Execute the extract-api command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = load_context_for(global, &[Stage::ExtractApi])?;
    let report = run_stage(&ctx).await?;

    match &report.artifact {
        Some(path) => println!(
            "Fetched {} records over {} pages into {}",
            report.records,
            report.pages,
            display_path(&ctx.project_dir, path)
        ),
        None => println!("No records fetched; nothing staged"),
    }
    if let Completion::Aborted { status, reason } = &report.completion {
        let status = status.map_or_else(|| "no response".to_string(), |s| s.to_string());
        println!("Fetch stopped early ({}): {}", status, reason);
    }
    Ok(())
}
