//! API ingestion: fetch every minifig page and stage the records

use crate::error::IngestResult;
use crate::fetch::{authorization_for_key, Completion, PaginatedFetcher};
use crate::http::HttpClient;
use crate::records::records_to_table;
use bf_core::StagingLayout;
use std::path::PathBuf;

/// What one API ingestion produced
#[derive(Debug, Clone)]
pub struct ApiIngestReport {
    /// Records fetched
    pub records: usize,
    /// Successful pages
    pub pages: usize,
    pub completion: Completion,
    /// Staged artifact; `None` when nothing was fetched
    pub artifact: Option<PathBuf>,
}

/// Fetch every record reachable from `url` and stage them as the minifig
/// artifact
///
/// A hard failure mid-walk still stages the records gathered before it.
/// When no records arrive at all nothing is written.
pub async fn ingest_api<C: HttpClient>(
    fetcher: &PaginatedFetcher<C>,
    url: &str,
    api_key: &str,
    layout: &StagingLayout,
) -> IngestResult<ApiIngestReport> {
    let outcome = fetcher
        .fetch_all(url, &authorization_for_key(api_key))
        .await;

    if let Completion::Aborted { status, .. } = &outcome.completion {
        log::warn!(
            "API fetch ended early (status {}); keeping {} records",
            status.map_or_else(|| "none".to_string(), |s| s.to_string()),
            outcome.records.len()
        );
    }

    if outcome.records.is_empty() {
        log::warn!("No data fetched from API.");
        return Ok(ApiIngestReport {
            records: 0,
            pages: outcome.pages,
            completion: outcome.completion,
            artifact: None,
        });
    }

    let table = records_to_table(&outcome.records);
    let path = layout.minifigs_path();
    table.write_csv(&path)?;
    log::info!(
        "Staged {} API records to {}",
        outcome.records.len(),
        path.display()
    );

    Ok(ApiIngestReport {
        records: outcome.records.len(),
        pages: outcome.pages,
        completion: outcome.completion,
        artifact: Some(path),
    })
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
