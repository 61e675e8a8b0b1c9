//! Paginated fetcher
//!
//! Walks a cursor-paginated API: every 200 page contributes its `results`
//! and names the `next` page; a 429 waits for `Retry-After` seconds and
//! re-requests the same URL; any other status ends the walk and whatever has
//! been accumulated is returned. The walk also stops, keeping its records,
//! when a `next` link points at a page already fetched or a URL stays rate
//! limited past the retry ceiling.

use crate::http::HttpClient;
use bf_core::FetchConfig;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;

/// Timing knobs for the fetch loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSettings {
    /// Pause after every successful page
    pub page_delay: Duration,
    /// Backoff for a 429 without a usable `Retry-After`
    pub default_retry_after: Duration,
    /// Consecutive 429s allowed for one URL
    pub max_rate_limit_retries: u32,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self::from(&FetchConfig::default())
    }
}

impl From<&FetchConfig> for FetchSettings {
    fn from(config: &FetchConfig) -> Self {
        Self {
            page_delay: Duration::from_millis(config.page_delay_ms),
            default_retry_after: Duration::from_secs(config.default_retry_after_secs),
            max_rate_limit_retries: config.max_rate_limit_retries,
        }
    }
}

/// How the fetch loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The last page had no `next` link
    Exhausted,
    /// A request failed; records gathered so far are still returned
    Aborted {
        /// HTTP status, when a response was received
        status: Option<u16>,
        reason: String,
    },
}

/// Records accumulated by one walk over the API
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// Every `results` entry, in page order
    pub records: Vec<Value>,
    /// Successful pages
    pub pages: usize,
    /// Requests issued, retries included
    pub requests: usize,
    pub completion: Completion,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    results: Option<Vec<Value>>,
    #[serde(default)]
    next: Option<String>,
}

/// `Authorization` header value for an API key
pub fn authorization_for_key(api_key: &str) -> String {
    format!("key {}", api_key)
}

/// Parse a `Retry-After` value given in whole seconds
pub fn parse_retry_after(value: Option<&str>) -> Option<Duration> {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Fetches every page of a paginated resource
pub struct PaginatedFetcher<C> {
    client: C,
    settings: FetchSettings,
}

impl<C: HttpClient> PaginatedFetcher<C> {
    /// Create a fetcher over an HTTP client
    pub fn new(client: C, settings: FetchSettings) -> Self {
        Self { client, settings }
    }

    /// Follow `next` links from `start_url` until the resource is exhausted
    /// or a request fails
    pub async fn fetch_all(&self, start_url: &str, authorization: &str) -> FetchOutcome {
        let mut records: Vec<Value> = Vec::new();
        let mut pages = 0;
        let mut requests = 0;
        let mut next_url = Some(start_url.to_string());
        let mut completion = Completion::Exhausted;
        let mut visited: HashSet<String> = HashSet::new();
        let mut rate_limited: u32 = 0;

        while let Some(url) = next_url.take() {
            requests += 1;
            let response = match self.client.get(&url, authorization).await {
                Ok(response) => response,
                Err(e) => {
                    log::error!("Failed to fetch data: {}", e);
                    completion = Completion::Aborted {
                        status: None,
                        reason: e.to_string(),
                    };
                    break;
                }
            };
            log::debug!("Response status {} for {}", response.status, url);

            match response.status {
                200 => {
                    let page: Page = match serde_json::from_str(&response.body) {
                        Ok(page) => page,
                        Err(e) => {
                            log::error!("Failed to decode page {}: {}", url, e);
                            completion = Completion::Aborted {
                                status: Some(200),
                                reason: format!("invalid JSON body: {}", e),
                            };
                            break;
                        }
                    };
                    pages += 1;
                    rate_limited = 0;
                    if let Some(results) = page.results {
                        records.extend(results);
                    }
                    visited.insert(url);
                    log::info!("Fetched {} records so far...", records.len());
                    match page.next.filter(|n| !n.is_empty()) {
                        Some(next) if visited.contains(&next) => {
                            log::warn!("Pagination loops back to {}; stopping", next);
                            completion = Completion::Aborted {
                                status: Some(200),
                                reason: format!("next link revisits {}", next),
                            };
                            break;
                        }
                        next => next_url = next,
                    }
                    tokio::time::sleep(self.settings.page_delay).await;
                }
                429 if rate_limited >= self.settings.max_rate_limit_retries => {
                    log::error!(
                        "Still rate limited after {} retries of {}; giving up",
                        rate_limited,
                        url
                    );
                    completion = Completion::Aborted {
                        status: Some(429),
                        reason: format!("rate limited after {} retries", rate_limited),
                    };
                    break;
                }
                429 => {
                    rate_limited += 1;
                    let wait = parse_retry_after(response.retry_after.as_deref())
                        .unwrap_or(self.settings.default_retry_after);
                    log::warn!(
                        "Rate limit exceeded! Waiting for {} seconds before retrying...",
                        wait.as_secs()
                    );
                    tokio::time::sleep(wait).await;
                    next_url = Some(url);
                }
                status => {
                    log::error!("Failed to fetch data: {}, {}", status, response.body);
                    completion = Completion::Aborted {
                        status: Some(status),
                        reason: response.body,
                    };
                    break;
                }
            }
        }

        FetchOutcome {
            records,
            pages,
            requests,
            completion,
        }
    }
}

#[cfg(test)]
#[path = "fetch_test.rs"]
mod tests;
