//! HTTP transport used by the paginated fetcher

use crate::error::{IngestError, IngestResult};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION, RETRY_AFTER};
use std::time::Duration;

/// The parts of a response the fetcher looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw `Retry-After` header, if sent
    pub retry_after: Option<String>,
    /// Response body
    pub body: String,
}

impl HttpResponse {
    /// A 200 response with a body
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            retry_after: None,
            body: body.into(),
        }
    }
}

/// Issues authenticated GET requests
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET `url` with the given `Authorization` header value
    async fn get(&self, url: &str, authorization: &str) -> IngestResult<HttpResponse>;
}

/// `reqwest`-backed client
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Build a client with a per-request timeout
    pub fn new(timeout: Duration) -> IngestResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("brickflow/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| IngestError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str, authorization: &str) -> IngestResult<HttpResponse> {
        let auth = HeaderValue::from_str(authorization)
            .map_err(|e| IngestError::InvalidHeader(e.to_string()))?;
        let transport = |e: reqwest::Error| IngestError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, auth)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.map_err(transport)?;

        Ok(HttpResponse {
            status,
            retry_after,
            body,
        })
    }
}
