//! bf-ingest - Ingestion for Brickflow
//!
//! Two producers fill the staging area: the paginated API fetcher (minifig
//! records) and the relational extractor (one artifact per categorized
//! source table). They share no state and can run concurrently.

pub mod api;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod http;
pub mod records;

pub use api::{ingest_api, ApiIngestReport};
pub use error::{IngestError, IngestResult};
pub use extract::{extract_sql, extract_tables, ExtractReport, ExtractedTable, FailedTable};
pub use fetch::{Completion, FetchOutcome, FetchSettings, PaginatedFetcher};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use records::records_to_table;
