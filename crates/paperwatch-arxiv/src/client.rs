//! arXiv export API client.
//!
//! Queries the Atom feed at `/api/query`, maps entries to [`Paper`] records,
//! and skips malformed entries rather than failing a whole batch.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};

use paperwatch_core::{Error, Paper, PaperSource, Result};

/// Default arXiv export endpoint.
pub const DEFAULT_ARXIV_URL: &str = "http://export.arxiv.org/api/query";

/// Timeout for feed requests (seconds).
pub const FETCH_TIMEOUT_SECS: u64 = 30;

/// Retry attempts after the initial request.
const MAX_RETRIES: u32 = 3;

/// Pause between retries; arXiv asks clients to wait 3 seconds.
const RETRY_PAUSE_SECS: u64 = 3;

/// Client for the arXiv export API.
pub struct ArxivClient {
    client: Client,
    base_url: String,
}

impl ArxivClient {
    /// Create a client against the public arXiv endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_ARXIV_URL.to_string())
    }

    /// Create a client against a custom endpoint.
    pub fn with_base_url(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, base_url }
    }

    /// Create from environment variables.
    ///
    /// `ARXIV_BASE_URL` overrides the endpoint; everything else is fixed.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("ARXIV_BASE_URL").unwrap_or_else(|_| DEFAULT_ARXIV_URL.to_string());
        Self::with_base_url(base_url)
    }

    /// Fetch the raw Atom feed for a search expression.
    ///
    /// Retries on 429 and 5xx responses, which arXiv serves under load, with
    /// a fixed pause between attempts. Other non-success statuses fail
    /// immediately.
    async fn fetch_feed(&self, query: &str, max_results: u32) -> Result<String> {
        let params = [
            ("search_query", query.to_string()),
            ("start", "0".to_string()),
            ("max_results", max_results.to_string()),
            ("sortBy", "submittedDate".to_string()),
            ("sortOrder", "descending".to_string()),
        ];

        let mut attempt = 0;
        loop {
            let response = self
                .client
                .get(&self.base_url)
                .query(&params)
                .send()
                .await
                .map_err(|e| Error::Catalog(format!("Request failed: {}", e)))?;

            let status = response.status();
            if status.is_success() {
                return response
                    .text()
                    .await
                    .map_err(|e| Error::Catalog(format!("Failed to read feed body: {}", e)));
            }

            let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if retryable && attempt < MAX_RETRIES {
                attempt += 1;
                warn!(
                    subsystem = "catalog",
                    component = "arxiv",
                    op = "fetch",
                    status = status.as_u16(),
                    attempt,
                    "Catalog request rejected, retrying after pause"
                );
                tokio::time::sleep(Duration::from_secs(RETRY_PAUSE_SECS)).await;
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(Error::Catalog(format!(
                "arXiv returned {}: {}",
                status, body
            )));
        }
    }
}

impl Default for ArxivClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaperSource for ArxivClient {
    async fn fetch(&self, query: &str, max_results: u32) -> Result<Vec<Paper>> {
        let start = Instant::now();
        debug!(
            subsystem = "catalog",
            component = "arxiv",
            op = "fetch",
            query,
            max_results,
            "Fetching catalog feed"
        );

        let xml = self.fetch_feed(query, max_results).await?;
        let papers = parse_feed(&xml)?;

        info!(
            subsystem = "catalog",
            component = "arxiv",
            op = "fetch",
            query,
            result_count = papers.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Catalog fetch complete"
        );
        Ok(papers)
    }
}

// ============================================================================
// Atom feed structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    id: String,
    title: String,
    summary: String,
    published: String,
    updated: String,
    #[serde(rename = "author", default)]
    authors: Vec<AtomAuthor>,
    #[serde(rename = "category", default)]
    categories: Vec<AtomCategory>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    // quick-xml matches qualified names verbatim, so the arxiv: prefix stays.
    #[serde(rename = "arxiv:primary_category", default)]
    primary_category: Option<AtomCategory>,
}

#[derive(Debug, Deserialize)]
struct AtomAuthor {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AtomCategory {
    #[serde(rename = "@term")]
    term: String,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: String,
    #[serde(rename = "@title", default)]
    title: Option<String>,
}

/// Parse an Atom feed document into paper records.
///
/// Malformed entries are skipped with a warning; only an unparseable
/// document is an error.
pub fn parse_feed(xml: &str) -> Result<Vec<Paper>> {
    let feed: AtomFeed = quick_xml::de::from_str(xml)
        .map_err(|e| Error::Catalog(format!("Malformed Atom feed: {}", e)))?;

    let mut papers = Vec::with_capacity(feed.entries.len());
    for entry in feed.entries {
        let entry_id = entry.id.clone();
        match entry_to_paper(entry) {
            Ok(paper) => papers.push(paper),
            Err(reason) => {
                warn!(
                    subsystem = "catalog",
                    component = "arxiv",
                    op = "parse",
                    entry_id = %entry_id,
                    reason = %reason,
                    "Skipping malformed feed entry"
                );
            }
        }
    }
    Ok(papers)
}

/// Map one Atom entry to a paper record, naming the defect on failure.
fn entry_to_paper(entry: AtomEntry) -> std::result::Result<Paper, String> {
    let arxiv_id = arxiv_id_from_url(&entry.id)
        .ok_or_else(|| format!("entry id {:?} has no /abs/ segment", entry.id))?;

    let published = parse_timestamp(&entry.published)
        .ok_or_else(|| format!("unparseable published timestamp {:?}", entry.published))?;
    let updated = parse_timestamp(&entry.updated)
        .ok_or_else(|| format!("unparseable updated timestamp {:?}", entry.updated))?;

    let categories: Vec<String> = entry.categories.iter().map(|c| c.term.clone()).collect();
    let primary_category = entry
        .primary_category
        .map(|c| c.term)
        .or_else(|| categories.first().cloned())
        .ok_or_else(|| "entry has no category".to_string())?;

    let pdf_url = entry
        .links
        .iter()
        .find(|l| l.title.as_deref() == Some("pdf"))
        .map(|l| l.href.clone());

    Ok(Paper {
        arxiv_id,
        title: collapse_whitespace(&entry.title),
        authors: entry.authors.into_iter().map(|a| a.name).collect(),
        abstract_text: collapse_whitespace(&entry.summary),
        published,
        updated,
        primary_category,
        categories,
        pdf_url,
        llm_summary: None,
        key_insights: None,
    })
}

/// Extract the versionless catalog ID from an entry URL such as
/// `http://arxiv.org/abs/2301.00001v2`.
fn arxiv_id_from_url(id_url: &str) -> Option<String> {
    let (_, raw) = id_url.split_once("/abs/")?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Some(strip_version(raw).to_string())
}

/// Drop a trailing `vN` revision marker, leaving old-style slashed IDs and
/// IDs without a marker untouched.
fn strip_version(id: &str) -> &str {
    if let Some(pos) = id.rfind('v') {
        let digits = &id[pos + 1..];
        if pos > 0 && !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            return &id[..pos];
        }
    }
    id
}

/// Feed timestamps are RFC 3339 (`2023-01-15T18:00:00Z`).
fn parse_timestamp(value: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&chrono::Utc))
}

/// Feed titles and abstracts wrap with newline + indent; collapse every
/// whitespace run to a single space.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
