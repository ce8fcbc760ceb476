//! Core data models for paperwatch.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// =============================================================================
// PAPER
// =============================================================================

/// A research-paper record.
///
/// The catalog ID is the only stable identity; every other field may be
/// overwritten on re-ingestion. Treat constructed values as immutable:
/// derive changed copies through the `with_*` methods instead of mutating
/// fields in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    /// Catalog-assigned ID with any version suffix stripped, e.g. "2401.12345".
    pub arxiv_id: String,
    pub title: String,
    /// Author display names, in catalog order.
    pub authors: Vec<String>,
    /// Abstract text. Serialized as `summary` on the wire.
    #[serde(rename = "summary")]
    pub abstract_text: String,
    #[serde(rename = "published_date")]
    pub published: DateTime<Utc>,
    #[serde(rename = "updated_date")]
    pub updated: DateTime<Utc>,
    /// Primary category code, e.g. "cs.AI".
    pub primary_category: String,
    pub categories: Vec<String>,
    pub pdf_url: Option<String>,
    /// Generated summary, if enrichment has run for this record.
    pub llm_summary: Option<String>,
    /// Structured insights blob, provider-defined shape.
    pub key_insights: Option<JsonValue>,
}

impl Paper {
    /// Copy with a generated summary set.
    pub fn with_summary(self, summary: impl Into<String>) -> Self {
        Self {
            llm_summary: Some(summary.into()),
            ..self
        }
    }

    /// Copy with previously stored enrichment fields overlaid.
    ///
    /// Used by the reconciliation loop to carry `llm_summary`/`key_insights`
    /// forward across a re-fetch so a refresh never erases them.
    pub fn with_enrichment(
        self,
        llm_summary: Option<String>,
        key_insights: Option<JsonValue>,
    ) -> Self {
        Self {
            llm_summary,
            key_insights,
            ..self
        }
    }

    /// Whether a non-empty generated summary is present.
    ///
    /// Empty or whitespace-only text counts as absent; it is what the
    /// backfill decision keys on.
    pub fn has_summary(&self) -> bool {
        self.llm_summary
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }

    /// Canonical abstract-page URL for this record.
    pub fn abs_url(&self) -> String {
        format!("https://arxiv.org/abs/{}", self.arxiv_id)
    }
}

// =============================================================================
// JOB TYPES
// =============================================================================

/// Lifecycle state of a fetch job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    /// Completed and failed are terminal; a job reaches one exactly once.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// A tracked asynchronous execution of the reconciliation loop.
///
/// Jobs live for the process lifetime; they are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Opaque token, 32 hex chars.
    #[serde(rename = "job_id")]
    pub id: String,
    pub status: JobStatus,
    /// Candidate count, set once the catalog has answered.
    pub total: Option<u32>,
    pub processed: u32,
    pub new: u32,
    pub error: Option<String>,
    /// Creation time.
    pub started_at: DateTime<Utc>,
    /// Set when the job reaches a terminal state.
    pub finished_at: Option<DateTime<Utc>>,
}

/// Partial field overlay applied to an existing job.
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub total: Option<u32>,
    pub processed: Option<u32>,
    pub new: Option<u32>,
    pub error: Option<String>,
    pub finished_at: Option<DateTime<Utc>>,
}

// =============================================================================
// FETCH PARAMETERS
// =============================================================================

/// Default result cap for a fetch cycle.
pub const DEFAULT_MAX_RESULTS: u32 = 50;

fn default_max_results() -> u32 {
    DEFAULT_MAX_RESULTS
}

/// Selection criterion for a fetch cycle.
///
/// Either a verbatim `query` expression, or a structured combination of
/// category, time window (day count or explicit date range), and topic.
/// Field exclusivity (days vs. date range, range bounds paired) is enforced
/// by the API surface before a cycle starts, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchParams {
    pub query: Option<String>,
    pub category: Option<String>,
    pub days: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub topic: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

impl Default for FetchParams {
    fn default() -> Self {
        Self {
            query: None,
            category: None,
            days: None,
            start_date: None,
            end_date: None,
            topic: None,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Outcome counts of one reconciliation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub processed: u32,
    pub new: u32,
}

// =============================================================================
// STORE QUERY TYPES
// =============================================================================

/// Default page size for listings.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Filter predicate for listing stored papers.
///
/// Date bounds are inclusive and compared by calendar day.
#[derive(Debug, Clone)]
pub struct PaperFilter {
    pub topic: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for PaperFilter {
    fn default() -> Self {
        Self {
            topic: None,
            start_date: None,
            end_date: None,
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

/// One page of a filtered listing, ordered by published timestamp descending.
#[derive(Debug, Clone, Serialize)]
pub struct PaperPage {
    pub items: Vec<Paper>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Aggregate statistics over the record store.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub total: i64,
    /// Most recent record-update timestamp, if any records exist.
    pub last_fetch_time: Option<DateTime<Utc>>,
    /// Record count per primary category.
    pub categories: BTreeMap<String, i64>,
    pub with_summary: i64,
    pub without_summary: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_paper() -> Paper {
        Paper {
            arxiv_id: "2401.12345".to_string(),
            title: "Attention Is Not Enough".to_string(),
            authors: vec!["Ada Lovelace".to_string(), "Alan Turing".to_string()],
            abstract_text: "We study the limits of attention mechanisms.".to_string(),
            published: "2024-01-15T10:30:00Z".parse().unwrap(),
            updated: "2024-01-16T08:00:00Z".parse().unwrap(),
            primary_category: "cs.AI".to_string(),
            categories: vec!["cs.AI".to_string(), "cs.LG".to_string()],
            pdf_url: Some("https://arxiv.org/pdf/2401.12345".to_string()),
            llm_summary: None,
            key_insights: None,
        }
    }

    #[test]
    fn test_with_summary_sets_field_and_preserves_rest() {
        let paper = sample_paper().with_summary("A generated digest.");
        assert_eq!(paper.llm_summary.as_deref(), Some("A generated digest."));
        assert_eq!(paper.arxiv_id, "2401.12345");
        assert_eq!(paper.authors.len(), 2);
    }

    #[test]
    fn test_with_enrichment_overlays_both_fields() {
        let insights = serde_json::json!({"novelty": "high"});
        let enriched = sample_paper()
            .with_summary("will be replaced")
            .with_enrichment(Some("kept summary".to_string()), Some(insights.clone()));

        assert_eq!(enriched.llm_summary.as_deref(), Some("kept summary"));
        assert_eq!(enriched.key_insights, Some(insights));
    }

    #[test]
    fn test_with_enrichment_can_clear_fields() {
        let paper = sample_paper().with_summary("old").with_enrichment(None, None);
        assert!(paper.llm_summary.is_none());
        assert!(paper.key_insights.is_none());
    }

    #[test]
    fn test_has_summary_treats_blank_as_absent() {
        assert!(!sample_paper().has_summary());
        assert!(!sample_paper().with_summary("").has_summary());
        assert!(!sample_paper().with_summary("   \n").has_summary());
        assert!(sample_paper().with_summary("real text").has_summary());
    }

    #[test]
    fn test_paper_wire_field_names() {
        let json = serde_json::to_value(sample_paper()).unwrap();
        assert!(json.get("summary").is_some());
        assert!(json.get("published_date").is_some());
        assert!(json.get("updated_date").is_some());
        assert!(json.get("abstract_text").is_none());
    }

    #[test]
    fn test_abs_url() {
        assert_eq!(
            sample_paper().abs_url(),
            "https://arxiv.org/abs/2401.12345"
        );
    }

    #[test]
    fn test_job_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&JobStatus::Failed).unwrap(),
            "\"failed\""
        );
    }

    #[test]
    fn test_job_status_terminality() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_job_wire_uses_job_id() {
        let job = Job {
            id: "abc123".to_string(),
            status: JobStatus::Pending,
            total: None,
            processed: 0,
            new: 0,
            error: None,
            started_at: Utc::now(),
            finished_at: None,
        };
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["job_id"], "abc123");
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn test_fetch_params_max_results_defaults_on_deserialize() {
        let params: FetchParams = serde_json::from_str(r#"{"category": "cs.AI"}"#).unwrap();
        assert_eq!(params.max_results, DEFAULT_MAX_RESULTS);
        assert_eq!(params.category.as_deref(), Some("cs.AI"));
        assert!(params.query.is_none());
    }

    #[test]
    fn test_fetch_params_explicit_max_results_kept_verbatim() {
        let params: FetchParams =
            serde_json::from_str(r#"{"query": "cat:cs.AI", "max_results": 7}"#).unwrap();
        assert_eq!(params.max_results, 7);
    }

    #[test]
    fn test_fetch_params_parses_dates() {
        let params: FetchParams = serde_json::from_str(
            r#"{"category": "cs.AI", "start_date": "2026-02-01", "end_date": "2026-02-05"}"#,
        )
        .unwrap();
        assert_eq!(
            params.start_date,
            Some(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap())
        );
        assert_eq!(
            params.end_date,
            Some(NaiveDate::from_ymd_opt(2026, 2, 5).unwrap())
        );
    }
}
