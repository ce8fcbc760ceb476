//! Route handlers.
//!
//! Thin layer over the store, tracker, and runner: decode, validate, call,
//! encode. Validation failures never reach the background machinery.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use paperwatch_core::{FetchParams, Job, Paper, PaperFilter, PaperPage, StoreStats};

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};

/// Listing page size bounds; requests outside are clamped, not rejected.
const MIN_PAGE_LIMIT: i64 = 1;
const MAX_PAGE_LIMIT: i64 = 100;

// =============================================================================
// GET /
// =============================================================================

#[derive(Serialize)]
pub struct RootResponse {
    pub service: String,
    pub status: String,
    pub version: String,
}

/// Health and identity probe.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        service: "paperwatch".to_string(),
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// GET /api/papers
// =============================================================================

/// Query parameters for the paper listing.
///
/// Dates arrive as strings so malformed values produce the JSON error
/// envelope instead of an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub topic: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Paginated listing with optional topic and date filters.
pub async fn list_papers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<PaperPage>> {
    let filter = PaperFilter {
        topic: query.topic.filter(|t| !t.trim().is_empty()),
        start_date: parse_date(query.start_date.as_deref())?,
        end_date: parse_date(query.end_date.as_deref())?,
        limit: query
            .limit
            .unwrap_or(paperwatch_core::DEFAULT_PAGE_LIMIT)
            .clamp(MIN_PAGE_LIMIT, MAX_PAGE_LIMIT),
        offset: query.offset.unwrap_or(0).max(0),
    };

    let page = state.store.list(&filter).await?;
    Ok(Json(page))
}

fn parse_date(value: Option<&str>) -> ApiResult<Option<NaiveDate>> {
    match value {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                ApiError::InvalidParams(format!("Invalid date '{raw}': expected YYYY-MM-DD"))
            }),
    }
}

// =============================================================================
// GET /api/papers/:id
// =============================================================================

/// Single paper by catalog ID.
pub async fn get_paper(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Paper>> {
    match state.store.get(&id).await? {
        Some(paper) => Ok(Json(paper)),
        None => Err(ApiError::NotFound(format!("Paper not found: {id}"))),
    }
}

// =============================================================================
// GET /api/stats
// =============================================================================

/// Store-wide aggregates.
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<StoreStats>> {
    Ok(Json(state.store.stats().await?))
}

// =============================================================================
// GET /api/categories
// =============================================================================

#[derive(Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// Distinct primary categories, sorted.
pub async fn get_categories(
    State(state): State<AppState>,
) -> ApiResult<Json<CategoriesResponse>> {
    let categories = state.store.categories().await?;
    Ok(Json(CategoriesResponse { categories }))
}

// =============================================================================
// GET /api/jobs/:id
// =============================================================================

/// Full job record by token.
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Job>> {
    match state.runner.tracker().get(&id) {
        Some(job) => Ok(Json(job)),
        None => Err(ApiError::NotFound(format!("Job not found: {id}"))),
    }
}

// =============================================================================
// POST /api/trigger
// =============================================================================

#[derive(Serialize)]
pub struct TriggerResponse {
    pub status: String,
    pub job_id: String,
    pub message: String,
}

/// Validate trigger parameters and launch a background fetch cycle.
pub async fn trigger_fetch(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<Json<TriggerResponse>> {
    let params: FetchParams = serde_json::from_value(body)
        .map_err(|e| ApiError::InvalidParams(format!("Invalid request body: {e}")))?;
    validate_trigger(&params)?;

    let job = state.runner.submit(params.clone());

    let target = params
        .category
        .as_deref()
        .or(params.query.as_deref())
        .unwrap_or_default();
    info!(
        subsystem = "api",
        op = "trigger",
        job_id = %job.id,
        query = target,
        "Fetch job accepted"
    );

    Ok(Json(TriggerResponse {
        status: "accepted".to_string(),
        job_id: job.id,
        message: format!("Fetch job triggered for {target}"),
    }))
}

/// Trigger parameter contract, enforced before any background work:
/// a selection criterion is required, a day count excludes an explicit
/// range, and a range needs both bounds.
fn validate_trigger(params: &FetchParams) -> ApiResult<()> {
    if params.category.is_none() && params.query.is_none() {
        return Err(ApiError::InvalidParams(
            "Either 'category' or 'query' must be provided".to_string(),
        ));
    }
    if params.days.is_some() && (params.start_date.is_some() || params.end_date.is_some()) {
        return Err(ApiError::InvalidParams(
            "'days' cannot be combined with 'start_date'/'end_date'".to_string(),
        ));
    }
    if params.start_date.is_some() != params.end_date.is_some() {
        return Err(ApiError::InvalidParams(
            "'start_date' and 'end_date' must be provided together".to_string(),
        ));
    }
    Ok(())
}
