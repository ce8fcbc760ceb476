//! Fetch-reconcile-notify cycle.
//!
//! One cycle fetches candidates from the catalog, classifies each against
//! the store, enriches new records with generated summaries, persists
//! everything, and sends one digest for the new batch. Progress lands in
//! the job tracker after every candidate when a job token is supplied.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, trace, warn};

use paperwatch_core::{
    CycleReport, FetchParams, JobStatus, JobUpdate, Notifier, Paper, PaperSource, Result,
    Summarizer,
};
use paperwatch_db::PaperStore;

use crate::query::build_query;
use crate::tracker::JobTracker;

/// Orchestrator for one reconciliation cycle.
///
/// Owns the store and shares the pluggable collaborators. Cheap to clone
/// behind the `Arc`s; one instance serves the API, the scheduler, and the
/// CLI alike.
pub struct ReconcileLoop {
    store: PaperStore,
    source: Arc<dyn PaperSource>,
    summarizer: Arc<dyn Summarizer>,
    notifier: Arc<dyn Notifier>,
    tracker: Arc<JobTracker>,
}

impl ReconcileLoop {
    pub fn new(
        store: PaperStore,
        source: Arc<dyn PaperSource>,
        summarizer: Arc<dyn Summarizer>,
        notifier: Arc<dyn Notifier>,
        tracker: Arc<JobTracker>,
    ) -> Self {
        Self {
            store,
            source,
            summarizer,
            notifier,
            tracker,
        }
    }

    /// The shared job tracker.
    pub fn tracker(&self) -> &Arc<JobTracker> {
        &self.tracker
    }

    /// The underlying record store.
    pub fn store(&self) -> &PaperStore {
        &self.store
    }

    /// Run one cycle.
    ///
    /// With a job token the cycle is tracked through `running` to
    /// `completed`, or to `failed` with the error message when a store or
    /// source error aborts the batch. The error still propagates to the
    /// caller after the job is marked.
    pub async fn run_cycle(
        &self,
        params: &FetchParams,
        job_id: Option<&str>,
    ) -> Result<CycleReport> {
        if let Some(id) = job_id {
            self.tracker.update(
                id,
                JobUpdate {
                    status: Some(JobStatus::Running),
                    ..JobUpdate::default()
                },
            );
        }

        match self.cycle_body(params, job_id).await {
            Ok(report) => Ok(report),
            Err(e) => {
                if let Some(id) = job_id {
                    self.tracker.update(
                        id,
                        JobUpdate {
                            status: Some(JobStatus::Failed),
                            error: Some(e.to_string()),
                            finished_at: Some(Utc::now()),
                            ..JobUpdate::default()
                        },
                    );
                }
                Err(e)
            }
        }
    }

    async fn cycle_body(
        &self,
        params: &FetchParams,
        job_id: Option<&str>,
    ) -> Result<CycleReport> {
        let start = Instant::now();

        let query = match params.query.as_deref() {
            Some(raw) => raw.to_string(),
            None => build_query(params),
        };

        info!(
            subsystem = "jobs",
            component = "pipeline",
            op = "run_cycle",
            query = %query,
            max_results = params.max_results,
            "Fetching candidates"
        );

        let candidates = self.source.fetch(&query, params.max_results).await?;

        if let Some(id) = job_id {
            self.tracker.update(
                id,
                JobUpdate {
                    total: Some(candidates.len() as u32),
                    ..JobUpdate::default()
                },
            );
        }

        if candidates.is_empty() {
            self.finish_job(job_id, 0, 0);
            info!(
                subsystem = "jobs",
                component = "pipeline",
                op = "run_cycle",
                query = %query,
                duration_ms = start.elapsed().as_millis() as u64,
                "No candidates matched"
            );
            return Ok(CycleReport { processed: 0, new: 0 });
        }

        let mut processed: u32 = 0;
        let mut new_papers: Vec<Paper> = Vec::new();

        for candidate in candidates {
            match self.store.get(&candidate.arxiv_id).await? {
                None => {
                    let record = self.enrich(candidate).await;
                    self.store.save(&record).await?;
                    trace!(
                        subsystem = "jobs",
                        component = "pipeline",
                        paper_id = %record.arxiv_id,
                        "New record persisted"
                    );
                    new_papers.push(record);
                }
                Some(existing) => {
                    // Carry stored enrichment forward so a re-fetch never
                    // erases it.
                    let mut record = candidate
                        .with_enrichment(existing.llm_summary, existing.key_insights);
                    if !record.has_summary() {
                        record = self.backfill(record).await;
                    }
                    self.store.save(&record).await?;
                    trace!(
                        subsystem = "jobs",
                        component = "pipeline",
                        paper_id = %record.arxiv_id,
                        "Existing record refreshed"
                    );
                }
            }

            processed += 1;
            if let Some(id) = job_id {
                self.tracker.update(
                    id,
                    JobUpdate {
                        processed: Some(processed),
                        new: Some(new_papers.len() as u32),
                        ..JobUpdate::default()
                    },
                );
            }
        }

        if !new_papers.is_empty() {
            if let Err(e) = self.notifier.notify(&new_papers).await {
                warn!(
                    subsystem = "jobs",
                    component = "pipeline",
                    error = %e,
                    result_count = new_papers.len(),
                    "Digest delivery failed"
                );
            }
        }

        let report = CycleReport {
            processed,
            new: new_papers.len() as u32,
        };
        self.finish_job(job_id, report.processed, report.new);

        info!(
            subsystem = "jobs",
            component = "pipeline",
            op = "run_cycle",
            processed = report.processed,
            new_count = report.new,
            duration_ms = start.elapsed().as_millis() as u64,
            "Cycle complete"
        );
        Ok(report)
    }

    /// Generate a summary for a new record. A failed call leaves the
    /// record unsummarized rather than aborting the batch.
    async fn enrich(&self, paper: Paper) -> Paper {
        match self.summarizer.summarize(&paper.abstract_text).await {
            Ok(summary) => paper.with_summary(summary),
            Err(e) => {
                warn!(
                    subsystem = "jobs",
                    component = "pipeline",
                    paper_id = %paper.arxiv_id,
                    error = %e,
                    "Summary generation failed, storing without summary"
                );
                paper
            }
        }
    }

    /// One backfill attempt for an existing record whose stored summary is
    /// empty or absent. Failure is non-fatal and leaves the field as-is.
    async fn backfill(&self, paper: Paper) -> Paper {
        match self.summarizer.summarize(&paper.abstract_text).await {
            Ok(summary) => paper.with_summary(summary),
            Err(e) => {
                warn!(
                    subsystem = "jobs",
                    component = "pipeline",
                    paper_id = %paper.arxiv_id,
                    error = %e,
                    "Summary backfill failed"
                );
                paper
            }
        }
    }

    fn finish_job(&self, job_id: Option<&str>, processed: u32, new: u32) {
        if let Some(id) = job_id {
            self.tracker.update(
                id,
                JobUpdate {
                    status: Some(JobStatus::Completed),
                    processed: Some(processed),
                    new: Some(new),
                    finished_at: Some(Utc::now()),
                    ..JobUpdate::default()
                },
            );
        }
    }
}
