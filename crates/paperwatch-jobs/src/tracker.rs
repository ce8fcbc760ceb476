//! In-memory job registry.
//!
//! Tracks every fetch job triggered since startup. Backed by a sharded
//! concurrent map: cycles reporting progress on different jobs never
//! contend on a global lock, and one job's read-modify-write runs under
//! its entry guard so an update can never be half-applied.

use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use paperwatch_core::{Job, JobStatus, JobUpdate};

/// Process-lifetime registry of fetch jobs.
///
/// Jobs are never removed; each trigger adds one small record.
#[derive(Default)]
pub struct JobTracker {
    jobs: DashMap<String, Job>,
}

impl JobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new pending job and return its snapshot.
    pub fn create(&self) -> Job {
        let job = Job {
            id: Uuid::new_v4().simple().to_string(),
            status: JobStatus::Pending,
            total: None,
            processed: 0,
            new: 0,
            error: None,
            started_at: Utc::now(),
            finished_at: None,
        };
        self.jobs.insert(job.id.clone(), job.clone());
        debug!(
            subsystem = "jobs",
            component = "tracker",
            job_id = %job.id,
            "Job created"
        );
        job
    }

    /// Snapshot a job by token. Unknown tokens yield `None`.
    pub fn get(&self, id: &str) -> Option<Job> {
        self.jobs.get(id).map(|entry| entry.value().clone())
    }

    /// Apply a partial overlay to a job, returning the updated snapshot.
    ///
    /// Only the fields present in the overlay change. Unknown tokens yield
    /// `None` and apply nothing.
    pub fn update(&self, id: &str, update: JobUpdate) -> Option<Job> {
        let mut entry = self.jobs.get_mut(id)?;
        if let Some(status) = update.status {
            entry.status = status;
        }
        if let Some(total) = update.total {
            entry.total = Some(total);
        }
        if let Some(processed) = update.processed {
            entry.processed = processed;
        }
        if let Some(new) = update.new {
            entry.new = new;
        }
        if let Some(error) = update.error {
            entry.error = Some(error);
        }
        if let Some(finished_at) = update.finished_at {
            entry.finished_at = Some(finished_at);
        }
        Some(entry.value().clone())
    }

    /// Number of jobs tracked since startup.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
