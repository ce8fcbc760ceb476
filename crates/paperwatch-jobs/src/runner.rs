//! Background execution of fetch jobs.

use std::sync::Arc;

use tracing::{error, info};

use paperwatch_core::{FetchParams, Job};

use crate::pipeline::ReconcileLoop;
use crate::tracker::JobTracker;

/// Spawns cycles onto the runtime and hands back the pending job.
///
/// The cycle runs detached. Its outcome lands on the tracker (the pipeline
/// owns that bookkeeping), so the join handle is dropped and a loop error
/// is only logged here.
#[derive(Clone)]
pub struct JobRunner {
    pipeline: Arc<ReconcileLoop>,
}

impl JobRunner {
    pub fn new(pipeline: Arc<ReconcileLoop>) -> Self {
        Self { pipeline }
    }

    /// The tracker shared with the pipeline.
    pub fn tracker(&self) -> &Arc<JobTracker> {
        self.pipeline.tracker()
    }

    /// Register a pending job and launch its cycle in the background.
    pub fn submit(&self, params: FetchParams) -> Job {
        let job = self.pipeline.tracker().create();
        let pipeline = Arc::clone(&self.pipeline);
        let job_id = job.id.clone();

        tokio::spawn(async move {
            info!(
                subsystem = "jobs",
                component = "runner",
                job_id = %job_id,
                "Fetch job started"
            );
            if let Err(e) = pipeline.run_cycle(&params, Some(&job_id)).await {
                error!(
                    subsystem = "jobs",
                    component = "runner",
                    job_id = %job_id,
                    error = %e,
                    "Fetch job failed"
                );
            }
        });

        job
    }
}
