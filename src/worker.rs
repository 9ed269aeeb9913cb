//! Worker that relays queued jobs back into their reporters.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::DispatchError;
use crate::pipeline::{Dispatched, Reporter};
use crate::queue::MessageJob;
use crate::transport::{Job, JobSource, TransportError};

/// Result of a drain operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    pub polled: usize,
    pub handled: usize,
    pub failed: usize,
}

/// Pulls jobs from a [`JobSource`] and relays each one to the reporter named
/// by its `__reporter_id` header.
///
/// Successful jobs are acknowledged, failed ones rejected with the error
/// message. Retry and dead-lettering belong to the backend.
pub struct JobWorker {
    reporters: HashMap<String, Arc<Reporter>>,
    poll_timeout_ms: u64,
    batch_size: usize,
}

impl Default for JobWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl JobWorker {
    pub fn new() -> Self {
        Self {
            reporters: HashMap::new(),
            poll_timeout_ms: 0,
            batch_size: 100,
        }
    }

    /// Register a reporter under its id.
    pub fn with_reporter(mut self, reporter: Arc<Reporter>) -> Self {
        self.reporters.insert(reporter.id().to_string(), reporter);
        self
    }

    /// How long a single poll waits for a job.
    pub fn with_poll_timeout(mut self, timeout_ms: u64) -> Self {
        self.poll_timeout_ms = timeout_ms;
        self
    }

    /// Max jobs handled per drain.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn reporter(&self, id: &str) -> Option<&Arc<Reporter>> {
        self.reporters.get(id)
    }

    /// Decode a job and relay it.
    pub fn process(&self, job: &Job) -> Result<Dispatched, DispatchError> {
        let message_job = MessageJob::from_job(job)?;

        let reporter_id = message_job
            .reporter_id()
            .ok_or_else(|| {
                DispatchError::InvalidJob(format!("job {} has no reporter id", job.id))
            })?;

        let reporter = self.reporters.get(reporter_id).ok_or_else(|| {
            DispatchError::InvalidJob(format!("no reporter registered with id {reporter_id}"))
        })?;

        reporter.relay(message_job)
    }

    /// Handle jobs until the source is empty or the batch size is reached.
    ///
    /// A failed ack or nack is logged and the drain goes on; redelivery of
    /// that job is up to the backend. Only poll failures end the drain early.
    pub fn drain<S: JobSource + ?Sized>(&self, source: &S) -> Result<WorkerStats, TransportError> {
        let mut stats = WorkerStats::default();

        while stats.polled < self.batch_size {
            let Some(job) = source.poll(self.poll_timeout_ms)? else {
                break;
            };
            stats.polled += 1;

            match self.process(&job) {
                Ok(_) => {
                    stats.handled += 1;
                    if let Err(err) = source.ack(&job.id) {
                        warn!(job_id = %job.id, error = %err, "job handled but not acknowledged");
                    }
                }
                Err(err) => {
                    warn!(
                        job_id = %job.id,
                        message_type = %job.display_name,
                        error = %err,
                        "job failed"
                    );
                    stats.failed += 1;
                    if let Err(nack_err) = source.nack(&job.id, &err.to_string()) {
                        warn!(job_id = %job.id, error = %nack_err, "job failed but not rejected");
                    }
                }
            }
        }

        debug!(
            polled = stats.polled,
            handled = stats.handled,
            failed = stats.failed,
            "worker drained"
        );

        Ok(stats)
    }
}
