//! In-memory queue backend for testing and single-process scenarios.

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use super::job::{Job, JobSink, JobSource, TransportError};

/// In-memory queue backend.
///
/// Features:
/// - Thread-safe (can be shared across threads via `Clone`)
/// - Jobs are stored in an append-only log
/// - Each reader created with `new_reader()` tracks its own position
/// - Acknowledged and rejected job ids are recorded for inspection
///
/// ## Example
///
/// ```
/// use routed_rust::transport::{InMemoryTransport, Job, JobSink, JobSource};
///
/// let transport = InMemoryTransport::new();
/// transport.push(Job::new("job-1", "Withdraw", b"{}".to_vec())).unwrap();
///
/// let job = transport.poll(100).unwrap().unwrap();
/// assert_eq!(job.display_name, "Withdraw");
/// transport.ack(&job.id).unwrap();
/// assert_eq!(transport.acknowledged(), vec!["job-1"]);
/// ```
#[derive(Clone)]
pub struct InMemoryTransport {
    /// Shared job log
    log: Arc<RwLock<Vec<Job>>>,
    /// Per-reader position
    position: Arc<Mutex<usize>>,
    /// Acknowledged job ids
    acked: Arc<Mutex<Vec<String>>>,
    /// Rejected job ids with their reason
    nacked: Arc<Mutex<Vec<(String, String)>>>,
}

impl Default for InMemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self {
            log: Arc::new(RwLock::new(Vec::new())),
            position: Arc::new(Mutex::new(0)),
            acked: Arc::new(Mutex::new(Vec::new())),
            nacked: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a reader sharing the same log with its own position.
    pub fn new_reader(&self) -> Self {
        Self {
            log: Arc::clone(&self.log),
            position: Arc::new(Mutex::new(0)),
            acked: Arc::new(Mutex::new(Vec::new())),
            nacked: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All jobs pushed so far.
    pub fn jobs(&self) -> Vec<Job> {
        self.log
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Jobs targeting the named queue.
    pub fn jobs_on(&self, queue: &str) -> Vec<Job> {
        self.log
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|job| job.queue.as_deref() == Some(queue))
            .cloned()
            .collect()
    }

    /// Display names in push order.
    pub fn display_names(&self) -> Vec<String> {
        self.log
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|job| job.display_name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.log.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn acknowledged(&self) -> Vec<String> {
        self.acked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn rejected(&self) -> Vec<(String, String)> {
        self.nacked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clear all jobs and bookkeeping (useful for test cleanup).
    pub fn clear(&self) {
        self.log
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        *self.position.lock().unwrap_or_else(PoisonError::into_inner) = 0;
        self.acked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.nacked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl JobSink for InMemoryTransport {
    fn push(&self, job: Job) -> Result<(), TransportError> {
        self.log
            .write()
            .map_err(|_| TransportError::LockPoisoned)?
            .push(job);
        Ok(())
    }

    fn push_batch(&self, jobs: Vec<Job>) -> Result<(), TransportError> {
        self.log
            .write()
            .map_err(|_| TransportError::LockPoisoned)?
            .extend(jobs);
        Ok(())
    }
}

impl JobSource for InMemoryTransport {
    fn poll(&self, timeout_ms: u64) -> Result<Option<Job>, TransportError> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);

        loop {
            {
                let log = self.log.read().map_err(|_| TransportError::LockPoisoned)?;
                let mut pos = self
                    .position
                    .lock()
                    .map_err(|_| TransportError::LockPoisoned)?;

                if *pos < log.len() {
                    let job = log[*pos].clone();
                    *pos += 1;
                    return Ok(Some(job));
                }
            }

            if Instant::now() >= deadline {
                return Ok(None);
            }

            std::thread::sleep(Duration::from_millis(1));
        }
    }

    fn ack(&self, job_id: &str) -> Result<(), TransportError> {
        self.acked
            .lock()
            .map_err(|_| TransportError::LockPoisoned)?
            .push(job_id.to_string());
        Ok(())
    }

    fn nack(&self, job_id: &str, reason: &str) -> Result<(), TransportError> {
        self.nacked
            .lock()
            .map_err(|_| TransportError::LockPoisoned)?
            .push((job_id.to_string(), reason.to_string()));
        Ok(())
    }
}
