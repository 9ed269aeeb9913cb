//! Job record and transport traits.

use std::error::Error;
use std::sync::Arc;

use thiserror::Error;

/// A serialized message handed to a queue backend.
#[derive(Clone, Debug, PartialEq)]
pub struct Job {
    /// Unique identifier for this job
    pub id: String,
    /// Human readable name, the message type
    pub display_name: String,
    /// Target queue name, `None` for the backend default queue
    pub queue: Option<String>,
    /// Serialized job payload (JSON)
    pub payload: Vec<u8>,
}

impl Job {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            queue: None,
            payload,
        }
    }

    /// Target a named queue.
    pub fn on_queue(mut self, queue: impl Into<String>) -> Self {
        self.queue = Some(queue.into());
        self
    }

    /// Get the payload as a string (if valid UTF-8).
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}

/// Error type for queue backend operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection to the backend failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    /// The job could not be serialized
    #[error("serialization failed: {0}")]
    SerializationFailed(String),
    /// The backend rejected the job
    #[error("job rejected: {0}")]
    Rejected(String),
    /// A shared lock was poisoned by a panicking thread
    #[error("transport lock poisoned")]
    LockPoisoned,
    /// Other error
    #[error("transport error: {0}")]
    Other(Box<dyn Error + Send + Sync>),
}

/// Write side of a queue backend.
pub trait JobSink: Send + Sync {
    /// Persist a job for out-of-process delivery.
    fn push(&self, job: Job) -> Result<(), TransportError>;

    /// Persist several jobs. Default implementation pushes them one by one.
    fn push_batch(&self, jobs: Vec<Job>) -> Result<(), TransportError> {
        for job in jobs {
            self.push(job)?;
        }
        Ok(())
    }
}

impl<T: JobSink + ?Sized> JobSink for Arc<T> {
    fn push(&self, job: Job) -> Result<(), TransportError> {
        (**self).push(job)
    }

    fn push_batch(&self, jobs: Vec<Job>) -> Result<(), TransportError> {
        (**self).push_batch(jobs)
    }
}

/// Read side of a queue backend.
///
/// Pull based: workers poll for the next job and acknowledge or reject it.
pub trait JobSource: Send + Sync {
    /// Poll for the next job, blocking until one is available or timeout.
    fn poll(&self, timeout_ms: u64) -> Result<Option<Job>, TransportError>;

    /// Acknowledge that a job has been handled.
    fn ack(&self, job_id: &str) -> Result<(), TransportError>;

    /// Reject a job. Redelivery policy belongs to the backend.
    fn nack(&self, job_id: &str, reason: &str) -> Result<(), TransportError>;
}
