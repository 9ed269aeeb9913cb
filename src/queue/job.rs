//! Queued job carrying a dispatched message.
//!
//! The persisted document has the shape
//!
//! ```json
//! { "payload": { "headers": { "__event_type": "...", "queue": { ... }, "__reporter_id": "..." },
//!                "body": { ... } } }
//! ```
//!
//! The `queue` header is optional; whatever it leaves unset falls back to the
//! job defaults below.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::DispatchError;
use crate::message::{header, Envelope};
use crate::transport::Job;

use super::config::{Delay, QueueConfig};

#[derive(Serialize, Deserialize)]
struct JobDocument {
    payload: Envelope,
}

/// A dispatched message plus the effective queue options used to enqueue it.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageJob {
    payload: Envelope,
    connection: Option<String>,
    queue: Option<String>,
    tries: u32,
    max_exceptions: u32,
    delay: Option<Delay>,
    timeout: u64,
}

impl MessageJob {
    /// Attempts allowed when the `queue` header does not say otherwise.
    pub const DEFAULT_TRIES: u32 = 1;
    /// Unhandled failures allowed before the job is failed.
    pub const DEFAULT_MAX_EXCEPTIONS: u32 = 3;
    /// Seconds the job may run before timing out.
    pub const DEFAULT_TIMEOUT: u64 = 30;

    /// Wrap a message, reading queue options from its `queue` header.
    pub fn new(payload: Envelope) -> Result<Self, DispatchError> {
        let options = match payload.header(header::QUEUE) {
            Some(value) => QueueConfig::from_value(value)
                .map_err(|e| DispatchError::InvalidJob(e.to_string()))?,
            None => QueueConfig::default(),
        };

        Ok(Self {
            connection: options.connection().map(str::to_string),
            queue: options.name().map(str::to_string),
            tries: options.tries().unwrap_or(Self::DEFAULT_TRIES),
            max_exceptions: options
                .max_exceptions()
                .unwrap_or(Self::DEFAULT_MAX_EXCEPTIONS),
            delay: options.delay().cloned(),
            timeout: options.timeout().unwrap_or(Self::DEFAULT_TIMEOUT),
            payload,
        })
    }

    /// Decode a persisted job document.
    pub fn decode(bytes: &[u8]) -> Result<Self, DispatchError> {
        let document: JobDocument = serde_json::from_slice(bytes)?;
        Self::new(document.payload)
    }

    /// Decode the job carried by a transport record.
    pub fn from_job(job: &Job) -> Result<Self, DispatchError> {
        Self::decode(&job.payload)
    }

    /// Serialize to the persisted job document.
    pub fn encode(&self) -> Result<Vec<u8>, DispatchError> {
        let document = JobDocument {
            payload: self.payload.clone(),
        };
        Ok(serde_json::to_vec(&document)?)
    }

    /// Build the transport record. The message id is reused as job id when
    /// present.
    pub fn to_job(&self) -> Result<Job, DispatchError> {
        let id = self
            .payload
            .header(header::EVENT_ID)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let job = Job::new(id, self.display_name(), self.encode()?);
        Ok(match &self.queue {
            Some(queue) => job.on_queue(queue.clone()),
            None => job,
        })
    }

    /// Message type of the queued message.
    pub fn display_name(&self) -> &str {
        self.payload.message_type().unwrap_or_default()
    }

    /// Reporter the message is relayed back to.
    pub fn reporter_id(&self) -> Option<&str> {
        self.payload.header(header::REPORTER_ID).and_then(Value::as_str)
    }

    pub fn payload(&self) -> &Envelope {
        &self.payload
    }

    pub fn into_payload(self) -> Envelope {
        self.payload
    }

    pub fn connection(&self) -> Option<&str> {
        self.connection.as_deref()
    }

    pub fn queue(&self) -> Option<&str> {
        self.queue.as_deref()
    }

    pub fn tries(&self) -> u32 {
        self.tries
    }

    pub fn max_exceptions(&self) -> u32 {
        self.max_exceptions
    }

    pub fn delay(&self) -> Option<&Delay> {
        self.delay.as_ref()
    }

    pub fn timeout(&self) -> u64 {
        self.timeout
    }
}
