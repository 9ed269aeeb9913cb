//! Queue adapter: turns async messages into jobs on a queue backend.

use tracing::info;

use crate::error::DispatchError;
use crate::message::{header, Envelope};
use crate::transport::JobSink;

use super::config::QueueConfig;
use super::job::MessageJob;

/// Hands a dispatched message over for out-of-process handling.
///
/// Implementations must keep every header, in particular `queue`,
/// `__event_dispatched` and `__event_strategy`, so the message resolves as
/// synchronous when it is relayed back into the pipeline.
pub trait MessageQueue: Send + Sync {
    fn enqueue(&self, message: Envelope) -> Result<(), DispatchError>;
}

/// [`MessageQueue`] backed by a [`JobSink`].
///
/// Queue options resolve field by field: the adapter defaults (global options
/// merged with the group options) first, then whatever the message carries in
/// its `queue` header (the route override) on top.
///
/// ```
/// use routed_rust::queue::{JobQueue, MessageQueue, QueueConfig};
/// use routed_rust::message::Envelope;
/// use routed_rust::transport::InMemoryTransport;
/// use serde_json::json;
///
/// let transport = InMemoryTransport::new();
/// let queue = JobQueue::new(transport.clone())
///     .with_defaults(QueueConfig::new().with_name("default"));
///
/// queue.enqueue(Envelope::for_type("Withdraw", json!({}))).unwrap();
/// assert_eq!(transport.jobs_on("default").len(), 1);
/// ```
pub struct JobQueue<S: JobSink> {
    sink: S,
    defaults: QueueConfig,
}

impl<S: JobSink> JobQueue<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            defaults: QueueConfig::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: QueueConfig) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> &QueueConfig {
        &self.defaults
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Effective queue options for `message`.
    pub fn options_for(&self, message: &Envelope) -> Result<QueueConfig, DispatchError> {
        match message.header(header::QUEUE) {
            Some(value) => {
                let route = QueueConfig::from_value(value)
                    .map_err(|e| DispatchError::InvalidJob(e.to_string()))?;
                Ok(self.defaults.merge(&route))
            }
            None => Ok(self.defaults.clone()),
        }
    }
}

impl<S: JobSink> MessageQueue for JobQueue<S> {
    fn enqueue(&self, message: Envelope) -> Result<(), DispatchError> {
        let options = self.options_for(&message)?;

        let message = if options.is_empty() {
            message.without_header(header::QUEUE)
        } else {
            message.with_header(header::QUEUE, options.to_value())
        };

        let job = MessageJob::new(message)?.to_job()?;

        info!(
            job_id = %job.id,
            message_type = %job.display_name,
            queue = job.queue.as_deref().unwrap_or("default"),
            "enqueue message"
        );

        self.sink.push(job)?;
        Ok(())
    }
}
