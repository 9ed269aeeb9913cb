//! Message producers.

use std::sync::Arc;

use crate::error::DispatchError;
use crate::message::{header, Envelope};
use crate::queue::MessageQueue;

use super::resolver::ProducerStrategyResolver;

/// Drives one dispatch of a message.
pub trait MessageProducer: Send + Sync {
    /// Mark the message dispatched and queue it when it is asynchronous.
    ///
    /// Returns the stamped message on both paths.
    fn produce(&self, message: Envelope) -> Result<Envelope, DispatchError>;
}

/// [`MessageProducer`] that enqueues asynchronous messages on a [`MessageQueue`].
///
/// `__event_dispatched = true` is stamped before the message reaches the
/// queue, so a redelivered message resolves as synchronous.
#[derive(Clone)]
pub struct QueueProducer {
    resolver: Arc<dyn ProducerStrategyResolver>,
    queue: Option<Arc<dyn MessageQueue>>,
}

impl QueueProducer {
    pub fn new(
        resolver: Arc<dyn ProducerStrategyResolver>,
        queue: Option<Arc<dyn MessageQueue>>,
    ) -> Self {
        Self { resolver, queue }
    }

    /// A producer that can only handle synchronous messages.
    pub fn sync_only(resolver: Arc<dyn ProducerStrategyResolver>) -> Self {
        Self::new(resolver, None)
    }
}

impl MessageProducer for QueueProducer {
    fn produce(&self, message: Envelope) -> Result<Envelope, DispatchError> {
        let is_sync = self.resolver.is_sync(&message)?;

        let message = message.with_header(header::EVENT_DISPATCHED, true);

        if !is_sync {
            let queue = self.queue.as_ref().ok_or_else(|| {
                let message_type = message.message_type().unwrap_or_default();
                DispatchError::QueueUnavailable(message_type.to_string())
            })?;
            queue.enqueue(message.clone())?;
        }

        Ok(message)
    }
}
