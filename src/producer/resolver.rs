//! The sync / async decision.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::DispatchError;
use crate::message::{header, AsyncMarker, Envelope};
use crate::strategy::ProducerStrategy;

/// Decides whether a message is handled in process right now.
pub trait ProducerStrategyResolver: Send + Sync {
    /// `true` for synchronous handling, `false` when the message must be queued.
    fn is_sync(&self, message: &Envelope) -> Result<bool, DispatchError>;
}

/// Header-driven [`ProducerStrategyResolver`].
///
/// Reads `__event_dispatched` and `__event_strategy`, both required, then:
///
/// 1. an already dispatched message is synchronous (redelivery is never requeued);
/// 2. the `sync` strategy is synchronous;
/// 3. `per_message` is synchronous unless the message type is async-only;
/// 4. anything else is asynchronous.
#[derive(Clone)]
pub struct LogicalResolver {
    marker: Arc<dyn AsyncMarker>,
}

impl LogicalResolver {
    pub fn new(marker: Arc<dyn AsyncMarker>) -> Self {
        Self { marker }
    }
}

impl ProducerStrategyResolver for LogicalResolver {
    fn is_sync(&self, message: &Envelope) -> Result<bool, DispatchError> {
        let dispatched = dispatched_header(message)?;
        let strategy = strategy_header(message)?;

        let is_sync = dispatched
            || match strategy {
                ProducerStrategy::Sync => true,
                ProducerStrategy::PerMessage => !message
                    .message_type()
                    .is_some_and(|message_type| self.marker.is_async_only(message_type)),
                ProducerStrategy::Async => false,
            };

        debug!(
            message_type = message.message_type().unwrap_or_default(),
            dispatched,
            strategy = strategy.as_str(),
            is_sync,
            "producer strategy resolved"
        );

        Ok(is_sync)
    }
}

fn dispatched_header(message: &Envelope) -> Result<bool, DispatchError> {
    message
        .header(header::EVENT_DISPATCHED)
        .and_then(Value::as_bool)
        .ok_or(DispatchError::InvalidDispatchHeader {
            header: header::EVENT_DISPATCHED,
            expected: "a boolean",
        })
}

fn strategy_header(message: &Envelope) -> Result<ProducerStrategy, DispatchError> {
    message
        .header(header::EVENT_STRATEGY)
        .and_then(Value::as_str)
        .and_then(|strategy| strategy.parse().ok())
        .ok_or(DispatchError::InvalidDispatchHeader {
            header: header::EVENT_STRATEGY,
            expected: "one of sync, async, per_message",
        })
}
