//! Message decorators.

use crate::message::{header, Envelope};
use crate::strategy::ProducerStrategy;

/// Derives a new envelope from a message before it enters the dispatch hooks.
pub trait MessageDecorator: Send + Sync {
    fn decorate(&self, message: Envelope) -> Envelope;
}

/// Stamps the producer headers the strategy resolver requires.
///
/// Headers already present on the message are kept, so a redelivered message
/// still carries `__event_dispatched = true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProducerDecorator {
    strategy: ProducerStrategy,
}

impl ProducerDecorator {
    pub fn new(strategy: ProducerStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> ProducerStrategy {
        self.strategy
    }
}

impl MessageDecorator for ProducerDecorator {
    fn decorate(&self, message: Envelope) -> Envelope {
        let mut message = message;

        if message.has_not(header::EVENT_STRATEGY) {
            message = message.with_header(header::EVENT_STRATEGY, self.strategy.as_str());
        }

        if message.has_not(header::EVENT_DISPATCHED) {
            message = message.with_header(header::EVENT_DISPATCHED, false);
        }

        message
    }
}
