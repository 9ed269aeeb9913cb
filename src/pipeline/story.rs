use serde_json::Value;

use crate::message::Envelope;
use crate::routing::Consumer;

/// Per-dispatch context shared by the dispatch hooks.
///
/// Hooks may replace the message and attach consumers. The consumers run in
/// the hook at [`DispatchPriority::INVOKE_HANDLER`], which records their
/// results.
///
/// [`DispatchPriority::INVOKE_HANDLER`]: super::DispatchPriority::INVOKE_HANDLER
#[derive(Debug, Clone)]
pub struct Story {
    message: Envelope,
    consumers: Vec<Consumer>,
    results: Vec<Value>,
}

impl Story {
    pub fn new(message: Envelope) -> Self {
        Self {
            message,
            consumers: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn message(&self) -> &Envelope {
        &self.message
    }

    pub fn with_message(&mut self, message: Envelope) {
        self.message = message;
    }

    pub fn consumers(&self) -> &[Consumer] {
        &self.consumers
    }

    /// Replace the attached consumers.
    pub fn with_consumers(&mut self, consumers: Vec<Consumer>) {
        self.consumers = consumers;
    }

    /// Values returned by the consumers that already ran.
    pub fn results(&self) -> &[Value] {
        &self.results
    }

    pub fn with_results(&mut self, results: Vec<Value>) {
        self.results = results;
    }

    pub fn into_message(self) -> Envelope {
        self.message
    }

    pub fn into_dispatched(self) -> Dispatched {
        Dispatched {
            message: self.message,
            results: self.results,
        }
    }
}

/// Outcome of a reporter dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    /// The message as it left the pipeline.
    pub message: Envelope,
    /// One value per consumer that ran, in order. Empty when the message was queued.
    pub results: Vec<Value>,
}
