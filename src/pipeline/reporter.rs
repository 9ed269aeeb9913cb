use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DispatchError;
use crate::message::{header, Envelope};
use crate::producer::MessageDecorator;
use crate::queue::MessageJob;

use super::story::{Dispatched, Story};
use super::tracker::{DispatchPriority, Tracker};

/// Entry point of a dispatch pipeline.
///
/// A dispatch stamps the reporter id and an event id, runs the decorators in
/// order, fires the tracker and finally invokes the consumers the hooks
/// attached to the story.
pub struct Reporter {
    id: String,
    decorators: Vec<Arc<dyn MessageDecorator>>,
    tracker: Tracker,
}

impl Reporter {
    /// Create a reporter over `tracker`. Consumers attached to the story are
    /// invoked by a hook at [`DispatchPriority::INVOKE_HANDLER`], so hooks with
    /// a lower priority see their results.
    pub fn new(id: impl Into<String>, mut tracker: Tracker) -> Self {
        tracker.on_dispatch(DispatchPriority::INVOKE_HANDLER, invoke_consumers);

        Self {
            id: id.into(),
            decorators: Vec::new(),
            tracker,
        }
    }

    /// Append a decorator. Decorators run in the order they were added.
    pub fn with_decorator(mut self, decorator: Arc<dyn MessageDecorator>) -> Self {
        self.decorators.push(decorator);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn dispatch(&self, mut message: Envelope) -> Result<Dispatched, DispatchError> {
        if message.has_not(header::REPORTER_ID) {
            message = message.with_header(header::REPORTER_ID, self.id.as_str());
        }
        if message.has_not(header::EVENT_ID) {
            message = message.with_header(header::EVENT_ID, Uuid::new_v4().to_string());
        }

        let message = self
            .decorators
            .iter()
            .fold(message, |message, decorator| decorator.decorate(message));

        let mut story = Story::new(message);
        self.tracker.dispatch(&mut story)?;

        debug!(
            reporter = %self.id,
            message_type = story.message().message_type().unwrap_or_default(),
            consumers = story.results().len(),
            "message dispatched"
        );

        Ok(story.into_dispatched())
    }

    /// Dispatch a message redelivered by the queue.
    pub fn relay(&self, job: MessageJob) -> Result<Dispatched, DispatchError> {
        info!(
            reporter = %self.id,
            message_type = job.display_name(),
            queue = job.queue().unwrap_or("default"),
            "relay queued message"
        );

        self.dispatch(job.into_payload())
    }
}

fn invoke_consumers(story: &mut Story) -> Result<(), DispatchError> {
    let results = story
        .consumers()
        .iter()
        .map(|consumer| consumer.call(story.message()))
        .collect::<Result<Vec<_>, _>>()?;

    story.with_results(results);
    Ok(())
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("id", &self.id)
            .field("decorators", &self.decorators.len())
            .field("tracker", &self.tracker)
            .finish()
    }
}
