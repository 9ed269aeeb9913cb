//! The routing hook of the dispatch pipeline.

use std::sync::Arc;

use crate::error::DispatchError;
use crate::message::header;
use crate::pipeline::{DispatchPriority, MessageSubscriber, Story, Tracker};
use crate::routing::RouteLocator;

use super::producer::MessageProducer;
use super::resolver::ProducerStrategyResolver;

/// Produces the story message and, when it is handled in process, attaches
/// the route's consumers.
///
/// An asynchronous message gets the route's queue override stamped as its
/// `queue` header before it is produced, so the queue adapter sees it without
/// knowing about routes. Routing errors are returned to the pipeline.
pub struct DispatchSubscriber {
    locator: RouteLocator,
    producer: Arc<dyn MessageProducer>,
    resolver: Arc<dyn ProducerStrategyResolver>,
    priority: i32,
}

impl DispatchSubscriber {
    pub fn new(
        locator: RouteLocator,
        producer: Arc<dyn MessageProducer>,
        resolver: Arc<dyn ProducerStrategyResolver>,
    ) -> Self {
        Self {
            locator,
            producer,
            resolver,
            priority: DispatchPriority::ROUTE,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    fn on_dispatch(&self, story: &mut Story) -> Result<(), DispatchError> {
        let mut message = story.message().clone();

        let is_sync = self.resolver.is_sync(&message)?;

        if !is_sync {
            if let Some(queue) = self.locator.on_queue(&message)? {
                if !queue.is_empty() {
                    message = message.with_header(header::QUEUE, queue.to_value());
                }
            }
        }

        story.with_message(self.producer.produce(message)?);

        if is_sync {
            let consumers = self.locator.route(story.message())?;
            story.with_consumers(consumers);
        }

        Ok(())
    }
}

impl MessageSubscriber for DispatchSubscriber {
    fn attach_to(self: Arc<Self>, tracker: &mut Tracker) {
        let priority = self.priority;
        tracker.on_dispatch(priority, move |story| self.on_dispatch(story));
    }
}
