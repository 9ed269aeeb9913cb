use std::sync::Arc;

use tracing::debug;

use crate::error::ConfigError;
use crate::message::AsyncMarker;
use crate::producer::{
    DispatchSubscriber, LogicalResolver, MessageDecorator, MessageProducer, ProducerDecorator,
    ProducerStrategyResolver, QueueProducer,
};
use crate::queue::{JobQueue, MessageQueue, QueueConfig};
use crate::routing::{Group, RouteLocator, Router};
use crate::service::{Binding, Service, ServiceResolver};
use crate::transport::JobSink;

use super::reporter::Reporter;
use super::tracker::{MessageSubscriber, Tracker};

/// Builds the reporter of a registered group.
///
/// The pipeline is, in order: the producer decorator for the group strategy,
/// the configured decorators, the [`DispatchSubscriber`] and the configured
/// subscribers. The producer is the `producer_service` of the group when set,
/// otherwise a [`QueueProducer`] over a [`JobQueue`] on the factory sink whose
/// defaults are the factory defaults merged with the group queue options.
pub struct ReporterFactory {
    resolver: Arc<dyn ServiceResolver>,
    marker: Arc<dyn AsyncMarker>,
    sink: Option<Arc<dyn JobSink>>,
    defaults: QueueConfig,
}

impl ReporterFactory {
    pub fn new(resolver: Arc<dyn ServiceResolver>, marker: Arc<dyn AsyncMarker>) -> Self {
        Self {
            resolver,
            marker,
            sink: None,
            defaults: QueueConfig::default(),
        }
    }

    /// Queue backend for async messages.
    pub fn with_sink(mut self, sink: Arc<dyn JobSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Global queue options, overridden by group options.
    pub fn with_queue_defaults(mut self, defaults: QueueConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Reporter for every registered group.
    pub fn build_all(&self, router: &Router) -> Result<Vec<Reporter>, ConfigError> {
        router.groups().map(|group| self.build(group)).collect()
    }

    pub fn build(&self, group: &Group) -> Result<Reporter, ConfigError> {
        let config = group.config();
        let strategy = config.producer_strategy()?;

        let id = config
            .reporter_service_id()
            .map(str::to_string)
            .unwrap_or_else(|| format!("reporter.{}.{}", group.domain_type(), group.name()));

        let resolver: Arc<dyn ProducerStrategyResolver> =
            Arc::new(LogicalResolver::new(Arc::clone(&self.marker)));
        let producer = self.producer(group, Arc::clone(&resolver))?;
        let locator = RouteLocator::new(Arc::new(group.clone()), Arc::clone(&self.resolver));

        let mut tracker = Tracker::new();
        Arc::new(DispatchSubscriber::new(locator, producer, resolver)).attach_to(&mut tracker);
        for binding in config.message_subscribers() {
            self.subscriber(binding)?.attach_to(&mut tracker);
        }

        let mut reporter =
            Reporter::new(id, tracker).with_decorator(Arc::new(ProducerDecorator::new(strategy)));
        for binding in config.message_decorators() {
            reporter = reporter.with_decorator(self.decorator(binding)?);
        }

        debug!(
            reporter = reporter.id(),
            strategy = strategy.as_str(),
            routes = group.routes().len(),
            "reporter built"
        );

        Ok(reporter)
    }

    fn producer(
        &self,
        group: &Group,
        resolver: Arc<dyn ProducerStrategyResolver>,
    ) -> Result<Arc<dyn MessageProducer>, ConfigError> {
        if let Some(id) = group.config().producer_service_id() {
            return match self.resolver.resolve(id)? {
                Service::Producer(producer) => Ok(producer),
                _ => Err(unexpected(id, "message producer")),
            };
        }

        let queue = self.sink.as_ref().map(|sink| {
            let defaults = match group.config().queue() {
                Some(group_queue) => self.defaults.merge(group_queue),
                None => self.defaults.clone(),
            };
            let queue = JobQueue::new(Arc::clone(sink)).with_defaults(defaults);
            Arc::new(queue) as Arc<dyn MessageQueue>
        });

        Ok(Arc::new(QueueProducer::new(resolver, queue)))
    }

    fn decorator(
        &self,
        binding: &Binding<dyn MessageDecorator>,
    ) -> Result<Arc<dyn MessageDecorator>, ConfigError> {
        match binding {
            Binding::Instance(decorator) => Ok(Arc::clone(decorator)),
            Binding::Service(id) => match self.resolver.resolve(id)? {
                Service::Decorator(decorator) => Ok(decorator),
                _ => Err(unexpected(id, "message decorator")),
            },
        }
    }

    fn subscriber(
        &self,
        binding: &Binding<dyn MessageSubscriber>,
    ) -> Result<Arc<dyn MessageSubscriber>, ConfigError> {
        match binding {
            Binding::Instance(subscriber) => Ok(Arc::clone(subscriber)),
            Binding::Service(id) => match self.resolver.resolve(id)? {
                Service::Subscriber(subscriber) => Ok(subscriber),
                _ => Err(unexpected(id, "message subscriber")),
            },
        }
    }
}

fn unexpected(id: &str, expected: &'static str) -> ConfigError {
    ConfigError::UnexpectedService {
        id: id.to_string(),
        expected,
    }
}
