//! Groups: a route table plus the group-wide configuration.

use std::sync::Arc;

use crate::error::ConfigError;
use crate::message::MessageCatalog;
use crate::pipeline::MessageSubscriber;
use crate::producer::MessageDecorator;
use crate::queue::QueueConfig;
use crate::service::Binding;
use crate::strategy::ProducerStrategy;

use super::route::RouteTable;

/// Group-wide settings, accumulated by one or more configuration passes.
///
/// Scalar settings are replaced by later calls; decorator and subscriber
/// lists only grow. The producer strategy has no default: reading it before
/// it was configured is an error.
#[derive(Debug, Clone, Default)]
pub struct GroupConfig {
    reporter_service_id: Option<String>,
    reporter_concrete: Option<String>,
    tracker_id: Option<String>,
    consumer_method_name: Option<String>,
    producer_strategy: Option<ProducerStrategy>,
    producer_service_id: Option<String>,
    queue: Option<QueueConfig>,
    message_decorators: Vec<Binding<dyn MessageDecorator>>,
    message_subscribers: Vec<Binding<dyn MessageSubscriber>>,
}

impl GroupConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier the group's reporter is registered under.
    pub fn reporter_service_id(&self) -> Option<&str> {
        self.reporter_service_id.as_deref()
    }

    pub fn with_reporter_service_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.reporter_service_id = Some(id.into());
        self
    }

    /// Reporter implementation used when no service id is set.
    pub fn reporter_concrete(&self) -> Option<&str> {
        self.reporter_concrete.as_deref()
    }

    pub fn with_reporter_concrete(&mut self, concrete: impl Into<String>) -> &mut Self {
        self.reporter_concrete = Some(concrete.into());
        self
    }

    pub fn tracker_id(&self) -> Option<&str> {
        self.tracker_id.as_deref()
    }

    pub fn with_tracker_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.tracker_id = Some(id.into());
        self
    }

    /// Method bound on component consumers that are not directly invokable.
    pub fn consumer_method_name(&self) -> Option<&str> {
        self.consumer_method_name.as_deref()
    }

    pub fn with_consumer_method_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.consumer_method_name = Some(name.into());
        self
    }

    pub fn producer_strategy(&self) -> Result<ProducerStrategy, ConfigError> {
        self.producer_strategy.ok_or(ConfigError::StrategyNotSet)
    }

    /// Set the strategy from its string form.
    pub fn with_producer_strategy(&mut self, strategy: &str) -> Result<&mut Self, ConfigError> {
        self.producer_strategy = Some(strategy.parse()?);
        Ok(self)
    }

    pub fn with_strategy(&mut self, strategy: ProducerStrategy) -> &mut Self {
        self.producer_strategy = Some(strategy);
        self
    }

    pub fn producer_service_id(&self) -> Option<&str> {
        self.producer_service_id.as_deref()
    }

    pub fn with_producer_service_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.producer_service_id = Some(id.into());
        self
    }

    /// Group-level queue options.
    pub fn queue(&self) -> Option<&QueueConfig> {
        self.queue.as_ref()
    }

    pub fn with_queue(&mut self, queue: QueueConfig) -> &mut Self {
        self.queue = Some(queue);
        self
    }

    pub fn message_decorators(&self) -> &[Binding<dyn MessageDecorator>] {
        &self.message_decorators
    }

    pub fn with_message_decorators<I>(&mut self, decorators: I) -> &mut Self
    where
        I: IntoIterator<Item = Binding<dyn MessageDecorator>>,
    {
        self.message_decorators.extend(decorators);
        self
    }

    pub fn message_subscribers(&self) -> &[Binding<dyn MessageSubscriber>] {
        &self.message_subscribers
    }

    pub fn with_message_subscribers<I>(&mut self, subscribers: I) -> &mut Self
    where
        I: IntoIterator<Item = Binding<dyn MessageSubscriber>>,
    {
        self.message_subscribers.extend(subscribers);
        self
    }
}

/// Routes and configuration of one `(domain_type, name)` pair, e.g.
/// `("command", "default")`.
#[derive(Debug, Clone)]
pub struct Group {
    domain_type: String,
    name: String,
    routes: RouteTable,
    config: GroupConfig,
}

impl Group {
    pub fn new(
        domain_type: impl Into<String>,
        name: impl Into<String>,
        catalog: Arc<MessageCatalog>,
    ) -> Self {
        Self {
            domain_type: domain_type.into(),
            name: name.into(),
            routes: RouteTable::new(catalog),
            config: GroupConfig::new(),
        }
    }

    pub fn domain_type(&self) -> &str {
        &self.domain_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn routes_mut(&mut self) -> &mut RouteTable {
        &mut self.routes
    }

    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut GroupConfig {
        &mut self.config
    }
}
