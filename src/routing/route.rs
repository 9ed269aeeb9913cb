//! Routes and the per-group route table.

use std::sync::Arc;

use tracing::debug;

use crate::error::ConfigError;
use crate::message::MessageCatalog;
use crate::queue::QueueConfig;

use super::consumer::ConsumerBinding;

/// Binding of one message type to its consumers and optional queue override.
#[derive(Debug, Clone)]
pub struct Route {
    message_type: String,
    consumers: Vec<ConsumerBinding>,
    queue: Option<QueueConfig>,
}

impl Route {
    /// Create an empty route. `message_type` must be registered in `catalog`.
    pub fn new(message_type: &str, catalog: &MessageCatalog) -> Result<Self, ConfigError> {
        catalog.validate(message_type)?;

        Ok(Self {
            message_type: message_type.to_string(),
            consumers: Vec::new(),
            queue: None,
        })
    }

    /// Append a consumer. Consumers run in the order they were added.
    pub fn to(&mut self, consumer: impl Into<ConsumerBinding>) -> &mut Self {
        self.consumers.push(consumer.into());
        self
    }

    /// Append several consumers.
    pub fn to_all<I>(&mut self, consumers: I) -> &mut Self
    where
        I: IntoIterator<Item = ConsumerBinding>,
    {
        self.consumers.extend(consumers);
        self
    }

    /// Set the queue override. An empty config means "queue defaults".
    pub fn on_queue(&mut self, queue: QueueConfig) -> &mut Self {
        self.queue = Some(queue);
        self
    }

    pub fn message_type(&self) -> &str {
        &self.message_type
    }

    pub fn consumers(&self) -> &[ConsumerBinding] {
        &self.consumers
    }

    pub fn queue(&self) -> Option<&QueueConfig> {
        self.queue.as_ref()
    }
}

/// The routes of one group, at most one per message type.
#[derive(Debug, Clone)]
pub struct RouteTable {
    catalog: Arc<MessageCatalog>,
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(catalog: Arc<MessageCatalog>) -> Self {
        Self {
            catalog,
            routes: Vec::new(),
        }
    }

    /// Add an empty route for `message_type` and return it for configuration.
    ///
    /// Fails with [`ConfigError::DuplicateRoute`] when the type already has a
    /// route; routes are never merged.
    pub fn add(&mut self, message_type: &str) -> Result<&mut Route, ConfigError> {
        if self.find(message_type).is_some() {
            return Err(ConfigError::DuplicateRoute(message_type.to_string()));
        }

        let route = Route::new(message_type, &self.catalog)?;
        debug!(message_type, "route added");

        self.routes.push(route);
        let last = self.routes.len() - 1;
        Ok(&mut self.routes[last])
    }

    /// Exact match on the message type.
    pub fn find(&self, message_type: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|route| route.message_type == message_type)
    }

    /// Copy of every route, in registration order.
    pub fn all(&self) -> Vec<Route> {
        self.routes.clone()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }
}
