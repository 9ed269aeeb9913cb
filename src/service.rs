//! Service lookup: turning string identifiers into live instances.
//!
//! Routing configuration may name consumers, queue options, decorators and
//! subscribers by identifier. The router resolves them lazily through a
//! [`ServiceResolver`]; [`ServiceContainer`] is the in-memory implementation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use thiserror::Error;

use crate::pipeline::MessageSubscriber;
use crate::producer::{MessageDecorator, MessageProducer};
use crate::queue::QueueConfig;
use crate::routing::{Component, Consumer};

/// A resolved service.
#[derive(Clone)]
pub enum Service {
    /// Directly invokable consumer.
    Consumer(Consumer),
    /// Object that exposes consumer entry points.
    Component(Arc<dyn Component>),
    /// Ready-made queue options.
    Queue(QueueConfig),
    Decorator(Arc<dyn MessageDecorator>),
    Subscriber(Arc<dyn MessageSubscriber>),
    Producer(Arc<dyn MessageProducer>),
}

impl Service {
    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Service::Consumer(_) => "consumer",
            Service::Component(_) => "component",
            Service::Queue(_) => "queue config",
            Service::Decorator(_) => "message decorator",
            Service::Subscriber(_) => "message subscriber",
            Service::Producer(_) => "message producer",
        }
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Queue(queue) => f.debug_tuple("Queue").field(queue).finish(),
            other => write!(f, "Service({})", other.kind()),
        }
    }
}

/// Error raised by a [`ServiceResolver`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("service {0} not found")]
    NotFound(String),
    #[error("service {id} could not be built: {reason}")]
    Unavailable { id: String, reason: String },
}

/// Resolves service identifiers.
pub trait ServiceResolver: Send + Sync {
    fn resolve(&self, id: &str) -> Result<Service, ServiceError>;
}

/// In-memory [`ServiceResolver`].
///
/// ```
/// use routed_rust::service::{Service, ServiceContainer, ServiceResolver};
/// use routed_rust::queue::QueueConfig;
///
/// let container = ServiceContainer::new()
///     .with("queue.transaction", Service::Queue(QueueConfig::new().with_name("transaction")));
///
/// assert!(container.has("queue.transaction"));
/// assert!(container.resolve("queue.unknown").is_err());
/// ```
#[derive(Clone, Default)]
pub struct ServiceContainer {
    services: HashMap<String, Service>,
}

impl ServiceContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a service, builder style.
    pub fn with(mut self, id: impl Into<String>, service: Service) -> Self {
        self.bind(id, service);
        self
    }

    /// Bind a service, replacing any previous binding for `id`.
    pub fn bind(&mut self, id: impl Into<String>, service: Service) {
        self.services.insert(id.into(), service);
    }

    pub fn has(&self, id: &str) -> bool {
        self.services.contains_key(id)
    }

    /// Bound identifiers, unordered.
    pub fn ids(&self) -> Vec<&str> {
        self.services.keys().map(String::as_str).collect()
    }
}

impl ServiceResolver for ServiceContainer {
    fn resolve(&self, id: &str) -> Result<Service, ServiceError> {
        self.services
            .get(id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }
}

/// A reference to a shared instance, either by service identifier or directly.
///
/// Deserializes from a string as [`Binding::Service`].
pub enum Binding<T: ?Sized> {
    Service(String),
    Instance(Arc<T>),
}

impl<T: ?Sized> Binding<T> {
    pub fn service(id: impl Into<String>) -> Self {
        Binding::Service(id.into())
    }

    pub fn instance(instance: Arc<T>) -> Self {
        Binding::Instance(instance)
    }

    /// The service identifier, if bound by id.
    pub fn id(&self) -> Option<&str> {
        match self {
            Binding::Service(id) => Some(id),
            Binding::Instance(_) => None,
        }
    }
}

impl<T: ?Sized> Clone for Binding<T> {
    fn clone(&self) -> Self {
        match self {
            Binding::Service(id) => Binding::Service(id.clone()),
            Binding::Instance(instance) => Binding::Instance(Arc::clone(instance)),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Service(id) => f.debug_tuple("Service").field(id).finish(),
            Binding::Instance(_) => f.write_str("Instance(..)"),
        }
    }
}

impl<T: ?Sized> From<&str> for Binding<T> {
    fn from(id: &str) -> Self {
        Binding::Service(id.to_string())
    }
}

impl<T: ?Sized> From<String> for Binding<T> {
    fn from(id: String) -> Self {
        Binding::Service(id)
    }
}

impl<'de, T: ?Sized> Deserialize<'de> for Binding<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(IdVisitor).map(Binding::Service)
    }
}

/// Visitor accepting a service identifier string.
pub(crate) struct IdVisitor;

impl<'de> Visitor<'de> for IdVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a service identifier")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(v)
    }
}
