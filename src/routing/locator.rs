//! Dispatch-time route lookup and consumer resolution.

use std::sync::Arc;

use tracing::debug;

use crate::error::DispatchError;
use crate::message::{header, Envelope};
use crate::queue::QueueConfig;
use crate::service::{Service, ServiceResolver};

use super::consumer::{Component, Consumer, ConsumerBinding};
use super::group::Group;
use super::route::Route;

/// Resolves the consumers and queue override of a message within one group.
#[derive(Clone)]
pub struct RouteLocator {
    group: Arc<Group>,
    resolver: Arc<dyn ServiceResolver>,
}

impl RouteLocator {
    pub fn new(group: Arc<Group>, resolver: Arc<dyn ServiceResolver>) -> Self {
        Self { group, resolver }
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    /// Invokable consumers for `message`, in route order.
    ///
    /// Callables pass through. Identifiers are resolved through the service
    /// resolver first. A component is used through its entry point when it has
    /// one, otherwise through the group's consumer method name.
    pub fn route(&self, message: &Envelope) -> Result<Vec<Consumer>, DispatchError> {
        let route = self.find(message)?;
        let message_type = route.message_type();

        let consumers = route
            .consumers()
            .iter()
            .map(|binding| self.resolve(message_type, binding))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(message_type, consumers = consumers.len(), "consumers resolved");

        Ok(consumers)
    }

    /// The route's queue override, without resolving any consumer.
    pub fn on_queue(&self, message: &Envelope) -> Result<Option<QueueConfig>, DispatchError> {
        Ok(self.find(message)?.queue().cloned())
    }

    fn find(&self, message: &Envelope) -> Result<&Route, DispatchError> {
        let message_type = message
            .message_type()
            .ok_or(DispatchError::InvalidDispatchHeader {
                header: header::EVENT_TYPE,
                expected: "a string",
            })?;

        self.group
            .routes()
            .find(message_type)
            .ok_or_else(|| DispatchError::RouteNotFound(message_type.to_string()))
    }

    fn resolve(
        &self,
        message_type: &str,
        binding: &ConsumerBinding,
    ) -> Result<Consumer, DispatchError> {
        match binding {
            ConsumerBinding::Callable(consumer) => Ok(consumer.clone()),
            ConsumerBinding::Identifier(id) => match self.resolver.resolve(id)? {
                Service::Consumer(consumer) => Ok(consumer),
                Service::Component(component) => self.bind(message_type, component),
                _ => Err(DispatchError::UnsupportedHandler(message_type.to_string())),
            },
            ConsumerBinding::Instance(component) => self.bind(message_type, Arc::clone(component)),
        }
    }

    fn bind(
        &self,
        message_type: &str,
        component: Arc<dyn Component>,
    ) -> Result<Consumer, DispatchError> {
        if let Some(consumer) = Arc::clone(&component).entry_point() {
            return Ok(consumer);
        }

        self.group
            .config()
            .consumer_method_name()
            .and_then(|method| component.method(method))
            .ok_or_else(|| DispatchError::UnsupportedHandler(message_type.to_string()))
    }
}
