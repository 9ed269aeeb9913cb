//! Consumers and the shapes a route may declare them in.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::HandlerError;
use crate::message::Envelope;
use crate::service::IdVisitor;

type ConsumerFn = dyn Fn(&Envelope) -> Result<Value, HandlerError> + Send + Sync;

/// An invokable message consumer.
///
/// Consumers return a JSON value: query handlers answer with it, command and
/// event handlers usually return `Value::Null`.
#[derive(Clone)]
pub struct Consumer(Arc<ConsumerFn>);

impl Consumer {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Envelope) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        Consumer(Arc::new(f))
    }

    pub fn call(&self, message: &Envelope) -> Result<Value, HandlerError> {
        (self.0)(message)
    }

    /// `true` when both handles point at the same function.
    pub fn ptr_eq(&self, other: &Consumer) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Consumer(..)")
    }
}

/// An object that exposes consumer entry points.
///
/// A component is either directly invokable (`entry_point`) or exposes named
/// methods, one of which the group selects through its consumer method name.
///
/// ```
/// use std::sync::Arc;
/// use routed_rust::routing::{Component, Consumer};
/// use serde_json::Value;
///
/// struct AccountProjector;
///
/// impl Component for AccountProjector {
///     fn method(self: Arc<Self>, name: &str) -> Option<Consumer> {
///         match name {
///             "on_event" => Some(Consumer::new(move |_message| Ok(Value::Null))),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Component: Send + Sync {
    /// Consumer used when the component itself is invokable.
    fn entry_point(self: Arc<Self>) -> Option<Consumer> {
        None
    }

    /// Consumer bound to the method called `name`, if the component has one.
    fn method(self: Arc<Self>, name: &str) -> Option<Consumer> {
        let _ = name;
        None
    }
}

/// A consumer as declared on a route.
///
/// Resolution to an invokable [`Consumer`] happens at dispatch time, so the
/// cost of a service lookup is only paid for identifier bindings.
/// Deserializes from a string as [`ConsumerBinding::Identifier`].
#[derive(Clone)]
pub enum ConsumerBinding {
    Callable(Consumer),
    Identifier(String),
    Instance(Arc<dyn Component>),
}

impl ConsumerBinding {
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&Envelope) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        ConsumerBinding::Callable(Consumer::new(f))
    }

    pub fn identifier(id: impl Into<String>) -> Self {
        ConsumerBinding::Identifier(id.into())
    }

    pub fn instance(component: Arc<dyn Component>) -> Self {
        ConsumerBinding::Instance(component)
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            ConsumerBinding::Identifier(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Debug for ConsumerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsumerBinding::Callable(_) => f.write_str("Callable(..)"),
            ConsumerBinding::Identifier(id) => f.debug_tuple("Identifier").field(id).finish(),
            ConsumerBinding::Instance(_) => f.write_str("Instance(..)"),
        }
    }
}

impl From<Consumer> for ConsumerBinding {
    fn from(consumer: Consumer) -> Self {
        ConsumerBinding::Callable(consumer)
    }
}

impl From<&str> for ConsumerBinding {
    fn from(id: &str) -> Self {
        ConsumerBinding::Identifier(id.to_string())
    }
}

impl From<String> for ConsumerBinding {
    fn from(id: String) -> Self {
        ConsumerBinding::Identifier(id)
    }
}

impl From<Arc<dyn Component>> for ConsumerBinding {
    fn from(component: Arc<dyn Component>) -> Self {
        ConsumerBinding::Instance(component)
    }
}

impl<'de> Deserialize<'de> for ConsumerBinding {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer
            .deserialize_str(IdVisitor)
            .map(ConsumerBinding::Identifier)
    }
}
