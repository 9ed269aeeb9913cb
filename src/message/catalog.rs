//! Catalog of the message types known to the application.
//!
//! Routes can only be registered for types listed here, so a typo in a routing
//! configuration fails at startup instead of at dispatch time. The catalog also
//! records which types must always be handled asynchronously.

use std::collections::BTreeMap;

use crate::error::ConfigError;

/// A message type that can be routed.
///
/// ```
/// use routed_rust::message::{Message, MessageCatalog, AsyncMarker};
///
/// struct Withdraw;
/// impl Message for Withdraw {
///     const TYPE: &'static str = "Withdraw";
/// }
///
/// struct SendStatement;
/// impl Message for SendStatement {
///     const TYPE: &'static str = "SendStatement";
///     const ASYNC_ONLY: bool = true;
/// }
///
/// let catalog = MessageCatalog::new().with::<Withdraw>().with::<SendStatement>();
/// assert!(catalog.contains("Withdraw"));
/// assert!(catalog.is_async_only("SendStatement"));
/// ```
pub trait Message {
    /// Routing key of the type.
    const TYPE: &'static str;

    /// Whether the `per_message` strategy must queue this type.
    const ASYNC_ONLY: bool = false;
}

/// Capability check consulted by the `per_message` producer strategy.
pub trait AsyncMarker: Send + Sync {
    fn is_async_only(&self, message_type: &str) -> bool;
}

impl<F> AsyncMarker for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_async_only(&self, message_type: &str) -> bool {
        self(message_type)
    }
}

/// Registered message types and their async-only flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageCatalog {
    types: BTreeMap<String, bool>,
}

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed message.
    pub fn with<M: Message>(mut self) -> Self {
        self.types.insert(M::TYPE.to_string(), M::ASYNC_ONLY);
        self
    }

    /// Register a message type by name.
    pub fn insert(&mut self, message_type: &str, async_only: bool) -> Result<(), ConfigError> {
        validate_type_name(message_type)?;
        self.types.insert(message_type.to_string(), async_only);
        Ok(())
    }

    pub fn contains(&self, message_type: &str) -> bool {
        self.types.contains_key(message_type)
    }

    /// Check that `message_type` is well formed and registered.
    pub fn validate(&self, message_type: &str) -> Result<(), ConfigError> {
        validate_type_name(message_type)?;
        if !self.contains(message_type) {
            return Err(ConfigError::UnknownMessageType(message_type.to_string()));
        }
        Ok(())
    }

    /// Registered type names in order.
    pub fn types(&self) -> Vec<&str> {
        self.types.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl AsyncMarker for MessageCatalog {
    fn is_async_only(&self, message_type: &str) -> bool {
        self.types.get(message_type).copied().unwrap_or(false)
    }
}

fn validate_type_name(message_type: &str) -> Result<(), ConfigError> {
    let malformed = message_type.is_empty()
        || message_type
            .chars()
            .any(|c| c.is_whitespace() || c.is_control());

    if malformed {
        return Err(ConfigError::InvalidMessageType(message_type.to_string()));
    }
    Ok(())
}
