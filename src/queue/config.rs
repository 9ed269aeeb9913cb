//! Queue transport parameters with field-wise override semantics.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Delay before a queued job becomes available: a non-negative number of
/// seconds, or a backend specific expression such as `"5 minutes"`. Negative
/// numbers are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Delay {
    Seconds(u64),
    Expression(String),
}

impl fmt::Display for Delay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delay::Seconds(seconds) => write!(f, "{}s", seconds),
            Delay::Expression(expr) => f.write_str(expr),
        }
    }
}

/// Queue options for async messages.
///
/// Every field is optional. An unset field means "not decided at this layer",
/// so a more specific layer (group, then route) can still supply a value and
/// whatever stays unset falls back to the queue backend defaults.
///
/// ```
/// use routed_rust::queue::QueueConfig;
/// use serde_json::json;
///
/// let group =
///     QueueConfig::from_value(&json!({ "connection": "redis", "name": "default" })).unwrap();
/// let route = QueueConfig::from_value(&json!({ "name": "withdraw" })).unwrap();
///
/// let effective = group.merge(&route);
/// assert_eq!(effective.connection(), Some("redis"));
/// assert_eq!(effective.name(), Some("withdraw"));
/// assert_eq!(effective.tries(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    connection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(alias = "attempts", skip_serializing_if = "Option::is_none")]
    tries: Option<u32>,
    #[serde(alias = "max_failures", skip_serializing_if = "Option::is_none")]
    max_exceptions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    delay: Option<Delay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout: Option<u64>,
}

impl QueueConfig {
    /// All-unset instance: use the system defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a partial option map. Only the supplied keys are set.
    pub fn from_map(options: &Map<String, Value>) -> Result<Self, ConfigError> {
        serde_json::from_value(Value::Object(options.clone()))
            .map_err(|e| ConfigError::InvalidQueueConfig(e.to_string()))
    }

    /// Build from a JSON value, which must be an object.
    pub fn from_value(options: &Value) -> Result<Self, ConfigError> {
        match options {
            Value::Object(map) => Self::from_map(map),
            other => Err(ConfigError::InvalidQueueConfig(format!(
                "expected an option map, got {}",
                other
            ))),
        }
    }

    pub fn with_connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = Some(connection.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_tries(mut self, tries: u32) -> Self {
        self.tries = Some(tries);
        self
    }

    pub fn with_max_exceptions(mut self, max_exceptions: u32) -> Self {
        self.max_exceptions = Some(max_exceptions);
        self
    }

    pub fn with_delay(mut self, delay: Delay) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connection(&self) -> Option<&str> {
        self.connection.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn tries(&self) -> Option<u32> {
        self.tries
    }

    pub fn max_exceptions(&self) -> Option<u32> {
        self.max_exceptions
    }

    pub fn delay(&self) -> Option<&Delay> {
        self.delay.as_ref()
    }

    pub fn timeout(&self) -> Option<u64> {
        self.timeout
    }

    /// `true` when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Layer `over` on top of `self`: fields set in `over` win, the rest are
    /// kept from `self`.
    pub fn merge(&self, over: &QueueConfig) -> QueueConfig {
        QueueConfig {
            connection: over.connection.clone().or_else(|| self.connection.clone()),
            name: over.name.clone().or_else(|| self.name.clone()),
            tries: over.tries.or(self.tries),
            max_exceptions: over.max_exceptions.or(self.max_exceptions),
            delay: over.delay.clone().or_else(|| self.delay.clone()),
            timeout: over.timeout.or(self.timeout),
        }
    }

    /// Wire form carried in the `queue` header. Unset fields are omitted.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}
