//! Declarative routing configuration and the assembler that applies it.
//!
//! A [`RoutingConfig`] maps domain type to group name to [`GroupSpec`]. It is
//! usually read from JSON:
//!
//! ```json
//! {
//!   "command": {
//!     "default": {
//!       "strategy": "per_message",
//!       "queue": { "connection": "rabbitmq", "name": "transaction" },
//!       "message_decorators": ["decorator.correlation"],
//!       "routes": {
//!         "Withdraw": "consumer.withdraw",
//!         "Deposit": ["consumer.deposit", "consumer.audit"],
//!         "CloseAccount": { "consumers": ["consumer.close"], "queue": "queue.slow" }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Consumers and decorators given as strings are service identifiers. Specs
//! built in code may hold closures and instances instead.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::de::value::MapAccessDeserializer;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ConfigError;
use crate::pipeline::MessageSubscriber;
use crate::producer::MessageDecorator;
use crate::queue::QueueConfig;
use crate::service::{Binding, Service, ServiceResolver};

use super::consumer::ConsumerBinding;
use super::group::Group;
use super::router::Router;

/// Domain type, then group name, then group settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RoutingConfig {
    groups: BTreeMap<String, BTreeMap<String, GroupSpec>>,
}

impl RoutingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Add or replace the settings of one group.
    pub fn with_group(mut self, domain_type: &str, name: &str, spec: GroupSpec) -> Self {
        self.groups
            .entry(domain_type.to_string())
            .or_default()
            .insert(name.to_string(), spec);
        self
    }

    pub fn group(&self, domain_type: &str, name: &str) -> Option<&GroupSpec> {
        self.groups.get(domain_type)?.get(name)
    }

    /// Every `(domain_type, name, spec)` triple, ordered by domain type then name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &GroupSpec)> {
        self.groups.iter().flat_map(|(domain_type, named)| {
            named
                .iter()
                .map(move |(name, spec)| (domain_type.as_str(), name.as_str(), spec))
        })
    }
}

/// Settings of one group. Absent keys leave the group untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GroupSpec {
    pub concrete: Option<String>,
    pub service_id: Option<String>,
    pub strategy: Option<String>,
    pub producer_service: Option<String>,
    pub tracker_id: Option<String>,
    pub method_name: Option<String>,
    pub queue: Option<QueueConfig>,
    pub message_subscribers: Vec<Binding<dyn MessageSubscriber>>,
    pub message_decorators: Vec<Binding<dyn MessageDecorator>>,
    pub routes: BTreeMap<String, RouteSpec>,
}

/// The shapes a route declaration may take.
///
/// Read by JSON type: a string is one consumer, an array a list of consumer
/// identifiers, an object a [`RouteDetails`]. Anything else is rejected.
#[derive(Debug, Clone)]
pub enum RouteSpec {
    /// One consumer.
    Single(ConsumerBinding),
    /// Consumers in invocation order.
    List(Vec<ConsumerBinding>),
    /// Consumers plus a queue override.
    Detailed(RouteDetails),
}

impl From<ConsumerBinding> for RouteSpec {
    fn from(binding: ConsumerBinding) -> Self {
        RouteSpec::Single(binding)
    }
}

impl From<Vec<ConsumerBinding>> for RouteSpec {
    fn from(bindings: Vec<ConsumerBinding>) -> Self {
        RouteSpec::List(bindings)
    }
}

impl From<RouteDetails> for RouteSpec {
    fn from(details: RouteDetails) -> Self {
        RouteSpec::Detailed(details)
    }
}

impl<'de> Deserialize<'de> for RouteSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RouteSpecVisitor)
    }
}

struct RouteSpecVisitor;

impl<'de> Visitor<'de> for RouteSpecVisitor {
    type Value = RouteSpec;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a consumer identifier, a list of identifiers or a route map")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(RouteSpec::Single(ConsumerBinding::identifier(v)))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut bindings = Vec::new();
        while let Some(binding) = seq.next_element::<ConsumerBinding>()? {
            bindings.push(binding);
        }
        Ok(RouteSpec::List(bindings))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
        RouteDetails::deserialize(MapAccessDeserializer::new(map)).map(RouteSpec::Detailed)
    }
}

/// Map form of a route. Only this form may carry a queue override.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouteDetails {
    pub consumers: Option<ConsumerList>,
    pub queue: Option<QueueSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ConsumerList {
    Single(ConsumerBinding),
    List(Vec<ConsumerBinding>),
}

/// Route queue declaration.
///
/// Option maps are kept raw and checked when the route is assembled, so a bad
/// field fails the configuration pass.
#[derive(Debug, Clone, PartialEq)]
pub enum QueueSpec {
    /// Identifier of a service holding ready-made queue options.
    Service(String),
    /// Inline options.
    Options(Map<String, Value>),
    /// Any other value; the route gets no override.
    Ignored,
}

impl From<Value> for QueueSpec {
    fn from(value: Value) -> Self {
        match value {
            Value::String(id) => QueueSpec::Service(id),
            Value::Object(options) => QueueSpec::Options(options),
            _ => QueueSpec::Ignored,
        }
    }
}

impl<'de> Deserialize<'de> for QueueSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(QueueSpec::from)
    }
}

/// Applies [`GroupSpec`]s to groups.
pub struct GroupAssembler {
    resolver: Arc<dyn ServiceResolver>,
}

impl GroupAssembler {
    pub fn new(resolver: Arc<dyn ServiceResolver>) -> Self {
        Self { resolver }
    }

    /// Register and assemble every group of `config`.
    ///
    /// Fails with [`ConfigError::DuplicateGroup`] when a group is already
    /// registered; use [`GroupAssembler::extend`] for additional passes.
    pub fn load(&self, router: &mut Router, config: &RoutingConfig) -> Result<(), ConfigError> {
        for (domain_type, name, spec) in config.iter() {
            let group = router.register(domain_type, name)?;
            self.make(group, spec)?;
        }
        Ok(())
    }

    /// Apply `config` on top of whatever is registered, creating missing groups.
    pub fn extend(&self, router: &mut Router, config: &RoutingConfig) -> Result<(), ConfigError> {
        for (domain_type, name, spec) in config.iter() {
            let group = if router.has(domain_type, name) {
                router.group_mut(domain_type, name)?
            } else {
                router.register(domain_type, name)?
            };
            self.make(group, spec)?;
        }
        Ok(())
    }

    /// Apply one spec to one group.
    pub fn make(&self, group: &mut Group, spec: &GroupSpec) -> Result<(), ConfigError> {
        let config = group.config_mut();

        if let Some(concrete) = &spec.concrete {
            config.with_reporter_concrete(concrete.as_str());
        }
        if let Some(service_id) = &spec.service_id {
            config.with_reporter_service_id(service_id.as_str());
        }
        if let Some(strategy) = &spec.strategy {
            config.with_producer_strategy(strategy)?;
        }
        if let Some(producer) = &spec.producer_service {
            config.with_producer_service_id(producer.as_str());
        }
        if let Some(tracker_id) = &spec.tracker_id {
            config.with_tracker_id(tracker_id.as_str());
        }
        if let Some(method_name) = &spec.method_name {
            config.with_consumer_method_name(method_name.as_str());
        }
        if let Some(queue) = &spec.queue {
            config.with_queue(queue.clone());
        }

        config
            .with_message_subscribers(spec.message_subscribers.iter().cloned())
            .with_message_decorators(spec.message_decorators.iter().cloned());

        for (message_type, route_spec) in &spec.routes {
            let queue = self.determine_queue(route_spec)?;
            let route = group.routes_mut().add(message_type)?;

            route.to_all(Self::determine_consumers(route_spec));
            if let Some(queue) = queue {
                route.on_queue(queue);
            }
        }

        debug!(
            domain_type = group.domain_type(),
            name = group.name(),
            routes = spec.routes.len(),
            "group assembled"
        );

        Ok(())
    }

    /// Consumers declared by a route, in order. A detailed route without a
    /// `consumers` key has none.
    pub fn determine_consumers(spec: &RouteSpec) -> Vec<ConsumerBinding> {
        match spec {
            RouteSpec::Single(binding) => vec![binding.clone()],
            RouteSpec::List(bindings) => bindings.clone(),
            RouteSpec::Detailed(details) => match &details.consumers {
                Some(ConsumerList::Single(binding)) => vec![binding.clone()],
                Some(ConsumerList::List(bindings)) => bindings.clone(),
                None => Vec::new(),
            },
        }
    }

    /// Queue override declared by a route. Only the detailed shape carries one.
    pub fn determine_queue(&self, spec: &RouteSpec) -> Result<Option<QueueConfig>, ConfigError> {
        let queue = match spec {
            RouteSpec::Detailed(RouteDetails {
                queue: Some(queue), ..
            }) => queue,
            _ => return Ok(None),
        };

        match queue {
            QueueSpec::Service(id) => match self.resolver.resolve(id)? {
                Service::Queue(config) => Ok(Some(config)),
                _ => Err(ConfigError::UnexpectedService {
                    id: id.clone(),
                    expected: "queue config",
                }),
            },
            QueueSpec::Options(options) => QueueConfig::from_map(options).map(Some),
            QueueSpec::Ignored => Ok(None),
        }
    }
}
