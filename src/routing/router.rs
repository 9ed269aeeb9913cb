//! Registry of every routing group, keyed by domain type and name.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::ConfigError;
use crate::message::MessageCatalog;

use super::group::Group;

/// Groups by domain type, then by name.
pub type Registry = BTreeMap<String, BTreeMap<String, Group>>;

/// Owns all groups.
///
/// Built once at startup through `&mut` registration calls, then shared
/// read-only (typically behind an `Arc`) with the dispatch side.
///
/// ```
/// use std::sync::Arc;
/// use routed_rust::message::MessageCatalog;
/// use routed_rust::routing::Router;
///
/// let mut catalog = MessageCatalog::new();
/// catalog.insert("Withdraw", false).unwrap();
///
/// let mut router = Router::new(Arc::new(catalog));
/// router.register("command", "default").unwrap()
///     .routes_mut()
///     .add("Withdraw").unwrap()
///     .to("consumer.withdraw");
///
/// assert!(router.has("command", "default"));
/// assert!(router.register("command", "default").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Router {
    catalog: Arc<MessageCatalog>,
    groups: Registry,
}

impl Router {
    pub fn new(catalog: Arc<MessageCatalog>) -> Self {
        Self {
            catalog,
            groups: Registry::new(),
        }
    }

    /// Create and store an empty group.
    ///
    /// A new name under a known domain type is added next to the existing
    /// groups; an identical `(domain_type, name)` pair is rejected.
    pub fn register(&mut self, domain_type: &str, name: &str) -> Result<&mut Group, ConfigError> {
        let named = self.groups.entry(domain_type.to_string()).or_default();

        if named.contains_key(name) {
            return Err(ConfigError::DuplicateGroup {
                domain_type: domain_type.to_string(),
                name: name.to_string(),
            });
        }

        debug!(domain_type, name, "group registered");

        let group = Group::new(domain_type, name, Arc::clone(&self.catalog));
        Ok(named.entry(name.to_string()).or_insert(group))
    }

    pub fn lookup(&self, domain_type: &str, name: &str) -> Option<&Group> {
        self.groups.get(domain_type)?.get(name)
    }

    /// Existing group, for an additional configuration pass.
    pub fn group_mut(&mut self, domain_type: &str, name: &str) -> Result<&mut Group, ConfigError> {
        self.groups
            .get_mut(domain_type)
            .and_then(|named| named.get_mut(name))
            .ok_or_else(|| ConfigError::GroupNotFound {
                domain_type: domain_type.to_string(),
                name: name.to_string(),
            })
    }

    pub fn has(&self, domain_type: &str, name: &str) -> bool {
        self.lookup(domain_type, name).is_some()
    }

    /// Shared copy of a group for the dispatch side.
    pub fn shared(&self, domain_type: &str, name: &str) -> Option<Arc<Group>> {
        self.lookup(domain_type, name).cloned().map(Arc::new)
    }

    /// Group names registered under `domain_type`.
    pub fn names(&self, domain_type: &str) -> Vec<&str> {
        self.groups
            .get(domain_type)
            .map(|named| named.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Every group, ordered by domain type then name.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values().flat_map(BTreeMap::values)
    }

    /// Copy of the full registry. Later registrations do not show up in it.
    pub fn snapshot(&self) -> Registry {
        self.groups.clone()
    }

    pub fn catalog(&self) -> &Arc<MessageCatalog> {
        &self.catalog
    }
}
