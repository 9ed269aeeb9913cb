//! Error types for routing configuration and message dispatch.
//!
//! Configuration errors surface while groups and routes are registered, before
//! any traffic is accepted. Dispatch errors are raised per message and bubble up
//! to the pipeline that drove the dispatch.

use std::error::Error;

use thiserror::Error;

use crate::service::ServiceError;
use crate::transport::TransportError;

/// Errors raised while building groups, routes and their configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A route for this message type already exists in the table.
    #[error("message name already exists: {0}")]
    DuplicateRoute(String),

    /// A group with this domain type and name is already registered.
    #[error("{domain_type} reporter already exists with name {name}")]
    DuplicateGroup { domain_type: String, name: String },

    /// No group registered under this domain type and name.
    #[error("no {domain_type} group registered with name {name}")]
    GroupNotFound { domain_type: String, name: String },

    /// The message type identifier is malformed (empty, whitespace, ...).
    #[error("message name must be a valid type name, got {0:?}")]
    InvalidMessageType(String),

    /// The message type is well formed but unknown to the message catalog.
    #[error("message name must name a registered message type, got {0}")]
    UnknownMessageType(String),

    /// The producer strategy string is not one of sync, async, per_message.
    #[error("invalid producer strategy: {0}")]
    InvalidStrategy(String),

    /// The producer strategy was read before being configured.
    #[error("producer strategy can not be null")]
    StrategyNotSet,

    /// A queue option map could not be read.
    #[error("invalid queue configuration: {0}")]
    InvalidQueueConfig(String),

    /// A service identifier resolved to the wrong kind of service.
    #[error("service {id} is not a {expected}")]
    UnexpectedService { id: String, expected: &'static str },

    /// The service resolver failed.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Errors raised while dispatching a single message.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No route registered for the message type.
    #[error("message name {0} not found")]
    RouteNotFound(String),

    /// A consumer binding could not be turned into something invokable.
    #[error("message handler with name {0} not supported")]
    UnsupportedHandler(String),

    /// A producer control header is missing or has the wrong type.
    #[error("invalid producer event header: {header:?} is required and must be {expected}")]
    InvalidDispatchHeader {
        header: &'static str,
        expected: &'static str,
    },

    /// The message must be queued but no queue is configured.
    #[error("no message queue configured to produce async message {0}")]
    QueueUnavailable(String),

    /// The queue adapter refused the message.
    #[error("enqueue failed: {0}")]
    Enqueue(#[from] TransportError),

    /// A consumer failed while handling the message.
    #[error(transparent)]
    Handler(#[from] HandlerError),

    /// A queued job could not be decoded or relayed.
    #[error("invalid job: {0}")]
    InvalidJob(String),

    /// The service resolver failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Group configuration was incomplete when the pipeline was built.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Error returned by consumers.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Business logic rejected the message.
    #[error("rejected: {0}")]
    Rejected(String),

    /// Payload could not be decoded into the consumer's input type.
    #[error("decode failed: {0}")]
    DecodeFailed(String),

    /// Other error.
    #[error("handler error: {0}")]
    Other(Box<dyn Error + Send + Sync>),
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::DecodeFailed(err.to_string())
    }
}

impl From<serde_json::Error> for DispatchError {
    fn from(err: serde_json::Error) -> Self {
        DispatchError::InvalidJob(err.to_string())
    }
}
