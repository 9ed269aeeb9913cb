//! Producer strategy: whether a message is handled in-process or queued.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Delivery policy of a group.
///
/// String forms are `sync`, `async` and `per_message`; anything else is a
/// configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProducerStrategy {
    /// Always handled in-process.
    Sync,
    /// Always handed to the queue.
    Async,
    /// In-process unless the message type is marked async-only.
    PerMessage,
}

impl ProducerStrategy {
    pub const ALL: [ProducerStrategy; 3] = [
        ProducerStrategy::Sync,
        ProducerStrategy::Async,
        ProducerStrategy::PerMessage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProducerStrategy::Sync => "sync",
            ProducerStrategy::Async => "async",
            ProducerStrategy::PerMessage => "per_message",
        }
    }
}

impl FromStr for ProducerStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sync" => Ok(ProducerStrategy::Sync),
            "async" => Ok(ProducerStrategy::Async),
            "per_message" => Ok(ProducerStrategy::PerMessage),
            other => Err(ConfigError::InvalidStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for ProducerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
