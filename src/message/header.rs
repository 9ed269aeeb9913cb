//! Well-known header keys.

/// Message type identifier, used as the routing key.
pub const EVENT_TYPE: &str = "__event_type";

/// Unique message identifier.
pub const EVENT_ID: &str = "__event_id";

/// `true` once the message went through the producer.
pub const EVENT_DISPATCHED: &str = "__event_dispatched";

/// Producer strategy the message was decorated with.
pub const EVENT_STRATEGY: &str = "__event_strategy";

/// Identifier of the reporter a queued message is relayed back to.
pub const REPORTER_ID: &str = "__reporter_id";

/// Queue options carried along with an async message.
pub const QUEUE: &str = "queue";
