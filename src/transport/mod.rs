//! Queue backend abstractions.
//!
//! The router never talks to a broker directly. Async messages are turned into
//! [`Job`]s and pushed to a [`JobSink`]; workers pull them back from a
//! [`JobSource`] and relay them into the dispatch pipeline.
//!
//! ```text
//!  JobQueue (adapter) ──push──▶ JobSink ┐
//!                                       │  backend (InMemoryTransport,
//!  JobWorker ◀──poll/ack/nack── JobSource┘  Redis, RabbitMQ, ...)
//! ```

mod in_memory;
mod job;

pub use in_memory::InMemoryTransport;
pub use job::{Job, JobSink, JobSource, TransportError};
