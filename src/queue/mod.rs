//! Queue options, queued jobs and the adapter that enqueues async messages.

mod adapter;
mod config;
mod job;

pub use adapter::{JobQueue, MessageQueue};
pub use config::{Delay, QueueConfig};
pub use job::MessageJob;
