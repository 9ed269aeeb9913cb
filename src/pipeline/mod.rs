//! A minimal dispatch pipeline.
//!
//! A [`Reporter`] decorates a message, runs the [`Tracker`] hooks over a
//! [`Story`] and invokes the consumers the hooks attached. The routing core
//! plugs into it through [`MessageSubscriber`]s.

mod factory;
mod reporter;
mod story;
mod tracker;

pub use factory::ReporterFactory;
pub use reporter::Reporter;
pub use story::{Dispatched, Story};
pub use tracker::{DispatchPriority, MessageSubscriber, Tracker};
