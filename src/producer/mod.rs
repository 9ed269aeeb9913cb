//! Producing messages: the sync / async decision, the dispatched stamp and
//! the hand-off to the queue.

mod decorator;
mod producer;
mod resolver;
mod subscriber;

pub use decorator::{MessageDecorator, ProducerDecorator};
pub use producer::{MessageProducer, QueueProducer};
pub use resolver::{LogicalResolver, ProducerStrategyResolver};
pub use subscriber::DispatchSubscriber;
