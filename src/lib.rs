pub mod error;
pub mod message;
pub mod pipeline;
pub mod producer;
pub mod queue;
pub mod routing;
pub mod service;
pub mod strategy;
pub mod transport;
pub mod worker;

pub use error::{ConfigError, DispatchError, HandlerError};
pub use message::{header, AsyncMarker, Envelope, Message, MessageCatalog};
pub use pipeline::{
    DispatchPriority, Dispatched, MessageSubscriber, Reporter, ReporterFactory, Story, Tracker,
};
pub use producer::{
    DispatchSubscriber, LogicalResolver, MessageDecorator, MessageProducer, ProducerDecorator,
    ProducerStrategyResolver, QueueProducer,
};
pub use queue::{Delay, JobQueue, MessageJob, MessageQueue, QueueConfig};
pub use routing::{
    Component, Consumer, ConsumerBinding, Group, GroupAssembler, GroupConfig, Route, RouteLocator,
    RouteTable, Router, RoutingConfig,
};
pub use service::{Binding, Service, ServiceContainer, ServiceError, ServiceResolver};
pub use strategy::ProducerStrategy;
pub use transport::{InMemoryTransport, Job, JobSink, JobSource, TransportError};
pub use worker::{JobWorker, WorkerStats};
