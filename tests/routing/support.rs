//! Shared fixtures: a small catalog and a service container.

use std::sync::Arc;

use routed_rust::{
    Component, Consumer, Envelope, MessageCatalog, QueueConfig, Service, ServiceContainer,
};
use serde_json::{json, Value};

pub const COMMANDS: [&str; 3] = ["RegisterCustomer", "ChangeEmail", "CloseAccount"];
pub const EVENTS: [&str; 2] = ["CustomerRegistered", "EmailChanged"];
pub const QUERIES: [&str; 1] = ["FindCustomer"];

pub fn catalog() -> Arc<MessageCatalog> {
    let mut catalog = MessageCatalog::new();
    for name in COMMANDS.iter().chain(&EVENTS).chain(&QUERIES) {
        catalog.insert(name, false).unwrap();
    }
    Arc::new(catalog)
}

/// Projector with one method per event.
pub struct CustomerProjector;

impl Component for CustomerProjector {
    fn method(self: Arc<Self>, name: &str) -> Option<Consumer> {
        match name {
            "onEvent" => Some(Consumer::new(|message: &Envelope| {
                Ok(json!({ "projected": message.message_type() }))
            })),
            _ => None,
        }
    }
}

/// Query handler invokable as a whole.
pub struct FindCustomerHandler;

impl Component for FindCustomerHandler {
    fn entry_point(self: Arc<Self>) -> Option<Consumer> {
        Some(Consumer::new(|message: &Envelope| {
            Ok(json!({ "customer": message.payload()["id"].clone() }))
        }))
    }
}

pub fn container() -> Arc<ServiceContainer> {
    Arc::new(
        ServiceContainer::new()
            .with(
                "customer.register",
                Service::Consumer(Consumer::new(|_| Ok(json!("registered")))),
            )
            .with(
                "customer.change_email",
                Service::Consumer(Consumer::new(|_| Ok(Value::Null))),
            )
            .with("customer.projector", Service::Component(Arc::new(CustomerProjector)))
            .with("customer.find", Service::Component(Arc::new(FindCustomerHandler)))
            .with(
                "queue.mailer",
                Service::Queue(QueueConfig::new().with_connection("sqs").with_name("mailer")),
            ),
    )
}

pub const CONFIG: &str = r#"{
    "command": {
        "default": {
            "service_id": "reporter.command.default",
            "strategy": "async",
            "producer_service": "producer.command",
            "queue": { "connection": "rabbitmq", "name": "commands", "attempts": 3 },
            "message_decorators": ["decorator.tenant"],
            "routes": {
                "RegisterCustomer": "customer.register",
                "ChangeEmail": {
                    "consumers": ["customer.change_email"],
                    "queue": "queue.mailer"
                },
                "CloseAccount": { "queue": { "delay": "5 minutes" } }
            }
        }
    },
    "event": {
        "default": {
            "strategy": "per_message",
            "method_name": "onEvent",
            "tracker_id": "tracker.event",
            "routes": {
                "CustomerRegistered": ["customer.projector"],
                "EmailChanged": ["customer.projector", "customer.projector"]
            }
        }
    },
    "query": {
        "default": {
            "strategy": "sync",
            "concrete": "QueryReporter",
            "message_subscribers": ["subscriber.cache"],
            "routes": { "FindCustomer": { "consumers": "customer.find" } }
        }
    }
}"#;
