//! Test domain: a bank account ledger fed by `Withdraw` and `Deposit` commands.

use std::sync::{Arc, Mutex};

use routed_rust::{
    Component, Consumer, Envelope, GroupAssembler, HandlerError, InMemoryTransport, Message,
    MessageCatalog, QueueConfig, Reporter, ReporterFactory, Router, RoutingConfig, Service,
    ServiceContainer,
};
use serde::Deserialize;
use serde_json::{json, Value};

pub struct Withdraw;

impl Message for Withdraw {
    const TYPE: &'static str = "Withdraw";
}

pub struct Deposit;

impl Message for Deposit {
    const TYPE: &'static str = "Deposit";
}

/// Always queued under the `per_message` strategy.
pub struct SendStatement;

impl Message for SendStatement {
    const TYPE: &'static str = "SendStatement";
    const ASYNC_ONLY: bool = true;
}

#[derive(Deserialize)]
pub struct Amount {
    pub amount: i64,
}

/// Records every movement a consumer applied.
#[derive(Clone, Default)]
pub struct Ledger {
    entries: Arc<Mutex<Vec<(String, i64)>>>,
}

impl Ledger {
    pub fn record(&self, kind: &str, amount: i64) {
        self.entries.lock().unwrap().push((kind.to_string(), amount));
    }

    pub fn entries(&self) -> Vec<(String, i64)> {
        self.entries.lock().unwrap().clone()
    }
}

/// Component exposing its handler as a named method.
pub struct DepositHandler {
    ledger: Ledger,
}

impl Component for DepositHandler {
    fn method(self: Arc<Self>, name: &str) -> Option<Consumer> {
        if name != "command" {
            return None;
        }
        Some(Consumer::new(move |message: &Envelope| {
            let Amount { amount } = serde_json::from_value(message.payload().clone())?;
            self.ledger.record("deposit", amount);
            Ok(json!({ "deposited": amount }))
        }))
    }
}

pub fn catalog() -> Arc<MessageCatalog> {
    Arc::new(
        MessageCatalog::new()
            .with::<Withdraw>()
            .with::<Deposit>()
            .with::<SendStatement>(),
    )
}

pub fn container(ledger: &Ledger) -> ServiceContainer {
    let withdraw = ledger.clone();
    let statements = ledger.clone();

    ServiceContainer::new()
        .with(
            "handleWithdraw",
            Service::Consumer(Consumer::new(move |message| {
                let Amount { amount } = serde_json::from_value(message.payload().clone())?;
                if amount <= 0 {
                    return Err(HandlerError::Rejected(format!("invalid amount {amount}")));
                }
                withdraw.record("withdraw", amount);
                Ok(json!({ "withdrawn": amount }))
            })),
        )
        .with(
            "handleDeposit",
            Service::Component(Arc::new(DepositHandler {
                ledger: ledger.clone(),
            })),
        )
        .with(
            "handleStatement",
            Service::Consumer(Consumer::new(move |_| {
                statements.record("statement", 0);
                Ok(Value::Null)
            })),
        )
        .with(
            "queue.statements",
            Service::Queue(QueueConfig::new().with_name("statements").with_tries(5)),
        )
}

/// `command/default` group with the given strategy and the bank routes.
pub fn config(strategy: &str) -> RoutingConfig {
    RoutingConfig::from_value(json!({
        "command": {
            "default": {
                "strategy": strategy,
                "method_name": "command",
                "routes": {
                    "Withdraw": "handleWithdraw",
                    "Deposit": ["handleDeposit"],
                    "SendStatement": { "consumers": "handleStatement", "queue": "queue.statements" }
                }
            }
        }
    }))
    .unwrap()
}

pub struct Bank {
    pub ledger: Ledger,
    pub transport: InMemoryTransport,
    pub reporter: Arc<Reporter>,
}

impl Bank {
    pub fn new(strategy: &str) -> Self {
        Self::with_config(config(strategy))
    }

    pub fn with_config(config: RoutingConfig) -> Self {
        let ledger = Ledger::default();
        let resolver = Arc::new(container(&ledger));
        let catalog = catalog();

        let mut router = Router::new(Arc::clone(&catalog));
        GroupAssembler::new(resolver.clone())
            .load(&mut router, &config)
            .unwrap();

        let transport = InMemoryTransport::new();
        let reporter = ReporterFactory::new(resolver, catalog)
            .with_sink(Arc::new(transport.clone()))
            .with_queue_defaults(QueueConfig::new().with_connection("redis"))
            .build(router.lookup("command", "default").unwrap())
            .unwrap();

        Self {
            ledger,
            transport,
            reporter: Arc::new(reporter),
        }
    }
}

/// Decode the headers of a queued job document.
pub fn queued_headers(payload: &[u8]) -> Value {
    let document: Value = serde_json::from_slice(payload).unwrap();
    document["payload"]["headers"].clone()
}
