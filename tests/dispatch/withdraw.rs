//! End-to-end dispatch of bank commands through a group reporter.

use routed_rust::{header, DispatchError, Envelope, HandlerError};
use serde_json::json;

use crate::support::{queued_headers, Bank};

// ============================================================================
// Sync strategy: handled in process, nothing queued
// ============================================================================

#[test]
fn sync_withdraw_runs_consumer_in_process() {
    let bank = Bank::new("sync");

    let dispatched = bank
        .reporter
        .dispatch(Envelope::for_type("Withdraw", json!({ "amount": 10 })))
        .unwrap();

    assert_eq!(dispatched.message.header(header::EVENT_DISPATCHED), Some(&json!(true)));
    assert_eq!(dispatched.message.header(header::EVENT_STRATEGY), Some(&json!("sync")));
    assert_eq!(dispatched.results, vec![json!({ "withdrawn": 10 })]);
    assert_eq!(bank.ledger.entries(), vec![("withdraw".to_string(), 10)]);
    assert!(bank.transport.is_empty());
}

#[test]
fn component_consumer_is_bound_through_method_name() {
    let bank = Bank::new("sync");

    let dispatched = bank
        .reporter
        .dispatch(Envelope::for_type("Deposit", json!({ "amount": 40 })))
        .unwrap();

    assert_eq!(dispatched.results, vec![json!({ "deposited": 40 })]);
    assert_eq!(bank.ledger.entries(), vec![("deposit".to_string(), 40)]);
}

#[test]
fn consumer_rejection_reaches_the_caller() {
    let bank = Bank::new("sync");

    let result = bank
        .reporter
        .dispatch(Envelope::for_type("Withdraw", json!({ "amount": -5 })));

    assert!(matches!(
        result,
        Err(DispatchError::Handler(HandlerError::Rejected(_)))
    ));
    assert!(bank.ledger.entries().is_empty());
}

#[test]
fn unrouted_message_fails_for_both_strategies() {
    for strategy in ["sync", "async"] {
        let bank = Bank::new(strategy);
        let result = bank
            .reporter
            .dispatch(Envelope::for_type("Transfer", json!({ "amount": 1 })));

        assert!(
            matches!(result, Err(DispatchError::RouteNotFound(ref t)) if t == "Transfer"),
            "strategy {strategy}"
        );
        assert!(bank.transport.is_empty());
    }
}

// ============================================================================
// Async strategy: one job, consumers untouched
// ============================================================================

#[test]
fn async_withdraw_enqueues_exactly_one_job() {
    let bank = Bank::new("async");

    let dispatched = bank
        .reporter
        .dispatch(Envelope::for_type("Withdraw", json!({ "amount": 10 })))
        .unwrap();

    assert!(dispatched.results.is_empty());
    assert!(bank.ledger.entries().is_empty());

    let jobs = bank.transport.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].display_name, "Withdraw");
    assert_eq!(
        Some(jobs[0].id.as_str()),
        dispatched.message.header(header::EVENT_ID).and_then(|v| v.as_str())
    );

    let headers = queued_headers(&jobs[0].payload);
    assert_eq!(headers[header::EVENT_TYPE], json!("Withdraw"));
    assert_eq!(headers[header::EVENT_DISPATCHED], json!(true));
    assert_eq!(headers[header::EVENT_STRATEGY], json!("async"));
    assert_eq!(headers[header::REPORTER_ID], json!("reporter.command.default"));
    assert_eq!(headers[header::QUEUE], json!({ "connection": "redis" }));
}

// ============================================================================
// Per-message strategy: the message type decides
// ============================================================================

#[test]
fn per_message_queues_only_async_only_types() {
    let bank = Bank::new("per_message");

    let withdraw = bank
        .reporter
        .dispatch(Envelope::for_type("Withdraw", json!({ "amount": 3 })))
        .unwrap();
    assert_eq!(withdraw.results.len(), 1);

    let statement = bank
        .reporter
        .dispatch(Envelope::for_type("SendStatement", json!({ "month": "2024-01" })))
        .unwrap();
    assert!(statement.results.is_empty());

    assert_eq!(bank.transport.display_names(), vec!["SendStatement".to_string()]);

    let jobs = bank.transport.jobs_on("statements");
    assert_eq!(jobs.len(), 1);
    assert_eq!(
        queued_headers(&jobs[0].payload)[header::QUEUE],
        json!({ "connection": "redis", "name": "statements", "tries": 5 })
    );
}
