//! Queued messages coming back through the worker.

use std::sync::Arc;

use routed_rust::{Envelope, JobSink, JobWorker, MessageJob, WorkerStats};
use serde_json::json;

use crate::support::Bank;

#[test]
fn redelivered_job_runs_in_process_and_is_not_requeued() {
    let bank = Bank::new("async");
    bank.reporter
        .dispatch(Envelope::for_type("Withdraw", json!({ "amount": 15 })))
        .unwrap();

    let worker = JobWorker::new().with_reporter(Arc::clone(&bank.reporter));
    let stats = worker.drain(&bank.transport).unwrap();

    assert_eq!(stats, WorkerStats { polled: 1, handled: 1, failed: 0 });
    assert_eq!(bank.ledger.entries(), vec![("withdraw".to_string(), 15)]);
    assert_eq!(bank.transport.len(), 1);
    assert_eq!(bank.transport.acknowledged().len(), 1);
}

#[test]
fn failing_job_is_rejected_with_the_error() {
    let bank = Bank::new("async");
    bank.reporter
        .dispatch(Envelope::for_type("Withdraw", json!({ "amount": 0 })))
        .unwrap();

    let worker = JobWorker::new().with_reporter(Arc::clone(&bank.reporter));
    let stats = worker.drain(&bank.transport).unwrap();

    assert_eq!(stats.failed, 1);
    let rejected = bank.transport.rejected();
    assert_eq!(rejected.len(), 1);
    assert!(rejected[0].1.contains("invalid amount 0"), "{}", rejected[0].1);
    assert!(bank.ledger.entries().is_empty());
}

#[test]
fn queued_job_exposes_effective_options() {
    let bank = Bank::new("per_message");
    bank.reporter
        .dispatch(Envelope::for_type("SendStatement", json!({})))
        .unwrap();

    let job = MessageJob::from_job(&bank.transport.jobs()[0]).unwrap();
    assert_eq!(job.display_name(), "SendStatement");
    assert_eq!(job.connection(), Some("redis"));
    assert_eq!(job.queue(), Some("statements"));
    assert_eq!(job.tries(), 5);
    assert_eq!(job.max_exceptions(), MessageJob::DEFAULT_MAX_EXCEPTIONS);
    assert_eq!(job.timeout(), MessageJob::DEFAULT_TIMEOUT);
    assert_eq!(job.reporter_id(), Some("reporter.command.default"));
}

#[test]
fn job_from_another_process_is_relayed() {
    let bank = Bank::new("sync");
    let message = Envelope::for_type("Deposit", json!({ "amount": 7 }))
        .with_header("__event_dispatched", true)
        .with_header("__event_strategy", "async")
        .with_header("__reporter_id", "reporter.command.default");
    let job = MessageJob::new(message).unwrap().to_job().unwrap();
    bank.transport.push(job).unwrap();

    let worker = JobWorker::new().with_reporter(Arc::clone(&bank.reporter));
    assert_eq!(worker.drain(&bank.transport).unwrap().handled, 1);
    assert_eq!(bank.ledger.entries(), vec![("deposit".to_string(), 7)]);
}
