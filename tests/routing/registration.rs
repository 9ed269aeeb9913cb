//! Building the router from declarative configuration.

use routed_rust::{ConfigError, Delay, GroupAssembler, ProducerStrategy, Router, RoutingConfig};
use serde_json::json;

use crate::support::{catalog, container, CONFIG};

fn loaded() -> Router {
    let mut router = Router::new(catalog());
    let config = RoutingConfig::from_json_str(CONFIG).unwrap();
    GroupAssembler::new(container()).load(&mut router, &config).unwrap();
    router
}

// ============================================================================
// Group settings
// ============================================================================

#[test]
fn every_group_is_registered() {
    let router = loaded();

    for domain_type in ["command", "event", "query"] {
        assert!(router.has(domain_type, "default"), "{domain_type}");
    }
    assert_eq!(router.groups().count(), 3);
}

#[test]
fn scalar_settings_are_applied_when_present() {
    let router = loaded();

    let command = router.lookup("command", "default").unwrap().config();
    assert_eq!(command.reporter_service_id(), Some("reporter.command.default"));
    assert_eq!(command.producer_strategy().unwrap(), ProducerStrategy::Async);
    assert_eq!(command.producer_service_id(), Some("producer.command"));
    assert_eq!(command.consumer_method_name(), None);
    assert_eq!(command.message_decorators().len(), 1);

    let queue = command.queue().unwrap();
    assert_eq!(queue.connection(), Some("rabbitmq"));
    assert_eq!(queue.name(), Some("commands"));
    assert_eq!(queue.tries(), Some(3));

    let event = router.lookup("event", "default").unwrap().config();
    assert_eq!(event.producer_strategy().unwrap(), ProducerStrategy::PerMessage);
    assert_eq!(event.consumer_method_name(), Some("onEvent"));
    assert_eq!(event.tracker_id(), Some("tracker.event"));
    assert!(event.queue().is_none());

    let query = router.lookup("query", "default").unwrap().config();
    assert_eq!(query.reporter_concrete(), Some("QueryReporter"));
    assert_eq!(query.message_subscribers().len(), 1);
}

#[test]
fn route_queue_overrides() {
    let router = loaded();
    let routes = router.lookup("command", "default").unwrap().routes();

    assert!(routes.find("RegisterCustomer").unwrap().queue().is_none());

    let mailer = routes.find("ChangeEmail").unwrap().queue().unwrap();
    assert_eq!(mailer.connection(), Some("sqs"));
    assert_eq!(mailer.name(), Some("mailer"));

    let close = routes.find("CloseAccount").unwrap();
    assert!(close.consumers().is_empty());
    assert_eq!(
        close.queue().unwrap().delay(),
        Some(&Delay::Expression("5 minutes".into()))
    );
}

// ============================================================================
// Multi-pass configuration
// ============================================================================

#[test]
fn a_second_pass_adds_groups_and_routes() {
    let mut router = loaded();
    let assembler = GroupAssembler::new(container());

    let extra = RoutingConfig::from_value(json!({
        "command": {
            "admin": { "strategy": "sync", "routes": { "CloseAccount": "customer.register" } }
        },
        "query": {
            "default": { "message_subscribers": ["subscriber.metrics"] }
        }
    }))
    .unwrap();
    assembler.extend(&mut router, &extra).unwrap();

    assert_eq!(router.names("command"), vec!["admin", "default"]);
    let query = router.lookup("query", "default").unwrap().config();
    assert_eq!(query.message_subscribers().len(), 2);
    assert_eq!(query.producer_strategy().unwrap(), ProducerStrategy::Sync);
}

#[test]
fn a_second_pass_cannot_redefine_a_route() {
    let mut router = loaded();
    let again = RoutingConfig::from_value(json!({
        "event": { "default": { "routes": { "EmailChanged": "customer.projector" } } }
    }))
    .unwrap();

    let err = GroupAssembler::new(container())
        .extend(&mut router, &again)
        .unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateRoute(ref t) if t == "EmailChanged"));
}

#[test]
fn loading_twice_is_a_duplicate_group() {
    let mut router = loaded();
    let config = RoutingConfig::from_json_str(CONFIG).unwrap();

    assert!(matches!(
        GroupAssembler::new(container()).load(&mut router, &config),
        Err(ConfigError::DuplicateGroup { .. })
    ));
}

#[test]
fn snapshot_is_detached_from_later_passes() {
    let mut router = loaded();
    let snapshot = router.snapshot();

    router.register("command", "admin").unwrap();

    assert_eq!(snapshot["command"].len(), 1);
    assert_eq!(router.names("command").len(), 2);
}
