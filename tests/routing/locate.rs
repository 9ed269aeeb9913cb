//! Resolving consumers for messages within assembled groups.

use routed_rust::{DispatchError, Envelope, GroupAssembler, RouteLocator, Router, RoutingConfig};
use serde_json::json;

use crate::support::{catalog, container, CONFIG};

fn locator(domain_type: &str) -> RouteLocator {
    let mut router = Router::new(catalog());
    let config = RoutingConfig::from_json_str(CONFIG).unwrap();
    GroupAssembler::new(container()).load(&mut router, &config).unwrap();

    let group = router.shared(domain_type, "default").unwrap();
    RouteLocator::new(group, container())
}

fn call(locator: &RouteLocator, message: &Envelope) -> Vec<serde_json::Value> {
    locator
        .route(message)
        .unwrap()
        .iter()
        .map(|consumer| consumer.call(message).unwrap())
        .collect()
}

#[test]
fn identifiers_resolve_to_consumers() {
    let locator = locator("command");
    let message = Envelope::for_type("RegisterCustomer", json!({ "email": "a@b.c" }));

    assert_eq!(call(&locator, &message), vec![json!("registered")]);
}

#[test]
fn components_bind_through_the_group_method() {
    let locator = locator("event");
    let message = Envelope::for_type("EmailChanged", json!({}));

    assert_eq!(
        call(&locator, &message),
        vec![
            json!({ "projected": "EmailChanged" }),
            json!({ "projected": "EmailChanged" })
        ]
    );
}

#[test]
fn invokable_components_use_their_entry_point() {
    let locator = locator("query");
    let message = Envelope::for_type("FindCustomer", json!({ "id": 12 }));

    assert_eq!(call(&locator, &message), vec![json!({ "customer": 12 })]);
}

#[test]
fn route_without_consumers_resolves_to_nothing() {
    let locator = locator("command");
    let message = Envelope::for_type("CloseAccount", json!({}));

    assert!(locator.route(&message).unwrap().is_empty());
    assert!(locator.on_queue(&message).unwrap().is_some());
}

#[test]
fn queue_override_is_read_without_resolving_consumers() {
    let locator = locator("command");

    let queue = locator
        .on_queue(&Envelope::for_type("ChangeEmail", json!({})))
        .unwrap()
        .unwrap();
    assert_eq!(queue.name(), Some("mailer"));
    assert_eq!(
        locator
            .on_queue(&Envelope::for_type("RegisterCustomer", json!({})))
            .unwrap(),
        None
    );
}

#[test]
fn message_from_another_group_is_not_routed() {
    let locator = locator("query");

    assert!(matches!(
        locator.route(&Envelope::for_type("RegisterCustomer", json!({}))),
        Err(DispatchError::RouteNotFound(ref t)) if t == "RegisterCustomer"
    ));
}

#[test]
fn message_without_type_is_rejected() {
    let locator = locator("command");

    assert!(matches!(
        locator.route(&Envelope::new(json!({}))),
        Err(DispatchError::InvalidDispatchHeader { .. })
    ));
}

#[test]
fn locator_reads_the_assembled_group() {
    let locator = locator("event");

    assert_eq!(locator.group().domain_type(), "event");
    assert_eq!(locator.group().routes().len(), 2);
}
