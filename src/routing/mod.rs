//! Routing: which consumers handle which message type.
//!
//! Registration happens once at startup ([`Router`], [`GroupAssembler`]);
//! dispatch-time lookups go through a [`RouteLocator`] over a shared group.

mod assembler;
mod consumer;
mod group;
mod locator;
mod route;
mod router;

pub use assembler::{
    ConsumerList, GroupAssembler, GroupSpec, QueueSpec, RouteDetails, RouteSpec, RoutingConfig,
};
pub use consumer::{Component, Consumer, ConsumerBinding};
pub use group::{Group, GroupConfig};
pub use locator::RouteLocator;
pub use route::{Route, RouteTable};
pub use router::{Registry, Router};
