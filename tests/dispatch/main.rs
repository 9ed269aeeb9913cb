//! Dispatch integration tests.

mod support;
mod redelivery;
mod withdraw;
