//! Routing integration tests.

mod support;
mod locate;
mod registration;
