//! Messages as seen by the router: envelopes, header keys and the catalog of
//! routable types.

mod catalog;
mod envelope;
pub mod header;

pub use catalog::{AsyncMarker, Message, MessageCatalog};
pub use envelope::{Envelope, Headers};
