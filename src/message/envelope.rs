//! Immutable message envelope.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::header;

/// Header map carried by an envelope.
pub type Headers = BTreeMap<String, Value>;

/// A message payload together with its headers.
///
/// Envelopes are never mutated in place: every header change returns a new
/// envelope, so a caller holding the original keeps seeing the original.
///
/// ## Example
///
/// ```
/// use routed_rust::message::{header, Envelope};
/// use serde_json::json;
///
/// let message = Envelope::for_type("Withdraw", json!({ "amount": 10 }));
/// let dispatched = message.with_header(header::EVENT_DISPATCHED, true);
///
/// assert!(message.has_not(header::EVENT_DISPATCHED));
/// assert_eq!(dispatched.header(header::EVENT_DISPATCHED), Some(&json!(true)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    headers: Headers,
    #[serde(rename = "body", default)]
    payload: Value,
}

impl Envelope {
    /// Create an envelope without headers.
    pub fn new(payload: Value) -> Self {
        Self {
            headers: Headers::new(),
            payload,
        }
    }

    /// Create an envelope with the given headers.
    pub fn with_headers(payload: Value, headers: Headers) -> Self {
        Self { headers, payload }
    }

    /// Create an envelope routed by `message_type`.
    pub fn for_type(message_type: impl Into<String>, payload: Value) -> Self {
        let mut headers = Headers::new();
        headers.insert(
            header::EVENT_TYPE.to_string(),
            Value::String(message_type.into()),
        );
        Self { headers, payload }
    }

    /// Return a copy with `key` set to `value`.
    pub fn with_header(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut headers = self.headers.clone();
        headers.insert(key.into(), value.into());
        Self {
            headers,
            payload: self.payload.clone(),
        }
    }

    /// Return a copy without `key`.
    pub fn without_header(&self, key: &str) -> Self {
        let mut headers = self.headers.clone();
        headers.remove(key);
        Self {
            headers,
            payload: self.payload.clone(),
        }
    }

    pub fn header(&self, key: &str) -> Option<&Value> {
        self.headers.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.headers.contains_key(key)
    }

    pub fn has_not(&self, key: &str) -> bool {
        !self.has(key)
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// The routing key, if the `__event_type` header holds a string.
    pub fn message_type(&self) -> Option<&str> {
        self.header(header::EVENT_TYPE).and_then(Value::as_str)
    }
}
