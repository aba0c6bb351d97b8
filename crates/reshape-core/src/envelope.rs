//! The canonical response envelope.
//!
//! An [`Envelope`] is an ordered JSON object paired with the HTTP status code
//! it must be served with. Constructors in [`crate::responses`] produce one
//! envelope per response shape; the middleware crate converts envelopes into
//! HTTP responses at the boundary.
//!
//! # Invariant
//!
//! `status_code` is the status the hosting pipeline must actually return.
//! Serializing the envelope yields only the JSON body; the status code
//! travels alongside it so the two cannot drift apart.

use http::StatusCode;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// The canonical JSON wrapper returned for every shaped response.
///
/// Key order is preserved, so clients always see fields in the order the
/// constructor inserted them (`status` first, extras last).
///
/// # Example
///
/// ```
/// use http::StatusCode;
/// use reshape_core::Envelope;
/// use serde_json::json;
///
/// let envelope = Envelope::new(StatusCode::OK)
///     .with("status", json!(true))
///     .with("data", json!({"id": 1}));
///
/// assert_eq!(envelope.status_code(), StatusCode::OK);
/// assert_eq!(envelope.get("data"), Some(&json!({"id": 1})));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    status_code: StatusCode,
    body: Map<String, Value>,
}

impl Envelope {
    /// Creates an empty envelope served with the given status code.
    #[must_use]
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            body: Map::new(),
        }
    }

    /// Inserts a field, consuming and returning the envelope.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.body.insert(key.into(), value);
        self
    }

    /// Inserts a field in place.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.body.insert(key.into(), value);
    }

    /// Returns the HTTP status code this envelope must be served with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    /// Returns a field of the body, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    /// Returns the ordered JSON body.
    #[must_use]
    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Returns the body as a [`Value`].
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.body.clone())
    }
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.body.serialize(serializer)
    }
}
