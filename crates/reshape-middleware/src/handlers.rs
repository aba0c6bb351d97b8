//! Response handlers and the handler registry.
//!
//! A [`ResponseHandler`] rewrites one buffered response into its shaped form.
//! The built-in defaults produce the canonical envelope; hosts can register
//! replacements under a name and select them in configuration. Handler names
//! that resolve to nothing fall back to the defaults with a warning, never an
//! error, so a typo in configuration degrades instead of breaking traffic.

use std::collections::HashMap;
use std::sync::Arc;

use http::StatusCode;
use serde_json::{json, Value};

use reshape_core::{extract_first_error, Envelope, ExtractStyle};

use crate::types::{Response, ResponseExt};

/// Rewrites a buffered response into its shaped form.
///
/// Handlers are synchronous; the async stage offloads them so slow rewrites
/// cannot stall the scheduler.
pub trait ResponseHandler: Send + Sync {
    /// Shapes the response. Implementations must keep the response's status
    /// code authoritative for the envelope's `status_code` field.
    fn handle(&self, response: Response) -> Response;
}

/// Named registry of custom response handlers.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    entries: HashMap<String, Arc<dyn ResponseHandler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under a name, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, handler: Arc<dyn ResponseHandler>) {
        self.entries.insert(name.into(), handler);
    }

    /// Looks up a handler by name.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn ResponseHandler>> {
        self.entries.get(name).cloned()
    }

    /// Resolves a configured name, falling back to the default. An empty
    /// name means "use the default"; an unknown name warns and falls back.
    pub(crate) fn resolve_or(
        &self,
        name: &str,
        default: Arc<dyn ResponseHandler>,
    ) -> Arc<dyn ResponseHandler> {
        if name.is_empty() {
            return default;
        }
        match self.resolve(name) {
            Some(handler) => handler,
            None => {
                tracing::warn!(handler = name, "handler not registered, using default");
                default
            }
        }
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("entries", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builds the canonical error envelope as a response.
pub(crate) fn error_envelope(status: StatusCode, message: Value) -> Response {
    let envelope = Envelope::new(status)
        .with("status", json!(false))
        .with("status_code", json!(status.as_u16()))
        .with("error", message)
        .with("data", json!({}));
    Response::from_envelope(&envelope)
}

/// Whether a decoded payload already carries the envelope's required fields.
/// Shaping such a payload again would double-wrap it.
fn is_already_shaped(payload: &Value) -> bool {
    payload.as_object().is_some_and(|body| {
        body.get("status").is_some_and(Value::is_boolean)
            && body.get("status_code").is_some_and(Value::is_number)
            && body.contains_key("data")
    })
}

/// The built-in success handler.
///
/// Wraps a 2xx JSON payload as
/// `{"status": true, "status_code": N, "error": null, "data": <payload>}`.
/// Already-shaped payloads pass through untouched, so shaping is idempotent.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSuccessHandler;

impl ResponseHandler for DefaultSuccessHandler {
    fn handle(&self, response: Response) -> Response {
        let status = response.status();
        let data: Value = if response.body().is_empty() {
            Value::Null
        } else {
            match serde_json::from_slice(response.body()) {
                Ok(value) => value,
                Err(error) => {
                    // Declared JSON but does not parse; leave it alone.
                    tracing::debug!(%error, "unparseable JSON body passed through");
                    return response;
                }
            }
        };

        if is_already_shaped(&data) {
            return response;
        }

        let envelope = Envelope::new(status)
            .with("status", json!(true))
            .with("status_code", json!(status.as_u16()))
            .with("error", Value::Null)
            .with("data", data);
        Response::from_envelope(&envelope)
    }
}

/// The built-in error handler for non-2xx JSON responses.
///
/// Runs the first-error extractor over the existing payload and produces
/// `{"status": false, "status_code": N, "error": <extracted>, "data": {}}`
/// served with the original status code.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorHandler {
    style: ExtractStyle,
}

impl DefaultErrorHandler {
    /// Creates an error handler with the given extraction style.
    #[must_use]
    pub fn new(style: ExtractStyle) -> Self {
        Self { style }
    }
}

impl ResponseHandler for DefaultErrorHandler {
    fn handle(&self, response: Response) -> Response {
        let status = response.status();
        let message = if response.body().is_empty() {
            Value::Null
        } else {
            match serde_json::from_slice::<Value>(response.body()) {
                Ok(payload) => extract_first_error(&payload, self.style),
                Err(_) => Value::String(String::from_utf8_lossy(response.body()).into_owned()),
            }
        };
        error_envelope(status, message)
    }
}
