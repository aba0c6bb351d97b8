//! HTTP type aliases and boundary conversions.
//!
//! Shaping needs complete payloads: handlers decode and re-encode the body,
//! so the stack works on buffered [`Bytes`] bodies. [`into_streaming`]
//! converts a shaped response back into a streaming body at the hyper
//! boundary.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::StatusCode;
use http_body_util::Full;
use serde_json::Value;

use reshape_core::Envelope;

/// An incoming HTTP request with a fully buffered body.
pub type Request = http::Request<Bytes>;

/// An outgoing HTTP response with a fully buffered body.
pub type Response = http::Response<Bytes>;

/// Convenience constructors and predicates for buffered responses.
pub trait ResponseExt: Sized {
    /// Builds a JSON response from an envelope, serving it with the
    /// envelope's status code.
    fn from_envelope(envelope: &Envelope) -> Self;

    /// Builds a JSON response with the given status and body.
    fn json(status: StatusCode, body: &Value) -> Self;

    /// Whether the `Content-Type` header declares a JSON payload.
    fn is_json(&self) -> bool;
}

impl ResponseExt for Response {
    fn from_envelope(envelope: &Envelope) -> Self {
        Self::json(envelope.status_code(), &envelope.to_value())
    }

    fn json(status: StatusCode, body: &Value) -> Self {
        let payload = serde_json::to_vec(body).unwrap_or_default();
        http::Response::builder()
            .status(status)
            .header(CONTENT_TYPE, "application/json")
            .body(Bytes::from(payload))
            .expect("static response parts are valid")
    }

    fn is_json(&self) -> bool {
        self.headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim_start().starts_with("application/json"))
    }
}

/// Converts a buffered response into a streaming-body response for the
/// server boundary.
#[must_use]
pub fn into_streaming(response: Response) -> http::Response<Full<Bytes>> {
    let (parts, body) = response.into_parts();
    http::Response::from_parts(parts, Full::new(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_response_carries_content_type() {
        let response = Response::json(StatusCode::OK, &json!({"ok": true}));
        assert!(response.is_json());
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_ref(), br#"{"ok":true}"#);
    }

    #[test]
    fn envelope_status_becomes_response_status() {
        let envelope = Envelope::new(StatusCode::NOT_FOUND).with("status", json!(false));
        let response = Response::from_envelope(&envelope);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn json_detection_allows_parameters() {
        let response = http::Response::builder()
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body(Bytes::new())
            .unwrap();
        assert!(response.is_json());

        let html = http::Response::builder()
            .header(CONTENT_TYPE, "text/html")
            .body(Bytes::new())
            .unwrap();
        assert!(!html.is_json());
    }

    #[test]
    fn missing_content_type_is_not_json() {
        let response = http::Response::builder().body(Bytes::new()).unwrap();
        assert!(!response.is_json());
    }

    #[test]
    fn streaming_conversion_keeps_parts() {
        let response = Response::json(StatusCode::CREATED, &json!({"id": 1}));
        let streaming = into_streaming(response);
        assert_eq!(streaming.status(), StatusCode::CREATED);
    }
}
