//! Pure envelope constructors, one per response shape.
//!
//! Every constructor builds an [`Envelope`] from named fields and performs no
//! validation beyond type pass-through; the caller is responsible for the
//! correctness of its inputs. Fields are inserted in a fixed order so the
//! serialized body is stable.
//!
//! The `status` field is textual here (`"success"` / `"error"`), which is
//! the constructor-family convention; the middleware's default handlers use
//! the boolean convention instead.

use chrono::Utc;
use http::StatusCode;
use serde_json::{json, Value};

use crate::envelope::Envelope;

/// Textual status for a success flag.
fn status_text(success: bool) -> Value {
    Value::String(if success { "success" } else { "error" }.to_owned())
}

fn opt_string(value: Option<String>) -> Value {
    value.map_or(Value::Null, Value::String)
}

fn opt_value(value: Option<Value>) -> Value {
    value.unwrap_or(Value::Null)
}

/// Generic success/error envelope: `status`, `message`, `data`, `errors`.
#[must_use]
pub fn api(
    success: bool,
    message: Option<String>,
    data: Option<Value>,
    errors: Option<Value>,
    status_code: StatusCode,
) -> Envelope {
    Envelope::new(status_code)
        .with("status", status_text(success))
        .with("message", opt_string(message))
        .with("data", opt_value(data))
        .with("errors", opt_value(errors))
}

/// Paginated envelope: the generic shape plus a `pagination` object with
/// `page`, `total_pages`, and `total_items`.
#[must_use]
pub fn paginated(
    success: bool,
    message: Option<String>,
    data: Option<Value>,
    errors: Option<Value>,
    status_code: StatusCode,
    page: Option<u64>,
    total_pages: Option<u64>,
    total_items: Option<u64>,
) -> Envelope {
    api(success, message, data, errors, status_code).with(
        "pagination",
        json!({
            "page": page,
            "total_pages": total_pages,
            "total_items": total_items,
        }),
    )
}

/// Error envelope: `status: "error"`, `message`, `error_code`, `errors`. No
/// `data` key.
#[must_use]
pub fn error(
    message: Option<String>,
    errors: Option<Value>,
    error_code: Option<String>,
    status_code: StatusCode,
) -> Envelope {
    Envelope::new(status_code)
        .with("status", status_text(false))
        .with("message", opt_string(message))
        .with("error_code", opt_string(error_code))
        .with("errors", opt_value(errors))
}

/// Minimal envelope: `status` and `message` only, no data key.
#[must_use]
pub fn minimal(message: &str, status_code: StatusCode) -> Envelope {
    Envelope::new(status_code)
        .with("status", status_text(true))
        .with("message", json!(message))
}

/// Envelope with a `meta` object: RFC 3339 timestamp, processing time, and
/// API version.
#[must_use]
pub fn metadata(
    success: bool,
    message: Option<String>,
    data: Option<Value>,
    errors: Option<Value>,
    status_code: StatusCode,
    processing_time: Option<String>,
    api_version: &str,
) -> Envelope {
    api(success, message, data, errors, status_code).with(
        "meta",
        json!({
            "timestamp": Utc::now().to_rfc3339(),
            "processing_time": processing_time,
            "api_version": api_version,
        }),
    )
}

/// HATEOAS envelope: the generic shape plus a `links` mapping of related
/// resources.
#[must_use]
pub fn hateoas(
    success: bool,
    message: Option<String>,
    data: Option<Value>,
    errors: Option<Value>,
    status_code: StatusCode,
    links: Option<Value>,
) -> Envelope {
    api(success, message, data, errors, status_code).with("links", opt_value(links))
}

/// Multi-resource envelope: named `resources` list instead of `data`.
#[must_use]
pub fn multi_resource(
    success: bool,
    message: Option<String>,
    resources: Option<Value>,
    errors: Option<Value>,
    status_code: StatusCode,
) -> Envelope {
    Envelope::new(status_code)
        .with("status", status_text(success))
        .with("message", opt_string(message))
        .with("resources", opt_value(resources))
        .with("errors", opt_value(errors))
}

/// Batch envelope: operation results under the fixed `batch_results` key.
#[must_use]
pub fn batch(
    success: bool,
    message: Option<String>,
    results: Option<Value>,
    errors: Option<Value>,
    status_code: StatusCode,
) -> Envelope {
    Envelope::new(status_code)
        .with("status", status_text(success))
        .with("message", opt_string(message))
        .with("batch_results", opt_value(results))
        .with("errors", opt_value(errors))
}

/// Authentication envelope: `token` and `user` fields.
#[must_use]
pub fn auth(
    success: bool,
    message: Option<String>,
    token: Option<String>,
    user: Option<Value>,
    errors: Option<Value>,
    status_code: StatusCode,
) -> Envelope {
    Envelope::new(status_code)
        .with("status", status_text(success))
        .with("message", opt_string(message))
        .with("token", opt_string(token))
        .with("user", opt_value(user))
        .with("errors", opt_value(errors))
}

/// Rate-limited envelope, served as 429 with an optional `retry_after` in
/// seconds.
#[must_use]
pub fn rate_limited(message: &str, retry_after: Option<u64>) -> Envelope {
    Envelope::new(StatusCode::TOO_MANY_REQUESTS)
        .with("status", status_text(false))
        .with("message", json!(message))
        .with("retry_after", json!(retry_after))
}

/// Upload-progress envelope: `progress` percentage, 0-100.
#[must_use]
pub fn upload_progress(
    success: bool,
    message: Option<String>,
    progress: Option<u8>,
    status_code: StatusCode,
) -> Envelope {
    Envelope::new(status_code)
        .with("status", status_text(success))
        .with("message", opt_string(message))
        .with("progress", json!(progress))
}

/// Service-availability envelope; `status` is `"available"` or
/// `"unavailable"`.
#[must_use]
pub fn service_availability(
    available: bool,
    message: Option<String>,
    service_name: Option<String>,
    status_code: StatusCode,
) -> Envelope {
    Envelope::new(status_code)
        .with(
            "status",
            json!(if available { "available" } else { "unavailable" }),
        )
        .with("message", opt_string(message))
        .with("service_name", opt_string(service_name))
}

/// Redirect envelope, served as 302 by default callers; `status` is
/// `"redirect"`.
#[must_use]
pub fn redirect(
    message: Option<String>,
    redirect_url: Option<String>,
    status_code: StatusCode,
) -> Envelope {
    Envelope::new(status_code)
        .with("status", json!("redirect"))
        .with("message", opt_string(message))
        .with("redirect_url", opt_string(redirect_url))
}
