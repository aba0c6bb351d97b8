//! Synchronous entry point for hosts without an async runtime.
//!
//! [`BlockingShaper`] applies the same engine as the async stage but invokes
//! the handler inline on the calling thread. Semantics are identical: same
//! skips, same envelopes, same error absorption.

use std::sync::Arc;

use reshape_config::ShaperConfig;

use crate::context::{ShapeContext, ShapeOutcome};
use crate::engine::ShapeEngine;
use crate::handlers::HandlerRegistry;
use crate::middleware::Outcome;
use crate::types::Request;

/// Blocking counterpart of the shaping stage.
///
/// # Example
///
/// ```ignore
/// let shaper = BlockingShaper::new(&ShaperConfig::default());
/// let mut ctx = ShapeContext::new();
/// let outcome = shaper.call(&mut ctx, request, |req| handle(req));
/// ```
#[derive(Debug)]
pub struct BlockingShaper {
    engine: Arc<ShapeEngine>,
}

impl BlockingShaper {
    /// Creates a blocking shaper with the built-in default handlers.
    #[must_use]
    pub fn new(config: &ShaperConfig) -> Self {
        Self::with_registry(config, &HandlerRegistry::new())
    }

    /// Creates a blocking shaper resolving configured handler names against
    /// a registry.
    #[must_use]
    pub fn with_registry(config: &ShaperConfig, registry: &HandlerRegistry) -> Self {
        Self {
            engine: Arc::new(ShapeEngine::from_config(config, registry)),
        }
    }

    /// Runs the handler and shapes its outcome.
    pub fn call<F>(&self, ctx: &mut ShapeContext, request: Request, handler: F) -> Outcome
    where
        F: FnOnce(Request) -> Outcome,
    {
        let path = request.uri().path().to_owned();

        match handler(request) {
            Ok(response) => {
                if let Some(reason) = self.engine.skip_reason(&path) {
                    ctx.set_outcome(ShapeOutcome::Passed(reason));
                    return Ok(response);
                }
                let (shaped, outcome) = self.engine.shape_response(response);
                ctx.set_outcome(outcome);
                Ok(shaped)
            }
            Err(error) => {
                if let Some(reason) = self.engine.skip_reason(&path) {
                    ctx.set_outcome(ShapeOutcome::Passed(reason));
                    return Err(error);
                }
                tracing::error!(
                    request_id = %ctx.request_id(),
                    error = %error,
                    "absorbed downstream error"
                );
                let shaped = self.engine.shape_error(&error);
                ctx.set_outcome(ShapeOutcome::Shaped {
                    status_code: shaped.status().as_u16(),
                });
                Ok(shaped)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Response, ResponseExt};
    use bytes::Bytes;
    use http::StatusCode;
    use reshape_core::ShaperError;
    use serde_json::{json, Value};

    fn request(path: &str) -> Request {
        http::Request::builder()
            .uri(path)
            .body(Bytes::new())
            .unwrap()
    }

    fn body_json(response: &Response) -> Value {
        serde_json::from_slice(response.body()).unwrap()
    }

    #[test]
    fn shapes_success_without_a_runtime() {
        let shaper = BlockingShaper::new(&ShaperConfig::default());
        let mut ctx = ShapeContext::new();

        let shaped = shaper
            .call(&mut ctx, request("/api/items/"), |_req| {
                Ok(Response::json(StatusCode::OK, &json!([1, 2])))
            })
            .unwrap();

        assert_eq!(
            body_json(&shaped),
            json!({
                "status": true,
                "status_code": 200,
                "error": null,
                "data": [1, 2],
            })
        );
    }

    #[test]
    fn absorbs_errors_inline() {
        let shaper = BlockingShaper::new(&ShaperConfig::default());
        let mut ctx = ShapeContext::new();

        let shaped = shaper
            .call(&mut ctx, request("/api/items/"), |_req| {
                Err(ShaperError::operational("connection refused"))
            })
            .unwrap();

        assert_eq!(shaped.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body_json(&shaped)["error"],
            json!("A Database Error Occurred")
        );
    }

    #[test]
    fn excluded_path_propagates_error() {
        let shaper = BlockingShaper::new(&ShaperConfig::default());
        let mut ctx = ShapeContext::new();

        let outcome = shaper.call(&mut ctx, request("/admin/items/"), |_req| {
            Err(ShaperError::other("boom"))
        });
        assert!(outcome.is_err());
    }
}
