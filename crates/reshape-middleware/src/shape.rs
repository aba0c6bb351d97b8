//! The response-shaping stage.
//!
//! [`ShaperMiddleware`] sits after the handler in stack order: it forwards
//! the request downstream, then rewrites whatever comes back. Two paths exist
//! on the way back:
//!
//! - `Ok(response)`: JSON responses are rewritten into the canonical
//!   envelope on a blocking thread, since handlers are synchronous and may
//!   be arbitrarily slow.
//! - `Err(error)`: the error is absorbed into a classified envelope and the
//!   outcome becomes `Ok`. Escaped errors never reach the connection.
//!
//! Skips (debug mode, excluded path) apply to both paths, except that a
//! skipped error propagates as `Err` so the host's own error surface still
//! sees it.

use std::sync::Arc;

use reshape_config::ShaperConfig;
use reshape_core::ShaperError;

use crate::context::{ShapeContext, ShapeOutcome};
use crate::engine::ShapeEngine;
use crate::handlers::HandlerRegistry;
use crate::middleware::{BoxFuture, Middleware, Next, Outcome};
use crate::types::Request;

/// The shaping stage.
///
/// # Example
///
/// ```ignore
/// let stack = Stack::builder()
///     .layer(ShaperMiddleware::new(&ShaperConfig::default()))
///     .build();
/// ```
#[derive(Debug)]
pub struct ShaperMiddleware {
    engine: Arc<ShapeEngine>,
}

impl ShaperMiddleware {
    /// Creates a shaper with the built-in default handlers.
    #[must_use]
    pub fn new(config: &ShaperConfig) -> Self {
        Self::with_registry(config, &HandlerRegistry::new())
    }

    /// Creates a shaper resolving configured handler names against a
    /// registry.
    #[must_use]
    pub fn with_registry(config: &ShaperConfig, registry: &HandlerRegistry) -> Self {
        Self {
            engine: Arc::new(ShapeEngine::from_config(config, registry)),
        }
    }
}

impl Middleware for ShaperMiddleware {
    fn name(&self) -> &'static str {
        "response_shaper"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut ShapeContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Outcome> {
        Box::pin(async move {
            // The request is consumed downstream; keep what the skip check needs.
            let path = request.uri().path().to_owned();

            match next.run(ctx, request).await {
                Ok(response) => {
                    if let Some(reason) = self.engine.skip_reason(&path) {
                        tracing::debug!(
                            request_id = %ctx.request_id(),
                            ?reason,
                            "shaping skipped"
                        );
                        ctx.set_outcome(ShapeOutcome::Passed(reason));
                        return Ok(response);
                    }

                    // Handlers are synchronous and may re-encode large bodies.
                    let engine = Arc::clone(&self.engine);
                    match tokio::task::spawn_blocking(move || engine.shape_response(response))
                        .await
                    {
                        Ok((shaped, outcome)) => {
                            ctx.set_outcome(outcome);
                            Ok(shaped)
                        }
                        Err(join_error) => {
                            tracing::error!(
                                request_id = %ctx.request_id(),
                                error = %join_error,
                                "response handler panicked"
                            );
                            let shaped = self
                                .engine
                                .shape_error(&ShaperError::other("response handler failed"));
                            ctx.set_outcome(ShapeOutcome::Shaped {
                                status_code: shaped.status().as_u16(),
                            });
                            Ok(shaped)
                        }
                    }
                }
                Err(error) => {
                    if let Some(reason) = self.engine.skip_reason(&path) {
                        ctx.set_outcome(ShapeOutcome::Passed(reason));
                        return Err(error);
                    }

                    tracing::error!(
                        request_id = %ctx.request_id(),
                        error = %error,
                        kind = error.kind().name(),
                        "absorbed downstream error"
                    );
                    let shaped = self.engine.shape_error(&error);
                    ctx.set_outcome(ShapeOutcome::Shaped {
                        status_code: shaped.status().as_u16(),
                    });
                    Ok(shaped)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SkipReason;
    use crate::types::{Response, ResponseExt};
    use bytes::Bytes;
    use http::StatusCode;
    use serde_json::{json, Value};

    fn request(path: &str) -> Request {
        http::Request::builder()
            .uri(path)
            .body(Bytes::new())
            .unwrap()
    }

    async fn run(
        shaper: &ShaperMiddleware,
        ctx: &mut ShapeContext,
        req: Request,
        outcome: Outcome,
    ) -> Outcome {
        let next = Next::handler(move |_ctx, _req| Box::pin(async move { outcome }));
        shaper.process(ctx, req, next).await
    }

    fn body_json(response: &Response) -> Value {
        serde_json::from_slice(response.body()).unwrap()
    }

    #[tokio::test]
    async fn success_responses_are_enveloped() {
        let shaper = ShaperMiddleware::new(&ShaperConfig::default());
        let mut ctx = ShapeContext::new();
        let downstream = Response::json(StatusCode::OK, &json!({"id": 1}));

        let shaped = run(&shaper, &mut ctx, request("/api/users/"), Ok(downstream))
            .await
            .unwrap();

        assert_eq!(body_json(&shaped)["status"], json!(true));
        assert_eq!(ctx.outcome(), Some(ShapeOutcome::Shaped { status_code: 200 }));
    }

    #[tokio::test]
    async fn errors_are_absorbed_into_envelopes() {
        let shaper = ShaperMiddleware::new(&ShaperConfig::default());
        let mut ctx = ShapeContext::new();

        let shaped = run(
            &shaper,
            &mut ctx,
            request("/api/users/7/"),
            Err(ShaperError::not_found("user 7")),
        )
        .await
        .unwrap();

        assert_eq!(shaped.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(&shaped)["error"], json!("Object not found"));
    }

    #[tokio::test]
    async fn debug_mode_passes_responses_and_propagates_errors() {
        let config = ShaperConfig::builder().debug(true).build();
        let shaper = ShaperMiddleware::new(&config);

        let mut ctx = ShapeContext::new();
        let raw = Response::json(StatusCode::OK, &json!({"id": 1}));
        let body = raw.body().clone();
        let passed = run(&shaper, &mut ctx, request("/api/users/"), Ok(raw))
            .await
            .unwrap();
        assert_eq!(passed.body(), &body);
        assert_eq!(
            ctx.outcome(),
            Some(ShapeOutcome::Passed(SkipReason::DebugMode))
        );

        let mut ctx = ShapeContext::new();
        let outcome = run(
            &shaper,
            &mut ctx,
            request("/api/users/"),
            Err(ShaperError::other("boom")),
        )
        .await;
        assert!(outcome.is_err());
    }

    #[tokio::test]
    async fn excluded_paths_pass_through() {
        let shaper = ShaperMiddleware::new(&ShaperConfig::default());
        let mut ctx = ShapeContext::new();
        let raw = Response::json(StatusCode::OK, &json!({"schema": {}}));
        let body = raw.body().clone();

        let passed = run(&shaper, &mut ctx, request("/docs/openapi.json"), Ok(raw))
            .await
            .unwrap();

        assert_eq!(passed.body(), &body);
        assert_eq!(
            ctx.outcome(),
            Some(ShapeOutcome::Passed(SkipReason::ExcludedPath))
        );
    }

    #[tokio::test]
    async fn non_json_responses_pass_through() {
        let shaper = ShaperMiddleware::new(&ShaperConfig::default());
        let mut ctx = ShapeContext::new();
        let html = http::Response::builder()
            .status(StatusCode::OK)
            .header(http::header::CONTENT_TYPE, "text/html")
            .body(Bytes::from_static(b"<p>hi</p>"))
            .unwrap();

        let passed = run(&shaper, &mut ctx, request("/page/"), Ok(html))
            .await
            .unwrap();

        assert_eq!(passed.body().as_ref(), b"<p>hi</p>");
        assert_eq!(
            ctx.outcome(),
            Some(ShapeOutcome::Passed(SkipReason::NotJson))
        );
    }
}
