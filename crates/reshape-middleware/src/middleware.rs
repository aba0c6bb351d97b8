//! Core middleware trait and chain types.
//!
//! A stage receives the request, a mutable [`ShapeContext`], and a [`Next`]
//! callback for the rest of the chain. Downstream work yields an [`Outcome`]:
//! `Ok` with a buffered response, or `Err` with a [`ShaperError`] that
//! escaped the handler. Errors are first-class here because the shaper's job
//! is to absorb them into envelopes rather than let them tear down the
//! connection.
//!
//! # Example
//!
//! ```ignore
//! use reshape_middleware::{Middleware, Next, Outcome, Request, BoxFuture, ShapeContext};
//!
//! struct Timing;
//!
//! impl Middleware for Timing {
//!     fn name(&self) -> &'static str {
//!         "timing"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         ctx: &'a mut ShapeContext,
//!         request: Request,
//!         next: Next<'a>,
//!     ) -> BoxFuture<'a, Outcome> {
//!         Box::pin(async move {
//!             let outcome = next.run(ctx, request).await;
//!             tracing::debug!(elapsed = ?ctx.elapsed(), "request finished");
//!             outcome
//!         })
//!     }
//! }
//! ```

use std::future::Future;
use std::pin::Pin;

use reshape_core::ShaperError;

use crate::context::ShapeContext;
use crate::types::{Request, Response};

/// A boxed future, the return type of middleware stages.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The result of running downstream work: a buffered response, or the error
/// that escaped it.
pub type Outcome = Result<Response, ShaperError>;

/// A stage in the shaping stack.
///
/// # Invariants
///
/// - A stage calls `next.run()` exactly once unless it short-circuits.
/// - A stage must not panic; escaped errors travel as `Err` outcomes.
pub trait Middleware: Send + Sync + 'static {
    /// Unique stage name, used in log records.
    fn name(&self) -> &'static str;

    /// Processes the request through this stage.
    fn process<'a>(
        &'a self,
        ctx: &'a mut ShapeContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Outcome>;
}

/// Callback invoking the remainder of the chain.
///
/// Consumed on use, so it can only be called once.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    Chain {
        middleware: &'a dyn Middleware,
        next: Box<Next<'a>>,
    },
    Handler(Box<dyn FnOnce(&mut ShapeContext, Request) -> BoxFuture<'static, Outcome> + Send + 'a>),
}

impl<'a> Next<'a> {
    /// Creates a `Next` that will invoke the given stage.
    pub(crate) fn new(middleware: &'a dyn Middleware, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                middleware,
                next: Box::new(next),
            },
        }
    }

    /// Creates the terminal `Next` that invokes the handler.
    pub(crate) fn handler<F>(f: F) -> Self
    where
        F: FnOnce(&mut ShapeContext, Request) -> BoxFuture<'static, Outcome> + Send + 'a,
    {
        Self {
            inner: NextInner::Handler(Box::new(f)),
        }
    }

    /// Invokes the next stage or the handler.
    pub async fn run(self, ctx: &mut ShapeContext, request: Request) -> Outcome {
        match self.inner {
            NextInner::Chain { middleware, next } => middleware.process(ctx, request, *next).await,
            NextInner::Handler(handler) => handler(ctx, request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::StatusCode;

    struct PassThrough;

    impl Middleware for PassThrough {
        fn name(&self) -> &'static str {
            "pass_through"
        }

        fn process<'a>(
            &'a self,
            ctx: &'a mut ShapeContext,
            request: Request,
            next: Next<'a>,
        ) -> BoxFuture<'a, Outcome> {
            Box::pin(next.run(ctx, request))
        }
    }

    fn ok_handler(_ctx: &mut ShapeContext, _req: Request) -> BoxFuture<'static, Outcome> {
        Box::pin(async {
            Ok(http::Response::builder()
                .status(StatusCode::OK)
                .body(Bytes::from_static(b"OK"))
                .unwrap())
        })
    }

    #[tokio::test]
    async fn terminal_next_invokes_handler() {
        let mut ctx = ShapeContext::new();
        let request = http::Request::builder()
            .uri("/test")
            .body(Bytes::new())
            .unwrap();

        let next = Next::handler(ok_handler);
        let response = next.run(&mut ctx, request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn chain_reaches_handler_through_stages() {
        let stage = PassThrough;
        let mut ctx = ShapeContext::new();
        let request = http::Request::builder()
            .uri("/test")
            .body(Bytes::new())
            .unwrap();

        let next = Next::new(&stage, Next::handler(ok_handler));
        let response = next.run(&mut ctx, request).await.unwrap();
        assert_eq!(response.body().as_ref(), b"OK");
    }

    #[tokio::test]
    async fn handler_errors_travel_as_outcomes() {
        let mut ctx = ShapeContext::new();
        let request = http::Request::builder()
            .uri("/test")
            .body(Bytes::new())
            .unwrap();

        let next = Next::handler(|_ctx, _req| {
            Box::pin(async { Err(ShaperError::not_found("user 7")) })
        });
        let outcome = next.run(&mut ctx, request).await;
        assert!(outcome.is_err());
    }
}
