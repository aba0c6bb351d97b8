//! The middleware stack.
//!
//! Stages run in the order they were layered; the chain is rebuilt from back
//! to front for every request so stages borrow rather than clone.

use std::sync::Arc;

use crate::context::ShapeContext;
use crate::middleware::{BoxFuture, Middleware, Next, Outcome};
use crate::types::Request;

/// A type-erased stage.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// An ordered, immutable stack of middleware stages.
///
/// # Example
///
/// ```ignore
/// use reshape_middleware::{Stack, ShaperMiddleware, ShapeContext};
///
/// let stack = Stack::builder()
///     .layer(ShaperMiddleware::new(&config))
///     .build();
///
/// let outcome = stack.process(ShapeContext::new(), request, handler).await;
/// ```
pub struct Stack {
    stages: Vec<BoxedMiddleware>,
}

impl Stack {
    /// Creates a stack builder.
    #[must_use]
    pub fn builder() -> StackBuilder {
        StackBuilder::new()
    }

    /// Runs a request through every stage and the terminal handler.
    pub async fn process<H>(&self, mut ctx: ShapeContext, request: Request, handler: H) -> Outcome
    where
        H: FnOnce(&mut ShapeContext, Request) -> BoxFuture<'static, Outcome> + Send + 'static,
    {
        let next = self.build_chain(handler);
        next.run(&mut ctx, request).await
    }

    /// Builds the chain from back to front.
    fn build_chain<'a, H>(&'a self, handler: H) -> Next<'a>
    where
        H: FnOnce(&mut ShapeContext, Request) -> BoxFuture<'static, Outcome> + Send + 'a,
    {
        let mut next = Next::handler(handler);
        for middleware in self.stages.iter().rev() {
            next = Next::new(middleware.as_ref(), next);
        }
        next
    }

    /// Stage names in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|m| m.name()).collect()
    }

    /// Number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

/// Builder for a [`Stack`].
#[derive(Default)]
pub struct StackBuilder {
    stages: Vec<BoxedMiddleware>,
}

impl StackBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Appends a stage. Stages run in the order they are layered.
    #[must_use]
    pub fn layer<M: Middleware>(mut self, middleware: M) -> Self {
        self.stages.push(Arc::new(middleware));
        self
    }

    /// Builds the stack.
    #[must_use]
    pub fn build(self) -> Stack {
        Stack {
            stages: self.stages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::StatusCode;
    use std::sync::Mutex;

    struct Recorder {
        name: &'static str,
        order: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Middleware for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn process<'a>(
            &'a self,
            ctx: &'a mut ShapeContext,
            request: Request,
            next: Next<'a>,
        ) -> BoxFuture<'a, Outcome> {
            let order = Arc::clone(&self.order);
            let name = self.name;
            Box::pin(async move {
                order.lock().unwrap().push(name);
                next.run(ctx, request).await
            })
        }
    }

    #[tokio::test]
    async fn stages_run_in_layer_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let stack = Stack::builder()
            .layer(Recorder {
                name: "first",
                order: Arc::clone(&order),
            })
            .layer(Recorder {
                name: "second",
                order: Arc::clone(&order),
            })
            .build();

        let request = http::Request::builder()
            .uri("/test")
            .body(Bytes::new())
            .unwrap();

        let outcome = stack
            .process(ShapeContext::new(), request, |_ctx, _req| {
                Box::pin(async {
                    Ok(http::Response::builder()
                        .status(StatusCode::OK)
                        .body(Bytes::new())
                        .unwrap())
                })
            })
            .await;

        assert!(outcome.is_ok());
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
        assert_eq!(stack.stage_names(), vec!["first", "second"]);
        assert_eq!(stack.stage_count(), 2);
    }

    #[tokio::test]
    async fn empty_stack_runs_handler_directly() {
        let stack = Stack::builder().build();
        let request = http::Request::builder()
            .uri("/test")
            .body(Bytes::new())
            .unwrap();

        let response = stack
            .process(ShapeContext::new(), request, |_ctx, _req| {
                Box::pin(async {
                    Ok(http::Response::builder()
                        .status(StatusCode::NO_CONTENT)
                        .body(Bytes::new())
                        .unwrap())
                })
            })
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
