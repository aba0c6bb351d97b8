//! # Reshape Middleware
//!
//! The response-shaping stack: a small, fixed-purpose middleware chain that
//! rewrites handler responses and escaped errors into the canonical JSON
//! envelope defined by `reshape-core`.
//!
//! ## Architecture
//!
//! - [`Middleware`] / [`Next`] - the chain abstraction; stages wrap the
//!   handler and each other
//! - [`Stack`] - an ordered, immutable set of stages
//! - [`ShaperMiddleware`] - the shaping stage itself, driven by a
//!   [`ShaperConfig`](reshape_config::ShaperConfig)
//! - [`BlockingShaper`] - the same engine for hosts without a runtime
//! - [`HandlerRegistry`] - named custom success/error handlers
//!
//! ## Example
//!
//! ```ignore
//! use reshape_config::ShaperConfig;
//! use reshape_middleware::{ShapeContext, ShaperMiddleware, Stack};
//!
//! let stack = Stack::builder()
//!     .layer(ShaperMiddleware::new(&ShaperConfig::default()))
//!     .build();
//!
//! let outcome = stack.process(ShapeContext::new(), request, handler).await;
//! ```

#![doc(html_root_url = "https://docs.rs/reshape-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod blocking;
pub mod context;
mod engine;
mod handlers;
mod middleware;
mod shape;
mod stack;
mod types;

pub use blocking::BlockingShaper;
pub use context::{ShapeContext, ShapeOutcome, SkipReason};
pub use handlers::{DefaultErrorHandler, DefaultSuccessHandler, HandlerRegistry, ResponseHandler};
pub use middleware::{BoxFuture, Middleware, Next, Outcome};
pub use shape::ShaperMiddleware;
pub use stack::{BoxedMiddleware, Stack, StackBuilder};
pub use types::{into_streaming, Request, Response, ResponseExt};
