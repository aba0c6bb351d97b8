//! # Reshape
//!
//! **Consistent JSON response envelopes for HTTP services**
//!
//! Reshape rewrites handler responses and escaped errors into one canonical
//! JSON shape, so clients always see the same envelope regardless of which
//! handler produced the response or which error interrupted it:
//!
//! - **One envelope** - `{"status", "status_code", "error", "data"}` for
//!   every JSON response
//! - **Error absorption** - errors escaping handlers become classified
//!   envelopes instead of connection teardowns
//! - **Opt-out surface** - debug mode, excluded path prefixes, and non-JSON
//!   content all pass through untouched
//! - **Pluggable** - custom success/error handlers selected by name in
//!   configuration
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use reshape::prelude::*;
//!
//! let config = ShaperConfig::default();
//! let stack = Stack::builder()
//!     .layer(ShaperMiddleware::new(&config))
//!     .build();
//!
//! let outcome = stack.process(ShapeContext::new(), request, handler).await;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Request ──────────────────────────────→ Handler
//!                                            ↓
//! Response ← shape (envelope / classify) ←──┘
//! ```

#![doc(html_root_url = "https://docs.rs/reshape/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export envelope, classification, and constructor types
pub use reshape_core as core;

// Re-export the middleware stack
pub use reshape_middleware as middleware;

// Re-export configuration types
pub use reshape_config as config;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use reshape::prelude::*;
/// ```
pub mod prelude {
    pub use reshape_core::{
        extract_first_error, Classified, Classifier, Envelope, ExtractStyle, ShaperError,
        ShaperResult,
    };

    // Re-export the response constructors as a module
    pub use reshape_core::responses;

    // Re-export the stack and shaping stage
    pub use reshape_middleware::{
        into_streaming, BlockingShaper, HandlerRegistry, Middleware, Next, Outcome, Request,
        Response, ResponseExt, ResponseHandler, ShapeContext, ShapeOutcome, ShaperMiddleware,
        SkipReason, Stack,
    };

    // Re-export configuration
    pub use reshape_config::{check_config, ConfigLoader, ShaperConfig};
}
