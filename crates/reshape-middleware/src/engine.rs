//! The shaping engine shared by the async stage and the blocking entry point.

use std::sync::Arc;

use reshape_config::ShaperConfig;
use reshape_core::{Classifier, ExtractStyle, ShaperError};

use crate::context::{ShapeOutcome, SkipReason};
use crate::handlers::{
    error_envelope, DefaultErrorHandler, DefaultSuccessHandler, HandlerRegistry, ResponseHandler,
};
use crate::types::{Response, ResponseExt};

/// Configuration snapshot plus resolved handlers.
///
/// Built once from [`ShaperConfig`] and shared behind an `Arc`; nothing here
/// mutates after construction.
pub(crate) struct ShapeEngine {
    debug: bool,
    excluded_paths: Vec<String>,
    classifier: Classifier,
    success: Arc<dyn ResponseHandler>,
    error: Arc<dyn ResponseHandler>,
}

impl ShapeEngine {
    pub(crate) fn from_config(config: &ShaperConfig, registry: &HandlerRegistry) -> Self {
        let style = if config.error_as_map {
            ExtractStyle::Keyed
        } else {
            ExtractStyle::Leaf
        };
        Self {
            debug: config.debug,
            excluded_paths: config.excluded_paths.clone(),
            classifier: Classifier::new()
                .verbose(config.verbose_errors)
                .style(style),
            success: registry.resolve_or(&config.success_handler, Arc::new(DefaultSuccessHandler)),
            error: registry.resolve_or(
                &config.error_handler,
                Arc::new(DefaultErrorHandler::new(style)),
            ),
        }
    }

    /// Whether shaping is bypassed for this request path, and why.
    pub(crate) fn skip_reason(&self, path: &str) -> Option<SkipReason> {
        if self.debug {
            return Some(SkipReason::DebugMode);
        }
        if self
            .excluded_paths
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
        {
            return Some(SkipReason::ExcludedPath);
        }
        None
    }

    /// Shapes a downstream response. Non-JSON responses pass through; JSON
    /// responses are routed to the success or error handler on the 2xx
    /// boundary.
    pub(crate) fn shape_response(&self, response: Response) -> (Response, ShapeOutcome) {
        if !response.is_json() {
            return (response, ShapeOutcome::Passed(SkipReason::NotJson));
        }
        let handler = if response.status().is_success() {
            &self.success
        } else {
            &self.error
        };
        let shaped = handler.handle(response);
        let outcome = ShapeOutcome::Shaped {
            status_code: shaped.status().as_u16(),
        };
        (shaped, outcome)
    }

    /// Absorbs an escaped error into a classified envelope response.
    pub(crate) fn shape_error(&self, error: &ShaperError) -> Response {
        let classified = self.classifier.classify(error);
        error_envelope(classified.status_code, classified.message)
    }
}

impl std::fmt::Debug for ShapeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeEngine")
            .field("debug", &self.debug)
            .field("excluded_paths", &self.excluded_paths)
            .finish_non_exhaustive()
    }
}
