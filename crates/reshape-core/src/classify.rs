//! Error classification: kind to (status code, message).
//!
//! The [`Classifier`] holds an ordered rule table. Lookup tries an exact
//! [`ErrorKind`](crate::ErrorKind) entry first, then walks category rules in
//! declaration order testing membership, then falls back to a generic 500.
//! Classification is total: it never fails and never panics.
//!
//! In verbose mode the message becomes a diagnostic object carrying the
//! error's display string, its kind name, and the source-chain trace. Verbose
//! mode is for development; the fixed phrases are what production clients
//! see.

use http::StatusCode;
use serde_json::{json, Value};

use crate::error::{Category, ErrorKind, ShaperError};
use crate::extract::{extract_first_error, ExtractStyle};

/// The outcome of classifying an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    /// HTTP status the envelope must be served with.
    pub status_code: StatusCode,
    /// Client-facing message: a fixed phrase, an extracted error leaf, or a
    /// verbose diagnostic object.
    pub message: Value,
}

/// How a rule produces its message.
#[derive(Debug, Clone, Copy)]
enum MessageStrategy {
    /// Always the fixed phrase, even in verbose mode.
    Fixed(&'static str),
    /// The fixed phrase, replaced by a diagnostic object in verbose mode.
    Debuggable(&'static str),
    /// Run the first-error extractor over the validation tree; diagnostic
    /// object in verbose mode.
    Extracted,
}

/// A category fallback rule, tested in declaration order when no exact kind
/// entry matched.
struct CategoryRule {
    category: Category,
    status: StatusCode,
    strategy: MessageStrategy,
}

/// Rules for kinds that gain members without an exact table entry. Ordering
/// matters: more specific categories come first.
const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::NotFound,
        status: StatusCode::NOT_FOUND,
        strategy: MessageStrategy::Fixed("Resource not found"),
    },
    CategoryRule {
        category: Category::Validation,
        status: StatusCode::BAD_REQUEST,
        strategy: MessageStrategy::Extracted,
    },
    CategoryRule {
        category: Category::BadRequest,
        status: StatusCode::BAD_REQUEST,
        strategy: MessageStrategy::Debuggable("Bad request"),
    },
    CategoryRule {
        category: Category::Forbidden,
        status: StatusCode::FORBIDDEN,
        strategy: MessageStrategy::Fixed("Permission denied"),
    },
    CategoryRule {
        category: Category::Misconfiguration,
        status: StatusCode::INTERNAL_SERVER_ERROR,
        strategy: MessageStrategy::Debuggable("Internal Server Error"),
    },
    CategoryRule {
        category: Category::Database,
        status: StatusCode::INTERNAL_SERVER_ERROR,
        strategy: MessageStrategy::Debuggable("A Database Error Occurred"),
    },
];

/// Maps errors reaching the shaper to an HTTP status and message.
///
/// # Example
///
/// ```
/// use http::StatusCode;
/// use reshape_core::{Classifier, ShaperError};
///
/// let classifier = Classifier::new();
/// let classified = classifier.classify(&ShaperError::not_found("user 7"));
/// assert_eq!(classified.status_code, StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    verbose: bool,
    style: ExtractStyle,
}

impl Classifier {
    /// Creates a classifier with fixed production messages and the canonical
    /// keyed extraction style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables verbose diagnostics.
    ///
    /// **Warning**: verbose messages expose internals; development only.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets the extraction style used for validation trees.
    #[must_use]
    pub fn style(mut self, style: ExtractStyle) -> Self {
        self.style = style;
        self
    }

    /// Classifies an error. Total; never fails.
    #[must_use]
    pub fn classify(&self, error: &ShaperError) -> Classified {
        let kind = error.kind();

        if let Some((status, strategy)) = Self::exact_rule(kind) {
            return self.resolve(status, strategy, error);
        }

        for rule in CATEGORY_RULES {
            if kind.is_a(rule.category) {
                return self.resolve(rule.status, rule.strategy, error);
            }
        }

        self.resolve(
            StatusCode::INTERNAL_SERVER_ERROR,
            MessageStrategy::Debuggable("Internal Server Error"),
            error,
        )
    }

    /// The exact-kind table. Declaration order mirrors the bucket list in the
    /// module docs; kinds absent here fall through to [`CATEGORY_RULES`].
    const fn exact_rule(kind: ErrorKind) -> Option<(StatusCode, MessageStrategy)> {
        Some(match kind {
            // Not found
            ErrorKind::FieldMissing => (
                StatusCode::NOT_FOUND,
                MessageStrategy::Fixed("Field does not exist"),
            ),
            ErrorKind::NotFound => (
                StatusCode::NOT_FOUND,
                MessageStrategy::Fixed("Object not found"),
            ),
            ErrorKind::EmptyResult => (
                StatusCode::NOT_FOUND,
                MessageStrategy::Fixed("No results found"),
            ),
            // Bad request
            ErrorKind::MultipleReturned => (
                StatusCode::BAD_REQUEST,
                MessageStrategy::Debuggable("Multiple objects returned"),
            ),
            ErrorKind::Suspicious => (
                StatusCode::BAD_REQUEST,
                MessageStrategy::Debuggable("Suspicious operation detected"),
            ),
            ErrorKind::DisallowedHost => (
                StatusCode::BAD_REQUEST,
                MessageStrategy::Debuggable("Invalid host header"),
            ),
            ErrorKind::DisallowedRedirect => (
                StatusCode::BAD_REQUEST,
                MessageStrategy::Debuggable("Disallowed redirect"),
            ),
            ErrorKind::Malformed => (
                StatusCode::BAD_REQUEST,
                MessageStrategy::Debuggable("Bad request"),
            ),
            // Permission
            ErrorKind::Forbidden => (
                StatusCode::FORBIDDEN,
                MessageStrategy::Fixed("Permission denied"),
            ),
            // Process setup
            ErrorKind::Misconfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                MessageStrategy::Debuggable("Internal Server Error"),
            ),
            // Field & validation
            ErrorKind::InvalidField => (
                StatusCode::BAD_REQUEST,
                MessageStrategy::Debuggable("Field error"),
            ),
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, MessageStrategy::Extracted),
            // Database family
            ErrorKind::Integrity => (
                StatusCode::BAD_REQUEST,
                MessageStrategy::Debuggable("A Database Error Occurred"),
            ),
            ErrorKind::Programming => (
                StatusCode::INTERNAL_SERVER_ERROR,
                MessageStrategy::Debuggable("A Database Error Occurred"),
            ),
            ErrorKind::Operational => (
                StatusCode::SERVICE_UNAVAILABLE,
                MessageStrategy::Debuggable("A Database Error Occurred"),
            ),
            ErrorKind::InvalidData => (
                StatusCode::BAD_REQUEST,
                MessageStrategy::Debuggable("A Database Error Occurred"),
            ),
            ErrorKind::DatabaseInternal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                MessageStrategy::Debuggable("A Database Error Occurred"),
            ),
            ErrorKind::Database => (
                StatusCode::INTERNAL_SERVER_ERROR,
                MessageStrategy::Debuggable("A Database Error Occurred"),
            ),
            ErrorKind::Other => return None,
        })
    }

    fn resolve(
        &self,
        status: StatusCode,
        strategy: MessageStrategy,
        error: &ShaperError,
    ) -> Classified {
        let message = match strategy {
            MessageStrategy::Fixed(phrase) => Value::String(phrase.to_owned()),
            MessageStrategy::Debuggable(phrase) => {
                if self.verbose {
                    Self::diagnostic(error)
                } else {
                    Value::String(phrase.to_owned())
                }
            }
            MessageStrategy::Extracted => {
                if self.verbose {
                    Self::diagnostic(error)
                } else if let ShaperError::Validation { errors } = error {
                    extract_first_error(errors, self.style)
                } else {
                    Value::String("Validation error".to_owned())
                }
            }
        };

        Classified {
            status_code: status,
            message,
        }
    }

    /// Verbose diagnostic object: display string, kind name, source-chain
    /// trace.
    fn diagnostic(error: &ShaperError) -> Value {
        let mut trace = Vec::new();
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            trace.push(cause.to_string());
            source = cause.source();
        }

        json!({
            "message": format!("Internal Server Error: {error}"),
            "type": error.kind().name(),
            "trace": trace,
        })
    }
}
