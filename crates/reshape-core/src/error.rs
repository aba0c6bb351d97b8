//! The error taxonomy absorbed by the shaping layer.
//!
//! [`ShaperError`] models the kinds of failure a downstream handler can
//! surface to the shaper: lookup failures, malformed or suspicious requests,
//! permission denials, validation trees, and the database family. The
//! [`Classifier`](crate::Classifier) maps each kind to an HTTP status and a
//! client-facing message; nothing here escapes an active shaper.
//!
//! Kinds are grouped into [`Category`] values. Classification matches exact
//! kinds first and then walks categories in declaration order, which keeps
//! "a more specific kind of database error" semantics without a class
//! hierarchy.

use serde_json::Value;
use thiserror::Error;

/// Result alias for fallible downstream handlers.
pub type ShaperResult<T> = Result<T, ShaperError>;

/// An error surfaced to the shaping layer by a downstream handler.
#[derive(Debug, Error)]
pub enum ShaperError {
    /// A referenced field does not exist.
    #[error("unknown field: {name}")]
    FieldMissing {
        /// The missing field name.
        name: String,
    },

    /// A requested object does not exist.
    #[error("not found: {message}")]
    NotFound {
        /// Human-readable description of what was missing.
        message: String,
    },

    /// A query produced no results where some were required.
    #[error("query returned an empty result set")]
    EmptyResult,

    /// A lookup expected one object and found several.
    #[error("multiple objects returned: {message}")]
    MultipleReturned {
        /// Human-readable description.
        message: String,
    },

    /// The request looked tampered with or otherwise suspicious.
    #[error("suspicious operation: {message}")]
    Suspicious {
        /// Human-readable description.
        message: String,
    },

    /// The request carried a host header outside the allowed set.
    #[error("disallowed host: {host}")]
    DisallowedHost {
        /// The offending host header value.
        host: String,
    },

    /// A redirect target outside the allowed set.
    #[error("unsafe redirect to {target}")]
    DisallowedRedirect {
        /// The offending redirect target.
        target: String,
    },

    /// The request could not be parsed or understood.
    #[error("malformed request: {message}")]
    Malformed {
        /// Human-readable description.
        message: String,
    },

    /// The caller is not allowed to perform the operation.
    #[error("permission denied: {message}")]
    Forbidden {
        /// Human-readable description.
        message: String,
    },

    /// The hosting process is set up incorrectly (configuration or
    /// middleware wiring).
    #[error("misconfigured: {message}")]
    Misconfigured {
        /// Human-readable description.
        message: String,
    },

    /// A field reference in a query expression is invalid.
    #[error("invalid field reference: {message}")]
    InvalidField {
        /// Human-readable description.
        message: String,
    },

    /// Input validation failed; carries the nested error tree.
    #[error("validation failed")]
    Validation {
        /// Nested error payload (string, sequence, or field mapping).
        errors: Value,
    },

    /// A uniqueness or foreign-key constraint was violated.
    #[error("integrity constraint violated: {message}")]
    Integrity {
        /// Human-readable description.
        message: String,
    },

    /// The database rejected a statement (SQL-level mistake).
    #[error("database programming error: {message}")]
    Programming {
        /// Human-readable description.
        message: String,
    },

    /// The database is unreachable or temporarily unavailable.
    #[error("database operational error: {message}")]
    Operational {
        /// Human-readable description.
        message: String,
    },

    /// A value was outside the range the storage layer accepts.
    #[error("invalid data for storage: {message}")]
    InvalidData {
        /// Human-readable description.
        message: String,
    },

    /// The database reported an internal fault.
    #[error("internal database error: {message}")]
    DatabaseInternal {
        /// Human-readable description.
        message: String,
    },

    /// Any other database-layer failure.
    #[error("database error: {message}")]
    Database {
        /// Human-readable description.
        message: String,
    },

    /// An unclassified failure.
    #[error("{message}")]
    Other {
        /// Human-readable description.
        message: String,
        /// The underlying error, if one was captured.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ShaperError {
    /// Creates a [`ShaperError::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a [`ShaperError::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Creates a [`ShaperError::Malformed`].
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Creates a [`ShaperError::Validation`] from a nested error payload.
    pub fn validation(errors: Value) -> Self {
        Self::Validation { errors }
    }

    /// Creates a [`ShaperError::Integrity`].
    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity {
            message: message.into(),
        }
    }

    /// Creates a [`ShaperError::Operational`].
    pub fn operational(message: impl Into<String>) -> Self {
        Self::Operational {
            message: message.into(),
        }
    }

    /// Creates a [`ShaperError::Other`] with no captured source.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps an arbitrary error as [`ShaperError::Other`], keeping it as the
    /// source for diagnostic traces.
    pub fn wrap(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other {
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }

    /// Returns the kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FieldMissing { .. } => ErrorKind::FieldMissing,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::EmptyResult => ErrorKind::EmptyResult,
            Self::MultipleReturned { .. } => ErrorKind::MultipleReturned,
            Self::Suspicious { .. } => ErrorKind::Suspicious,
            Self::DisallowedHost { .. } => ErrorKind::DisallowedHost,
            Self::DisallowedRedirect { .. } => ErrorKind::DisallowedRedirect,
            Self::Malformed { .. } => ErrorKind::Malformed,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::Misconfigured { .. } => ErrorKind::Misconfigured,
            Self::InvalidField { .. } => ErrorKind::InvalidField,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Integrity { .. } => ErrorKind::Integrity,
            Self::Programming { .. } => ErrorKind::Programming,
            Self::Operational { .. } => ErrorKind::Operational,
            Self::InvalidData { .. } => ErrorKind::InvalidData,
            Self::DatabaseInternal { .. } => ErrorKind::DatabaseInternal,
            Self::Database { .. } => ErrorKind::Database,
            Self::Other { .. } => ErrorKind::Other,
        }
    }
}

/// The discriminant of a [`ShaperError`], used by the classifier's rule
/// table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)] // variants mirror ShaperError one-to-one
pub enum ErrorKind {
    FieldMissing,
    NotFound,
    EmptyResult,
    MultipleReturned,
    Suspicious,
    DisallowedHost,
    DisallowedRedirect,
    Malformed,
    Forbidden,
    Misconfigured,
    InvalidField,
    Validation,
    Integrity,
    Programming,
    Operational,
    InvalidData,
    DatabaseInternal,
    Database,
    Other,
}

impl ErrorKind {
    /// Returns the kind name used in verbose diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FieldMissing => "FieldMissing",
            Self::NotFound => "NotFound",
            Self::EmptyResult => "EmptyResult",
            Self::MultipleReturned => "MultipleReturned",
            Self::Suspicious => "Suspicious",
            Self::DisallowedHost => "DisallowedHost",
            Self::DisallowedRedirect => "DisallowedRedirect",
            Self::Malformed => "Malformed",
            Self::Forbidden => "Forbidden",
            Self::Misconfigured => "Misconfigured",
            Self::InvalidField => "InvalidField",
            Self::Validation => "Validation",
            Self::Integrity => "Integrity",
            Self::Programming => "Programming",
            Self::Operational => "Operational",
            Self::InvalidData => "InvalidData",
            Self::DatabaseInternal => "DatabaseInternal",
            Self::Database => "Database",
            Self::Other => "Other",
        }
    }

    /// Category-membership test: `true` when this kind belongs to the given
    /// category.
    ///
    /// Membership is deliberately many-to-one in the database family, so a
    /// category rule can catch any database kind that has no exact entry in
    /// the classifier table.
    #[must_use]
    pub const fn is_a(self, category: Category) -> bool {
        match category {
            Category::NotFound => matches!(
                self,
                Self::FieldMissing | Self::NotFound | Self::EmptyResult
            ),
            Category::BadRequest => matches!(
                self,
                Self::MultipleReturned
                    | Self::Suspicious
                    | Self::DisallowedHost
                    | Self::DisallowedRedirect
                    | Self::Malformed
                    | Self::InvalidField
            ),
            Category::Forbidden => matches!(self, Self::Forbidden),
            Category::Misconfiguration => matches!(self, Self::Misconfigured),
            Category::Validation => matches!(self, Self::Validation),
            Category::Database => matches!(
                self,
                Self::Integrity
                    | Self::Programming
                    | Self::Operational
                    | Self::InvalidData
                    | Self::DatabaseInternal
                    | Self::Database
            ),
            Category::Unknown => matches!(self, Self::Other),
        }
    }
}

/// Ancestry groups for [`ErrorKind`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Lookup failures (404).
    NotFound,
    /// Malformed or suspicious requests (400).
    BadRequest,
    /// Permission denials (403).
    Forbidden,
    /// Process set up incorrectly (500).
    Misconfiguration,
    /// Input validation trees (400).
    Validation,
    /// The database family.
    Database,
    /// Everything else.
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(
            ShaperError::not_found("user 7").kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ShaperError::validation(json!({"field": ["required"]})).kind(),
            ErrorKind::Validation
        );
        assert_eq!(ShaperError::other("boom").kind(), ErrorKind::Other);
    }

    #[test]
    fn database_family_membership() {
        for kind in [
            ErrorKind::Integrity,
            ErrorKind::Programming,
            ErrorKind::Operational,
            ErrorKind::InvalidData,
            ErrorKind::DatabaseInternal,
            ErrorKind::Database,
        ] {
            assert!(kind.is_a(Category::Database), "{kind:?}");
        }
        assert!(!ErrorKind::Validation.is_a(Category::Database));
    }

    #[test]
    fn wrap_keeps_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let wrapped = ShaperError::wrap(io);
        assert_eq!(wrapped.to_string(), "pipe closed");
        assert!(std::error::Error::source(&wrapped).is_some());
    }

    #[test]
    fn display_is_stable() {
        let err = ShaperError::DisallowedHost {
            host: "evil.example".to_owned(),
        };
        assert_eq!(err.to_string(), "disallowed host: evil.example");
    }
}
