//! The recognized configuration options.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Configuration for the response shaper.
///
/// All options are read once when the middleware is constructed and held for
/// the process lifetime.
///
/// # Example
///
/// ```
/// use reshape_config::ShaperConfig;
///
/// let config = ShaperConfig::default();
/// assert!(!config.debug);
/// assert!(config.error_as_map);
/// assert!(config.excluded_paths.iter().any(|p| p == "/admin/"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ShaperConfig {
    /// When `true`, shaping is disabled entirely and every response and
    /// error passes through untouched.
    pub debug: bool,

    /// When `true`, absorbed errors carry verbose diagnostics (display
    /// string, kind name, source-chain trace) instead of fixed phrases.
    /// Development only.
    pub verbose_errors: bool,

    /// When `true` (the default), extracted errors keep their field name as
    /// a one-entry map; when `false`, the bare leaf is reported.
    pub error_as_map: bool,

    /// Path prefixes for which shaping is bypassed. Each entry must start
    /// and end with `/`.
    pub excluded_paths: Vec<String>,

    /// Registry name of a custom success handler; empty means the built-in
    /// default.
    pub success_handler: String,

    /// Registry name of a custom error handler; empty means the built-in
    /// default.
    pub error_handler: String,
}

impl Default for ShaperConfig {
    fn default() -> Self {
        Self {
            debug: false,
            verbose_errors: false,
            error_as_map: true,
            excluded_paths: vec![
                "/admin/".to_owned(),
                "/docs/".to_owned(),
                "/redoc/".to_owned(),
                "/openapi/".to_owned(),
            ],
            success_handler: String::new(),
            error_handler: String::new(),
        }
    }
}

impl ShaperConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ShaperConfigBuilder {
        ShaperConfigBuilder::default()
    }

    /// Validate the configuration, returning the first violation.
    ///
    /// [`check_config`](crate::check_config) reports *all* violations as
    /// structured diagnostics; this is the hard-fail variant for callers
    /// that want a `Result`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if an excluded path is not
    /// slash-bounded or a handler name contains characters outside
    /// `[A-Za-z0-9_.:-]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for path in &self.excluded_paths {
            if !(path.starts_with('/') && path.ends_with('/')) {
                return Err(ConfigError::invalid_value(
                    "excluded_paths",
                    format!("path '{path}' must start and end with '/'"),
                ));
            }
        }
        for (field, name) in [
            ("success_handler", &self.success_handler),
            ("error_handler", &self.error_handler),
        ] {
            if !is_valid_handler_name(name) {
                return Err(ConfigError::invalid_value(
                    field,
                    format!("'{name}' is not a plausible registry identifier"),
                ));
            }
        }
        Ok(())
    }
}

/// Empty is allowed (means "use the default"); otherwise the name must look
/// like a registry identifier.
pub(crate) fn is_valid_handler_name(name: &str) -> bool {
    name.is_empty()
        || name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '-'))
}

/// Builder for [`ShaperConfig`].
#[derive(Debug, Default)]
pub struct ShaperConfigBuilder {
    debug: Option<bool>,
    verbose_errors: Option<bool>,
    error_as_map: Option<bool>,
    excluded_paths: Option<Vec<String>>,
    success_handler: Option<String>,
    error_handler: Option<String>,
}

impl ShaperConfigBuilder {
    /// Set the debug flag.
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Set the verbose-error flag.
    #[must_use]
    pub fn verbose_errors(mut self, verbose: bool) -> Self {
        self.verbose_errors = Some(verbose);
        self
    }

    /// Set the error-representation style.
    #[must_use]
    pub fn error_as_map(mut self, error_as_map: bool) -> Self {
        self.error_as_map = Some(error_as_map);
        self
    }

    /// Set the excluded path prefixes.
    #[must_use]
    pub fn excluded_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_paths = Some(paths.into_iter().map(Into::into).collect());
        self
    }

    /// Set the success handler registry name.
    #[must_use]
    pub fn success_handler(mut self, name: impl Into<String>) -> Self {
        self.success_handler = Some(name.into());
        self
    }

    /// Set the error handler registry name.
    #[must_use]
    pub fn error_handler(mut self, name: impl Into<String>) -> Self {
        self.error_handler = Some(name.into());
        self
    }

    /// Build the configuration; unset fields use their defaults.
    #[must_use]
    pub fn build(self) -> ShaperConfig {
        let defaults = ShaperConfig::default();
        ShaperConfig {
            debug: self.debug.unwrap_or(defaults.debug),
            verbose_errors: self.verbose_errors.unwrap_or(defaults.verbose_errors),
            error_as_map: self.error_as_map.unwrap_or(defaults.error_as_map),
            excluded_paths: self.excluded_paths.unwrap_or(defaults.excluded_paths),
            success_handler: self.success_handler.unwrap_or(defaults.success_handler),
            error_handler: self.error_handler.unwrap_or(defaults.error_handler),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<ShaperConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
