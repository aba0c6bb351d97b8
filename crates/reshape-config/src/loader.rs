//! Configuration loader with layered approach.
//!
//! The loader applies configuration in layers, with later layers overriding
//! earlier ones:
//! 1. Default values (built into the code)
//! 2. Configuration file (TOML)
//! 3. Environment variables (`RESHAPE_*`)
//!
//! Boolean environment variables accept exactly `true` or `false`; anything
//! merely boolean-like (`1`, `yes`, `True`) is a parse error, surfaced at
//! startup rather than silently coerced.

use std::env;
use std::fs;
use std::path::Path;

use crate::{ShaperConfig, ConfigError};

/// Environment variable prefix used by [`ConfigLoader::with_env`].
const ENV_PREFIX: &str = "RESHAPE";

/// Layered configuration loader.
///
/// # Example
///
/// ```no_run
/// use reshape_config::ConfigLoader;
///
/// # fn main() -> Result<(), reshape_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_file("reshape.toml")?
///     .with_env()?
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: ShaperConfig,
}

impl ConfigLoader {
    /// Create a loader starting from default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::FileNotFound` if the path does not exist,
    /// `ConfigError::ReadError` on I/O failure, or `ConfigError::TomlError`
    /// if the file does not deserialize into [`ShaperConfig`].
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }
        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        self.config = toml::from_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded shaper configuration file");
        Ok(self)
    }

    /// Overlay `RESHAPE_*` environment variables, loading a `.env` file
    /// first if one is present.
    ///
    /// Recognized variables: `RESHAPE_DEBUG`, `RESHAPE_VERBOSE_ERRORS`,
    /// `RESHAPE_ERROR_AS_MAP`, `RESHAPE_EXCLUDED_PATHS` (comma separated),
    /// `RESHAPE_SUCCESS_HANDLER`, `RESHAPE_ERROR_HANDLER`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EnvParseError` if a boolean variable holds
    /// anything other than `true` or `false`.
    pub fn with_env(mut self) -> Result<Self, ConfigError> {
        // A missing .env file is not an error.
        dotenvy::dotenv().ok();

        if let Some(debug) = read_bool_var(&var_name("DEBUG"))? {
            self.config.debug = debug;
        }
        if let Some(verbose) = read_bool_var(&var_name("VERBOSE_ERRORS"))? {
            self.config.verbose_errors = verbose;
        }
        if let Some(as_map) = read_bool_var(&var_name("ERROR_AS_MAP"))? {
            self.config.error_as_map = as_map;
        }
        if let Ok(paths) = env::var(var_name("EXCLUDED_PATHS")) {
            self.config.excluded_paths = paths
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_owned)
                .collect();
        }
        if let Ok(name) = env::var(var_name("SUCCESS_HANDLER")) {
            self.config.success_handler = name;
        }
        if let Ok(name) = env::var(var_name("ERROR_HANDLER")) {
            self.config.error_handler = name;
        }
        Ok(self)
    }

    /// Finish loading, validating the merged configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if validation fails.
    pub fn load(self) -> Result<ShaperConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn var_name(suffix: &str) -> String {
    format!("{ENV_PREFIX}_{suffix}")
}

/// Reads a strictly-boolean environment variable.
fn read_bool_var(var: &str) -> Result<Option<bool>, ConfigError> {
    match env::var(var) {
        Ok(value) => match value.as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            other => Err(ConfigError::env_parse_error(
                var,
                format!("expected 'true' or 'false', got '{other}'"),
            )),
        },
        Err(_) => Ok(None),
    }
}
