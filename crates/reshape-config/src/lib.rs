//! # Reshape Config
//!
//! Typed configuration for the reshape response-normalization layer.
//!
//! Configuration is read once at process startup and is immutable for the
//! process lifetime:
//!
//! - [`ShaperConfig`] - the recognized options with defaults and a builder
//! - [`ConfigLoader`] - layered loading: defaults, then a TOML file, then
//!   `RESHAPE_*` environment variables
//! - [`check_config`] - startup diagnostics with stable identifier codes,
//!   surfaced before the middleware is constructed

#![doc(html_root_url = "https://docs.rs/reshape-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod check;
mod config;
mod error;
mod loader;

pub use check::{check_config, check_toml, Diagnostic};
pub use config::{ShaperConfig, ShaperConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
