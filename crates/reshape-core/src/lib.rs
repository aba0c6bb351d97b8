//! # Reshape Core
//!
//! Core types for the reshape response-normalization layer.
//!
//! This crate provides the pieces that are independent of any middleware
//! pipeline:
//!
//! - [`Envelope`] - the canonical JSON wrapper returned for every shaped
//!   response
//! - [`responses`] - pure constructors, one per envelope shape
//! - [`extract_first_error`] - recursive first-error extraction over
//!   arbitrarily nested error payloads
//! - [`ShaperError`] - the error taxonomy absorbed by the shaping layer
//! - [`Classifier`] - ordered mapping from error kind to HTTP status and
//!   client-facing message

#![doc(html_root_url = "https://docs.rs/reshape-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod classify;
mod envelope;
mod error;
pub mod extract;
pub mod responses;

pub use classify::{Classified, Classifier};
pub use envelope::Envelope;
pub use error::{Category, ErrorKind, ShaperError, ShaperResult};
pub use extract::{extract_first_error, ExtractStyle};
