//! Error types for protractor operations.
//!
//! Generating a scene never fails; the variants here cover the outer
//! surfaces around it: reading requests, loading configuration and exporting.

use std::io;

use thiserror::Error;

/// The main error type for protractor operations.
///
/// # Diagnostic Variants
///
/// The `Request` variant keeps the request text alongside the JSON error so
/// callers can point at the offending line and column.
#[derive(Debug, Error)]
pub enum ProtractorError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid diagram request: {err}")]
    Request { err: serde_json::Error, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl ProtractorError {
    /// Create a new `Request` error with the associated source text.
    pub fn new_request_error(err: serde_json::Error, src: impl Into<String>) -> Self {
        Self::Request {
            err,
            src: src.into(),
        }
    }
}
