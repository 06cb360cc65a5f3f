//! Error types for Etymon operations.
//!
//! This module provides the main error type [`EtymonError`] which wraps
//! the error conditions that can occur while loading definitions, persisting
//! counters and exporting graphs.
//!
//! Failures of the external analysis service are not errors at this level:
//! the controller turns them into notifications and keeps the current graph.

use std::io;

use thiserror::Error;

use etymon_core::diagnostic::Diagnostic;

use crate::store::StoreError;

/// The main error type for Etymon operations.
///
/// # Diagnostic Variants
///
/// The `Invalid` variant carries every diagnostic that caused a definition to
/// be rejected, so hosts can render each one independently.
#[derive(Debug, Error)]
pub enum EtymonError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed definition: {0}")]
    Definition(#[from] serde_json::Error),

    #[error("Invalid definition: {}", summarize(.diagnostics))]
    Invalid { diagnostics: Vec<Diagnostic> },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl EtymonError {
    /// Create a new `Invalid` error from the diagnostics that rejected a definition.
    pub fn new_invalid(diagnostics: Vec<Diagnostic>) -> Self {
        Self::Invalid { diagnostics }
    }
}

fn summarize(diagnostics: &[Diagnostic]) -> String {
    match diagnostics {
        [] => "no diagnostics".to_string(),
        [single] => single.to_string(),
        [first, rest @ ..] => format!("{first} (+{} more)", rest.len()),
    }
}
