//! Error types for metamodel loading.
//!
//! This module provides the main error type [`MetamodelError`] which wraps
//! the error conditions that can occur while reading and parsing a
//! metamodel description.

use std::io;

use thiserror::Error;

use metamodel_parser::error::ParseError;

/// The main error type for metamodel operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the parser's diagnostics together with the
/// source text they point into, so callers can render labelled snippets.
#[derive(Debug, Error)]
pub enum MetamodelError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MetamodelError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
