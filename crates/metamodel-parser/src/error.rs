//! Error and diagnostic system for the metamodel parser.
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error message with an optional error code, multiple source
//! locations, and help text. Multiple diagnostics are wrapped in [`ParseError`]
//! for returning from the parsing pipeline.
//!
//! # Example
//!
//! ```
//! # use metamodel_parser::error::{Diagnostic, ErrorCode};
//! # use metamodel_parser::Span;
//!
//! let diag = Diagnostic::error("expected `enum` or `class`")
//!     .with_code(ErrorCode::E102)
//!     .with_label(Span::new(0..6), "not a declaration")
//!     .with_help("every top-level item must be a declaration");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
