//! # Metamodel Parser
//!
//! Parser for the metamodel description language. This crate provides the
//! pipeline from source text to a resolved [`Model`]:
//!
//! 1. **Tokenize** - Convert source text to tokens ([`lexer`])
//! 2. **Parse** - Build declaration records from tokens ([`parser`], [`ast`])
//! 3. **Build** - Resolve declarations into a model ([`ModelBuilder`])
//!
//! ## Usage
//!
//! ```
//! # use metamodel_parser::{parse, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//!         enum Color { RED, GREEN }
//!         class Car { color: Color }
//!     "#;
//!
//!     let model = parse(source)?;
//!     assert_eq!(model.len(), 2);
//!     Ok(())
//! }
//! ```

pub mod ast;
mod builder;
pub mod error;
pub mod lexer;
pub mod parser;
mod span;
pub mod tokens;

pub use builder::ModelBuilder;
pub use span::{Span, Spanned};

use log::{debug, info, trace};
use metamodel_core::Model;

use error::ParseError;

/// Parse source text into declaration records without resolving them.
///
/// # Errors
///
/// Returns every lexical error found, or the first syntax error.
pub fn parse_declarations(source: &str) -> Result<ast::Metamodel, ParseError> {
    let tokens = lexer::tokenize(source)?;
    debug!(tokens = tokens.len(); "Tokenized source");

    let metamodel = parser::build_metamodel(&tokens)?;
    trace!(metamodel:?; "Parsed declarations");
    Ok(metamodel)
}

/// Parse source text into a resolved [`Model`].
///
/// This is the main entry point. Building the model never fails; only
/// lexical and syntax errors are reported.
///
/// # Example
///
/// ```
/// # use metamodel_parser::parse;
///
/// let model = parse("class B extends A {}\nclass A { x: Int }").unwrap();
/// let b = model.get("B").and_then(|c| c.as_class()).unwrap();
/// let a = model.parents(b).next().unwrap();
/// assert_eq!(a.fqn(), "A");
/// assert!(a.as_class().unwrap().property("x").is_some());
/// ```
pub fn parse(source: &str) -> Result<Model, ParseError> {
    let metamodel = parse_declarations(source)?;
    info!(declarations = metamodel.declarations.len(); "Building model");

    let mut builder = ModelBuilder::new();
    builder.declare(&metamodel);
    let model = builder.finish();

    info!(classifiers = model.len(); "Model built");
    Ok(model)
}
