//! Rendering of [`MetamodelError`] through miette.
//!
//! A parse failure becomes one [`Report`] per parser diagnostic, each with
//! its own labelled snippet of the source. Reading and configuration
//! failures have no source location and become a single report.

use std::{fmt, io};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceCode, SourceSpan};

use metamodel::MetamodelError;
use metamodel_parser::error::Diagnostic;

/// One renderable problem from a failed run.
#[derive(Debug)]
pub enum Report<'a> {
    /// A lexical or syntax error located in `src`.
    Syntax {
        diagnostic: &'a Diagnostic,
        src: &'a str,
    },
    /// The input or configuration file could not be read.
    Io(&'a io::Error),
    /// The configuration file is missing or malformed.
    Config(&'a str),
}

/// Split `err` into the reports shown to the user.
pub fn reports(err: &MetamodelError) -> Vec<Report<'_>> {
    match err {
        MetamodelError::Parse { err, src } => err
            .diagnostics()
            .iter()
            .map(|diagnostic| Report::Syntax { diagnostic, src })
            .collect(),
        MetamodelError::Io(io) => vec![Report::Io(io)],
        MetamodelError::Config(message) => vec![Report::Config(message)],
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Syntax { diagnostic, .. } => f.write_str(diagnostic.message()),
            Report::Io(err) => write!(f, "cannot read file: {err}"),
            Report::Config(message) => write!(f, "invalid configuration: {message}"),
        }
    }
}

impl std::error::Error for Report<'_> {}

impl MietteDiagnostic for Report<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Report::Syntax { diagnostic, .. } => diagnostic
                .code()
                .map(|code| Box::new(code) as Box<dyn fmt::Display + 'a>),
            Report::Io(_) => Some(Box::new("metamodel::io")),
            Report::Config(_) => Some(Box::new("metamodel::config")),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help: &str = match self {
            Report::Syntax { diagnostic, .. } => diagnostic.help()?,
            Report::Io(_) => "check that the input path exists and is readable",
            Report::Config(_) => {
                "the configuration accepts a `[display]` table with `order` and `metadata`"
            }
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        match self {
            Report::Syntax { src, .. } => Some(src as &dyn SourceCode),
            Report::Io(_) | Report::Config(_) => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let Report::Syntax { diagnostic, .. } = self else {
            return None;
        };
        if diagnostic.labels().is_empty() {
            return None;
        }

        Some(Box::new(diagnostic.labels().iter().map(|label| {
            let span = SourceSpan::from(label.span().range());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}
