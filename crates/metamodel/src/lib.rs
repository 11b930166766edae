//! Metamodel - A description language for class and enum schemas.
//!
//! Parsing and inspection of metamodel descriptions: classes with
//! attributes, relations and parents, and enums with literals. Source text is
//! resolved into a [`Model`] whose classifiers can be looked up by
//! fully-qualified name.

pub mod config;

mod error;
mod outline;

pub use metamodel_core::{
    Class, Classifier, ClassifierBody, ClassifierId, ClassifierKind, Dependency, Enum, Model,
    Property, PropertyKind, identifier,
};

pub use error::MetamodelError;

use std::{fs, path::Path};

use log::{debug, info, trace};

use config::AppConfig;
use outline::Outline;

/// Loader for parsing and inspecting metamodel descriptions.
///
/// # Examples
///
/// ```
/// use metamodel::{Loader, config::AppConfig};
///
/// let source = "enum Color { RED }\nclass Car { color: Color }";
///
/// let loader = Loader::new(AppConfig::default());
/// let model = loader.parse(source).expect("Failed to parse");
/// assert_eq!(model.len(), 2);
///
/// let outline = loader.render_outline(&model);
/// assert!(outline.contains("class Car"));
/// ```
#[derive(Debug, Default)]
pub struct Loader {
    config: AppConfig,
}

impl Loader {
    /// Create a new loader with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Parse metamodel source text into a resolved [`Model`].
    ///
    /// # Errors
    ///
    /// Returns [`MetamodelError::Parse`] for lexical or syntax errors. The
    /// error keeps a copy of `source` for reporting.
    pub fn parse(&self, source: &str) -> Result<Model, MetamodelError> {
        info!("Parsing metamodel");

        let model = metamodel_parser::parse(source)
            .map_err(|err| MetamodelError::new_parse_error(err, source))?;

        debug!(classifiers = model.len(); "Metamodel parsed successfully");
        trace!(model:?; "Parsed model");

        Ok(model)
    }

    /// Read the file at `path` and parse it.
    ///
    /// # Errors
    ///
    /// Returns [`MetamodelError::Io`] if the file cannot be read, otherwise
    /// the same errors as [`Loader::parse`].
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Model, MetamodelError> {
        let path = path.as_ref();
        info!(path:? = path; "Reading metamodel file");
        let source = fs::read_to_string(path)?;
        self.parse(&source)
    }

    /// Render `model` as a plain-text outline using the display settings of
    /// this loader.
    pub fn render_outline(&self, model: &Model) -> String {
        info!(order:? = self.config.display().order(); "Rendering outline");
        Outline::new(model, self.config.display()).to_string()
    }
}

/// Parse metamodel source text with the default configuration.
///
/// # Errors
///
/// See [`Loader::parse`].
pub fn parse_from_text(text: &str) -> Result<Model, MetamodelError> {
    Loader::default().parse(text)
}

/// Read and parse a metamodel file with the default configuration.
///
/// # Errors
///
/// See [`Loader::load`].
pub fn parse_from_source(path: impl AsRef<Path>) -> Result<Model, MetamodelError> {
    Loader::default().load(path)
}
