//! Configuration types for metamodel outline rendering.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! TOML or any other serde format.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration.
//! - [`DisplayConfig`] - Controls how [`Loader::render_outline`](crate::Loader::render_outline) lays out a model.
//! - [`Order`] - Classifier ordering in the outline.
//!
//! # Example
//!
//! ```
//! # use metamodel::config::{AppConfig, Order};
//! let config = AppConfig::default();
//! assert_eq!(config.display().order(), Order::Declaration);
//! assert!(config.display().metadata());
//! ```

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Display configuration section.
    #[serde(default)]
    display: DisplayConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the given display settings.
    pub fn new(display: DisplayConfig) -> Self {
        Self { display }
    }

    /// Returns the display configuration.
    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }
}

/// Outline display settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Order in which classifiers are listed.
    #[serde(default)]
    order: Order,

    /// Whether dependencies, algorithms and parameters are listed under
    /// each property.
    #[serde(default = "default_metadata")]
    metadata: bool,
}

fn default_metadata() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            order: Order::default(),
            metadata: default_metadata(),
        }
    }
}

impl DisplayConfig {
    /// Creates a new [`DisplayConfig`].
    ///
    /// # Arguments
    ///
    /// * `order` - Classifier ordering.
    /// * `metadata` - Whether to list property metadata.
    pub fn new(order: Order, metadata: bool) -> Self {
        Self { order, metadata }
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn metadata(&self) -> bool {
        self.metadata
    }
}

/// Classifier ordering in a rendered outline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// The order in which classifiers were first created.
    #[default]
    Declaration,
    /// Sorted by fully-qualified name.
    Alphabetical,
}
