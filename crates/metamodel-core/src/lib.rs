//! Metamodel Core Types
//!
//! This crate provides the resolved schema graph produced from a metamodel
//! description. It includes:
//!
//! - **Identifiers**: Fully-qualified name handling ([`identifier`] module)
//! - **Dependencies**: Provenance records attached to properties ([`dependency::Dependency`])
//! - **Properties**: Attributes and relations with generation metadata ([`property`] module)
//! - **Classifiers**: Classes and enums ([`classifier`] module)
//! - **Model**: The build-phase [`model::Registry`] and the frozen [`model::Model`]
//!
//! # Example
//!
//! ```
//! use metamodel_core::{
//!     classifier::Classifier,
//!     model::Registry,
//!     property::Property,
//! };
//!
//! let mut registry = Registry::new();
//! let vehicle = registry.add_classifier(Classifier::new_class("fleet.Vehicle"));
//! let car = registry.add_classifier(Classifier::new_class("fleet.Car"));
//!
//! if let Some(class) = registry.classifier_mut(car).and_then(Classifier::as_class_mut) {
//!     class.add_parent("fleet.Vehicle", vehicle);
//!     class.add_property(Property::attribute("color", "paint.Color"));
//! }
//!
//! let model = registry.freeze();
//! assert_eq!(model.len(), 2);
//! assert_eq!(model.get("fleet.Vehicle").map(|c| c.name()), Some("Vehicle"));
//! ```

pub mod classifier;
pub mod dependency;
pub mod identifier;
pub mod model;
pub mod property;

pub use classifier::{Class, Classifier, ClassifierBody, ClassifierId, ClassifierKind, Enum};
pub use dependency::Dependency;
pub use model::{Model, Registry};
pub use property::{Property, PropertyKind};
