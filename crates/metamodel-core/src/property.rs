//! Schema members of a class.
//!
//! A [`Property`] is either an attribute (a plain value) or a relation (a
//! reference to another classifier). Both kinds carry the same generation
//! metadata:
//!
//! - an optional derivation `algorithm`,
//! - named `parameters` for that algorithm,
//! - ordered provenance [`Dependency`] records,
//! - the `learned`, `derived` and `global` flags.

use std::fmt;

use indexmap::IndexMap;

use crate::dependency::Dependency;

/// The two kinds of class members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// A plain value whose type token is kept verbatim.
    Attribute,
    /// A reference whose type token names another classifier.
    Relation,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKind::Attribute => write!(f, "att"),
            PropertyKind::Relation => write!(f, "ref"),
        }
    }
}

/// A named, typed member of a class.
///
/// # Examples
///
/// ```
/// use metamodel_core::{Dependency, Property, PropertyKind};
///
/// let mut speed = Property::attribute("speed", "Double");
/// speed.set_learned();
/// speed.set_algorithm("linear");
/// speed.add_parameter("window", "10");
/// speed.add_dependency(Dependency::new("sensors/gps"));
///
/// assert_eq!(speed.kind(), PropertyKind::Attribute);
/// assert!(speed.is_learned());
/// assert_eq!(speed.algorithm(), Some("linear"));
/// assert_eq!(speed.parameter("window"), Some("10"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    kind: PropertyKind,
    name: String,
    type_name: String,
    algorithm: Option<String>,
    parameters: IndexMap<String, String>,
    dependencies: Vec<Dependency>,
    learned: bool,
    derived: bool,
    global: bool,
}

impl Property {
    /// Creates a property of the given kind without any metadata.
    pub fn new(kind: PropertyKind, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            type_name: type_name.into(),
            algorithm: None,
            parameters: IndexMap::new(),
            dependencies: Vec::new(),
            learned: false,
            derived: false,
            global: false,
        }
    }

    /// Creates an attribute.
    pub fn attribute(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(PropertyKind::Attribute, name, type_name)
    }

    /// Creates a relation targeting the classifier named by `target`.
    pub fn relation(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(PropertyKind::Relation, name, target)
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self.kind, PropertyKind::Attribute)
    }

    pub fn is_relation(&self) -> bool {
        matches!(self.kind, PropertyKind::Relation)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw type token.
    ///
    /// For relations this is the target classifier's name as written, to be
    /// resolved through [`Model::get`](crate::model::Model::get).
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn algorithm(&self) -> Option<&str> {
        self.algorithm.as_deref()
    }

    /// Sets the derivation algorithm, replacing any previous one.
    pub fn set_algorithm(&mut self, algorithm: impl Into<String>) {
        self.algorithm = Some(algorithm.into());
    }

    /// Returns all algorithm parameters in first-insertion order.
    pub fn parameters(&self) -> &IndexMap<String, String> {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    /// Sets a parameter. A later value for the same name overwrites the earlier one.
    pub fn add_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters.insert(name.into(), value.into());
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn add_dependency(&mut self, dependency: Dependency) {
        self.dependencies.push(dependency);
    }

    pub fn is_learned(&self) -> bool {
        self.learned
    }

    /// Marks the property as learned. There is no way to clear the flag.
    pub fn set_learned(&mut self) {
        self.learned = true;
    }

    pub fn is_derived(&self) -> bool {
        self.derived
    }

    /// Marks the property as derived. There is no way to clear the flag.
    pub fn set_derived(&mut self) {
        self.derived = true;
    }

    pub fn is_global(&self) -> bool {
        self.global
    }

    /// Marks the property as global. There is no way to clear the flag.
    pub fn set_global(&mut self) {
        self.global = true;
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (set, flag) in [
            (self.learned, "learned"),
            (self.derived, "derived"),
            (self.global, "global"),
        ] {
            if set {
                write!(f, "@{flag} ")?;
            }
        }
        write!(f, "{} {}: {}", self.kind, self.name, self.type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_property_has_no_metadata() {
        let prop = Property::relation("owner", "fleet.Person");

        assert!(prop.is_relation());
        assert!(!prop.is_attribute());
        assert_eq!(prop.name(), "owner");
        assert_eq!(prop.type_name(), "fleet.Person");
        assert!(prop.algorithm().is_none());
        assert!(prop.parameters().is_empty());
        assert!(prop.dependencies().is_empty());
        assert!(!prop.is_learned() && !prop.is_derived() && !prop.is_global());
    }

    #[test]
    fn test_flags_are_independent_and_sticky() {
        let mut prop = Property::attribute("speed", "Double");
        prop.set_derived();
        prop.set_derived();

        assert!(prop.is_derived());
        assert!(!prop.is_learned());
        assert!(!prop.is_global());
    }

    #[test]
    fn test_algorithm_last_assignment_wins() {
        let mut prop = Property::attribute("speed", "Double");
        prop.set_algorithm("first");
        prop.set_algorithm("second");

        assert_eq!(prop.algorithm(), Some("second"));
    }

    #[test]
    fn test_parameter_overwrite_keeps_position() {
        let mut prop = Property::attribute("speed", "Double");
        prop.add_parameter("x", "a");
        prop.add_parameter("y", "1");
        prop.add_parameter("x", "b");

        let params: Vec<_> = prop
            .parameters()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(params, vec![("x", "b"), ("y", "1")]);
    }

    #[test]
    fn test_dependencies_keep_duplicates_in_order() {
        let mut prop = Property::attribute("speed", "Double");
        prop.add_dependency(Dependency::new("a"));
        prop.add_dependency(Dependency::new("b"));
        prop.add_dependency(Dependency::new("a"));

        let paths: Vec<_> = prop.dependencies().iter().map(Dependency::path).collect();
        assert_eq!(paths, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_display() {
        let mut prop = Property::relation("owner", "Person");
        prop.set_global();
        prop.set_learned();

        assert_eq!(prop.to_string(), "@learned @global ref owner: Person");
    }
}
