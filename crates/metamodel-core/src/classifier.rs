//! Classes and enums.
//!
//! A [`Classifier`] is a named, namespaced schema entity. Its identity is the
//! fully-qualified name returned by [`Classifier::fqn`]; the kind-specific
//! contents live in [`ClassifierBody`].

use std::fmt;

use indexmap::IndexMap;

use crate::{identifier, property::Property};

/// Index of a classifier inside a [`Registry`](crate::model::Registry) or
/// [`Model`](crate::model::Model).
///
/// Ids are stable for the whole lifetime of the registry, including across
/// [`Registry::freeze`](crate::model::Registry::freeze).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassifierId(usize);

impl ClassifierId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ClassifierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fieldless discriminant of [`ClassifierBody`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifierKind {
    Class,
    Enum,
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierKind::Class => write!(f, "class"),
            ClassifierKind::Enum => write!(f, "enum"),
        }
    }
}

/// Kind-specific contents of a classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifierBody {
    Class(Class),
    Enum(Enum),
}

/// A named, namespaced schema entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    name: String,
    package: Option<String>,
    body: ClassifierBody,
}

impl Classifier {
    /// Creates an empty classifier of the given kind.
    ///
    /// The fully-qualified name is split at its last `.` into package and
    /// local name.
    ///
    /// # Examples
    ///
    /// ```
    /// use metamodel_core::{Classifier, ClassifierKind};
    ///
    /// let car = Classifier::new(ClassifierKind::Class, "org.fleet.Car");
    /// assert_eq!(car.package(), Some("org.fleet"));
    /// assert_eq!(car.name(), "Car");
    /// assert_eq!(car.fqn(), "org.fleet.Car");
    /// ```
    pub fn new(kind: ClassifierKind, fqn: &str) -> Self {
        let (package, name) = identifier::split(fqn);
        let body = match kind {
            ClassifierKind::Class => ClassifierBody::Class(Class::default()),
            ClassifierKind::Enum => ClassifierBody::Enum(Enum::default()),
        };
        Self {
            name: name.to_string(),
            package: package.map(str::to_string),
            body,
        }
    }

    /// Creates an empty class.
    pub fn new_class(fqn: &str) -> Self {
        Self::new(ClassifierKind::Class, fqn)
    }

    /// Creates an empty enum.
    pub fn new_enum(fqn: &str) -> Self {
        Self::new(ClassifierKind::Enum, fqn)
    }

    /// Returns the local name, without the package.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    /// Returns the fully-qualified name, computed from package and local name.
    pub fn fqn(&self) -> String {
        identifier::join(self.package(), &self.name)
    }

    pub fn kind(&self) -> ClassifierKind {
        match self.body {
            ClassifierBody::Class(_) => ClassifierKind::Class,
            ClassifierBody::Enum(_) => ClassifierKind::Enum,
        }
    }

    pub fn body(&self) -> &ClassifierBody {
        &self.body
    }

    pub fn is_class(&self) -> bool {
        matches!(self.body, ClassifierBody::Class(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.body, ClassifierBody::Enum(_))
    }

    pub fn as_class(&self) -> Option<&Class> {
        match &self.body {
            ClassifierBody::Class(class) => Some(class),
            ClassifierBody::Enum(_) => None,
        }
    }

    pub fn as_class_mut(&mut self) -> Option<&mut Class> {
        match &mut self.body {
            ClassifierBody::Class(class) => Some(class),
            ClassifierBody::Enum(_) => None,
        }
    }

    pub fn as_enum(&self) -> Option<&Enum> {
        match &self.body {
            ClassifierBody::Enum(enumeration) => Some(enumeration),
            ClassifierBody::Class(_) => None,
        }
    }

    pub fn as_enum_mut(&mut self) -> Option<&mut Enum> {
        match &mut self.body {
            ClassifierBody::Enum(enumeration) => Some(enumeration),
            ClassifierBody::Class(_) => None,
        }
    }
}

impl fmt::Display for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.fqn())
    }
}

/// A class: properties keyed by name and parents keyed by fully-qualified name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Class {
    properties: IndexMap<String, Property>,
    parents: IndexMap<String, ClassifierId>,
}

impl Class {
    /// Iterates over properties in first-insertion order.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Attaches a property.
    ///
    /// A property with the same name replaces the previous one and keeps its
    /// position in iteration order. Returns the replaced property, if any.
    pub fn add_property(&mut self, property: Property) -> Option<Property> {
        self.properties.insert(property.name().to_string(), property)
    }

    /// Iterates over `(fqn, id)` pairs of the parents in first-insertion order.
    pub fn parents(&self) -> impl Iterator<Item = (&str, ClassifierId)> {
        self.parents.iter().map(|(fqn, id)| (fqn.as_str(), *id))
    }

    pub fn parent_ids(&self) -> impl Iterator<Item = ClassifierId> + '_ {
        self.parents.values().copied()
    }

    pub fn has_parent(&self, fqn: &str) -> bool {
        self.parents.contains_key(fqn)
    }

    /// Adds a parent. Adding a parent whose fqn is already present is a no-op.
    ///
    /// Returns `true` if the parent was newly added.
    pub fn add_parent(&mut self, fqn: impl Into<String>, id: ClassifierId) -> bool {
        let fqn = fqn.into();
        if self.parents.contains_key(&fqn) {
            return false;
        }
        self.parents.insert(fqn, id);
        true
    }
}

/// An enumeration: an append-only list of literal names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enum {
    literals: Vec<String>,
}

impl Enum {
    pub fn literals(&self) -> &[String] {
        &self.literals
    }

    /// Appends a literal. Duplicates are kept.
    pub fn add_literal(&mut self, literal: impl Into<String>) {
        self.literals.push(literal.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_without_package() {
        let classifier = Classifier::new_enum("Color");

        assert_eq!(classifier.name(), "Color");
        assert_eq!(classifier.package(), None);
        assert_eq!(classifier.fqn(), "Color");
        assert_eq!(classifier.kind(), ClassifierKind::Enum);
        assert!(classifier.is_enum());
        assert!(classifier.as_class().is_none());
    }

    #[test]
    fn test_classifier_splits_at_last_separator() {
        let classifier = Classifier::new_class("a.b.Car");

        assert_eq!(classifier.package(), Some("a.b"));
        assert_eq!(classifier.name(), "Car");
        assert_eq!(classifier.to_string(), "class a.b.Car");
    }

    #[test]
    fn test_add_property_overwrites_same_name() {
        let mut class = Class::default();
        assert!(class.add_property(Property::attribute("x", "Int")).is_none());
        class.add_property(Property::attribute("y", "Int"));
        let replaced = class.add_property(Property::relation("x", "Other"));

        assert_eq!(replaced.map(|p| p.type_name().to_string()), Some("Int".to_string()));
        assert_eq!(class.property_count(), 2);
        let x = class.property("x").expect("x should exist");
        assert!(x.is_relation());
        assert_eq!(x.type_name(), "Other");

        let names: Vec<_> = class.properties().map(Property::name).collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn test_add_parent_dedups_by_fqn() {
        let mut class = Class::default();
        assert!(class.add_parent("fleet.Vehicle", ClassifierId::new(0)));
        assert!(class.add_parent("fleet.Asset", ClassifierId::new(1)));
        assert!(!class.add_parent("fleet.Vehicle", ClassifierId::new(0)));

        let parents: Vec<_> = class.parents().collect();
        assert_eq!(
            parents,
            vec![
                ("fleet.Vehicle", ClassifierId::new(0)),
                ("fleet.Asset", ClassifierId::new(1)),
            ]
        );
        assert!(class.has_parent("fleet.Asset"));
    }

    #[test]
    fn test_enum_keeps_duplicate_literals() {
        let mut classifier = Classifier::new_enum("Color");
        let literals = classifier.as_enum_mut().expect("enum body");
        literals.add_literal("RED");
        literals.add_literal("RED");
        literals.add_literal("BLUE");

        assert_eq!(
            classifier.as_enum().map(Enum::literals),
            Some(&["RED".to_string(), "RED".to_string(), "BLUE".to_string()][..])
        );
    }
}
