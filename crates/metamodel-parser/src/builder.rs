//! Turns declaration records into a resolved [`Model`].
//!
//! The builder keeps a [`Registry`] keyed by fully-qualified name and resolves
//! every classifier reference with get-or-create semantics, so a class may be
//! named as a parent before its own declaration is seen. The first creation
//! of a name fixes its kind; later declarations of the other kind reuse the
//! existing classifier and their kind-specific contents are dropped.
//!
//! The builder never fails. Unknown annotations and `with` clauses without a
//! value are skipped.

use log::{debug, trace};

use metamodel_core::{
    Classifier, ClassifierId, ClassifierKind, Dependency, Model, Property, Registry,
};

use crate::ast;

/// Annotation names that set a property flag.
const LEARNED: &str = "learned";
const DERIVED: &str = "derived";
const GLOBAL: &str = "global";

/// Builds a [`Model`] from one or more [`ast::Metamodel`]s.
///
/// # Examples
///
/// ```
/// use metamodel_parser::{ModelBuilder, parse_declarations};
///
/// let mut builder = ModelBuilder::new();
/// builder.declare(&parse_declarations("class Car extends Vehicle {}").unwrap());
/// builder.declare(&parse_declarations("class Vehicle { wheels: Int }").unwrap());
/// let model = builder.finish();
///
/// let car = model.get("Car").and_then(|c| c.as_class()).unwrap();
/// let vehicle = model.parents(car).next().unwrap();
/// assert_eq!(vehicle.as_class().map(|v| v.property_count()), Some(1));
/// ```
#[derive(Debug, Default)]
pub struct ModelBuilder {
    registry: Registry,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the classifier registered under `fqn`, creating an empty one
    /// of the requested kind if there is none.
    ///
    /// An existing classifier is returned whatever its kind.
    pub fn resolve(&mut self, fqn: &str, kind: ClassifierKind) -> ClassifierId {
        if let Some(id) = self.registry.get(fqn) {
            return id;
        }

        let id = self.registry.add_classifier(Classifier::new(kind, fqn));
        debug!(fqn, kind:%, id:%; "Created classifier");
        id
    }

    /// Processes every declaration of `metamodel`.
    ///
    /// All enums are declared before any class. Calling this again with
    /// another document extends the same registry.
    pub fn declare(&mut self, metamodel: &ast::Metamodel) {
        for declaration in metamodel.enums() {
            self.declare_enum(declaration);
        }
        for declaration in metamodel.classes() {
            self.declare_class(declaration);
        }
    }

    /// Ends the build and returns the frozen model.
    pub fn finish(self) -> Model {
        self.registry.freeze()
    }

    fn declare_enum(&mut self, declaration: &ast::EnumDeclaration) {
        let fqn = declaration.name.as_str();
        let id = self.resolve(fqn, ClassifierKind::Enum);

        let Some(enumeration) = self
            .registry
            .classifier_mut(id)
            .and_then(Classifier::as_enum_mut)
        else {
            debug!(fqn, literals = declaration.literals.len(); "Name already registered as a class, skipping enum literals");
            return;
        };

        for literal in &declaration.literals {
            enumeration.add_literal(literal.inner().as_str());
        }
    }

    fn declare_class(&mut self, declaration: &ast::ClassDeclaration) {
        let fqn = declaration.name.as_str();
        let id = self.resolve(fqn, ClassifierKind::Class);

        if self.registry.classifier(id).is_some_and(Classifier::is_enum) {
            debug!(fqn; "Name already registered as an enum, skipping class body");
            return;
        }

        let parents: Vec<_> = declaration
            .parents
            .iter()
            .map(|parent| {
                let parent_fqn = parent.as_str();
                (parent_fqn, self.resolve(parent_fqn, ClassifierKind::Class))
            })
            .collect();

        let properties = declaration
            .attributes
            .iter()
            .map(attribute_property)
            .chain(declaration.relations.iter().map(relation_property));

        let Some(class) = self
            .registry
            .classifier_mut(id)
            .and_then(Classifier::as_class_mut)
        else {
            return;
        };

        for (parent_fqn, parent_id) in parents {
            if !class.add_parent(parent_fqn, parent_id) {
                trace!(fqn, parent = parent_fqn; "Duplicate parent ignored");
            }
        }
        for property in properties {
            trace!(fqn, property:% = property; "Attaching property");
            if let Some(previous) = class.add_property(property) {
                debug!(fqn, property = previous.name(); "Property redeclared, keeping the later one");
            }
        }
    }
}

fn attribute_property(declaration: &ast::AttributeDecl) -> Property {
    let type_name = if declaration.ty.name.is_qualified() {
        declaration.ty.name.as_str().to_string()
    } else {
        declaration.ty.raw_text()
    };

    let mut property = Property::attribute(declaration.name.inner().as_str(), type_name);
    apply_annotations(&mut property, &declaration.annotations);
    if let Some(block) = &declaration.semantics {
        apply_semantics(&mut property, block);
    }
    property
}

fn relation_property(declaration: &ast::RelationDecl) -> Property {
    let mut property = Property::relation(
        declaration.name.inner().as_str(),
        declaration.target.as_str(),
    );
    apply_annotations(&mut property, &declaration.annotations);
    if let Some(block) = &declaration.semantics {
        apply_semantics(&mut property, block);
    }
    property
}

fn apply_annotations(property: &mut Property, annotations: &[ast::Annotation]) {
    for annotation in annotations {
        match annotation.inner().as_str() {
            LEARNED => property.set_learned(),
            DERIVED => property.set_derived(),
            GLOBAL => property.set_global(),
            other => trace!(property = property.name(), annotation = other; "Ignoring unknown annotation"),
        }
    }
}

fn apply_semantics(property: &mut Property, block: &ast::SemanticBlock) {
    for from in &block.from {
        property.add_dependency(Dependency::new(strip_quotes(from)));
    }
    for using in &block.using {
        property.set_algorithm(strip_quotes(using));
    }
    for clause in &block.with {
        let value = match &clause.value {
            Some(ast::Literal::Number(number)) => number.inner().as_str(),
            Some(ast::Literal::String(string)) => strip_quotes(string),
            None => {
                trace!(property = property.name(), parameter = clause.name.inner().as_str(); "Ignoring parameter without value");
                continue;
            }
        };
        property.add_parameter(clause.name.inner().as_str(), value);
    }
}

/// Removes one leading and one trailing `"`. Escapes are left as written.
fn strip_quotes(raw: &str) -> &str {
    let raw = raw.strip_prefix('"').unwrap_or(raw);
    raw.strip_suffix('"').unwrap_or(raw)
}
