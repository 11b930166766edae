//! The classifier registry and the frozen model.
//!
//! Building a model is a two-phase affair. During the build phase a mutable
//! [`Registry`] owns all classifiers; [`Registry::freeze`] consumes it and
//! yields a read-only [`Model`]. Ids handed out by the registry stay valid in
//! the model.

use std::ops::Index;

use indexmap::IndexMap;
use log::{debug, trace};

use crate::classifier::{Class, Classifier, ClassifierId};

/// Build-phase storage for classifiers, keyed by fully-qualified name.
#[derive(Debug, Default)]
pub struct Registry {
    classifiers: Vec<Classifier>,
    index: IndexMap<String, ClassifierId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the id registered under `fqn`. The match is exact.
    pub fn get(&self, fqn: &str) -> Option<ClassifierId> {
        self.index.get(fqn).copied()
    }

    pub fn classifier(&self, id: ClassifierId) -> Option<&Classifier> {
        self.classifiers.get(id.index())
    }

    pub fn classifier_mut(&mut self, id: ClassifierId) -> Option<&mut Classifier> {
        self.classifiers.get_mut(id.index())
    }

    /// Registers a classifier under its fully-qualified name.
    ///
    /// If a classifier with the same fqn is already registered it is replaced
    /// in place and keeps its id.
    pub fn add_classifier(&mut self, classifier: Classifier) -> ClassifierId {
        let fqn = classifier.fqn();
        if let Some(id) = self.get(&fqn) {
            debug!(fqn:%, id:%; "Replacing classifier");
            self.classifiers[id.index()] = classifier;
            return id;
        }

        let id = ClassifierId::new(self.classifiers.len());
        trace!(fqn:%, id:%, kind:% = classifier.kind(); "Registering classifier");
        self.classifiers.push(classifier);
        self.index.insert(fqn, id);
        id
    }

    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }

    /// Ends the build phase.
    pub fn freeze(self) -> Model {
        debug!(classifiers = self.classifiers.len(); "Freezing registry");
        Model {
            classifiers: self.classifiers,
            index: self.index,
        }
    }
}

/// A fully built, read-only metamodel.
#[derive(Debug, Clone, Default)]
pub struct Model {
    classifiers: Vec<Classifier>,
    index: IndexMap<String, ClassifierId>,
}

impl Model {
    /// Looks up a classifier by fully-qualified name. The match is exact.
    ///
    /// # Examples
    ///
    /// ```
    /// use metamodel_core::{Classifier, Registry};
    ///
    /// let mut registry = Registry::new();
    /// registry.add_classifier(Classifier::new_enum("paint.Color"));
    /// let model = registry.freeze();
    ///
    /// assert!(model.get("paint.Color").is_some_and(Classifier::is_enum));
    /// assert!(model.get("Color").is_none());
    /// assert!(model.get("paint.color").is_none());
    /// ```
    pub fn get(&self, fqn: &str) -> Option<&Classifier> {
        self.id_of(fqn).map(|id| &self[id])
    }

    pub fn id_of(&self, fqn: &str) -> Option<ClassifierId> {
        self.index.get(fqn).copied()
    }

    pub fn classifier(&self, id: ClassifierId) -> Option<&Classifier> {
        self.classifiers.get(id.index())
    }

    /// Iterates over all classifiers in registration order.
    pub fn classifiers(&self) -> impl Iterator<Item = (ClassifierId, &Classifier)> {
        self.classifiers
            .iter()
            .enumerate()
            .map(|(index, classifier)| (ClassifierId::new(index), classifier))
    }

    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }

    /// Resolves the parents of `class` in first-insertion order.
    pub fn parents<'a>(&'a self, class: &'a Class) -> impl Iterator<Item = &'a Classifier> + 'a {
        class.parent_ids().filter_map(|id| self.classifier(id))
    }
}

impl Index<ClassifierId> for Model {
    type Output = Classifier;

    fn index(&self, id: ClassifierId) -> &Self::Output {
        &self.classifiers[id.index()]
    }
}
