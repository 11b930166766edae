//! Plain-text outline of a [`Model`].
//!
//! Each classifier is printed as a header line followed by its indented
//! contents: enum literals, or class properties with their metadata.
//!
//! ```text
//! enum paint.Color
//!   RED
//!   GREEN
//!
//! class fleet.Car extends fleet.Vehicle
//!   @learned att speed: Double
//!     from "sensors/gps"
//!     using "kalman"
//!     with window = 10
//!     with unit = "kelvin"
//! ```
//!
//! Dependencies, algorithms and parameters are written in source syntax:
//! string values are quoted and numeric parameters are written bare. The
//! model does not remember how a parameter was spelled, so a string
//! parameter whose text is a number (`"10"`) is written as the number `10`.

use std::fmt;

use log::trace;

use metamodel_core::{Class, Classifier, ClassifierBody, Enum, Model, Property};

use crate::config::{DisplayConfig, Order};

/// Displays a [`Model`] as an indented outline.
pub(crate) struct Outline<'a> {
    model: &'a Model,
    config: &'a DisplayConfig,
}

impl<'a> Outline<'a> {
    pub(crate) fn new(model: &'a Model, config: &'a DisplayConfig) -> Self {
        Self { model, config }
    }

    fn ordered(&self) -> Vec<&'a Classifier> {
        let mut classifiers: Vec<_> = self.model.classifiers().map(|(_, c)| c).collect();
        if self.config.order() == Order::Alphabetical {
            classifiers.sort_by_cached_key(|c| c.fqn());
        }
        classifiers
    }

    fn write_enum(&self, f: &mut fmt::Formatter<'_>, enumeration: &Enum) -> fmt::Result {
        for literal in enumeration.literals() {
            writeln!(f, "  {literal}")?;
        }
        Ok(())
    }

    fn write_class(&self, f: &mut fmt::Formatter<'_>, class: &Class) -> fmt::Result {
        for property in class.properties() {
            writeln!(f, "  {property}")?;
            if self.config.metadata() {
                write_metadata(f, property)?;
            }
        }
        Ok(())
    }
}

fn write_metadata(f: &mut fmt::Formatter<'_>, property: &Property) -> fmt::Result {
    for dependency in property.dependencies() {
        writeln!(f, "    from \"{dependency}\"")?;
    }
    if let Some(algorithm) = property.algorithm() {
        writeln!(f, "    using \"{algorithm}\"")?;
    }
    for (name, value) in property.parameters() {
        if is_number(value) {
            writeln!(f, "    with {name} = {value}")?;
        } else {
            writeln!(f, "    with {name} = \"{value}\"")?;
        }
    }
    Ok(())
}

/// Whether `value` is spelled as a number literal, `-?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?`.
fn is_number(value: &str) -> bool {
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    let unsigned = value.strip_prefix('-').unwrap_or(value);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (unsigned, None),
    };
    let mantissa_ok = match mantissa.split_once('.') {
        Some((whole, fraction)) => digits(whole) && digits(fraction),
        None => digits(mantissa),
    };

    mantissa_ok && exponent.is_none_or(|e| digits(e.strip_prefix(['+', '-']).unwrap_or(e)))
}

impl fmt::Display for Outline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, classifier) in self.ordered().into_iter().enumerate() {
            trace!(classifier:% = classifier; "Writing outline entry");
            if index > 0 {
                writeln!(f)?;
            }

            write!(f, "{classifier}")?;
            match classifier.body() {
                ClassifierBody::Enum(enumeration) => {
                    writeln!(f)?;
                    self.write_enum(f, enumeration)?;
                }
                ClassifierBody::Class(class) => {
                    let mut parents = class.parents().map(|(fqn, _)| fqn).peekable();
                    if parents.peek().is_some() {
                        write!(f, " extends {}", parents.collect::<Vec<_>>().join(", "))?;
                    }
                    writeln!(f)?;
                    self.write_class(f, class)?;
                }
            }
        }
        Ok(())
    }
}
