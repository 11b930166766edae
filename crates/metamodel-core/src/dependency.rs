//! Provenance records attached to properties.

use std::fmt;

/// An immutable provenance path, written as `from "<path>"` in a semantic block.
///
/// The stored path never carries the surrounding quote characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    path: String,
}

impl Dependency {
    /// Creates a dependency on the given source path.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the source path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

impl From<&str> for Dependency {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}
