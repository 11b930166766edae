//! Fully-qualified name handling.
//!
//! Classifier names are written either as a bare identifier (`Car`) or as a
//! dotted qualified name (`org.fleet.Car`). The package is everything before
//! the last [`SEPARATOR`], the local name everything after it.

/// Separator between package segments and the local name.
pub const SEPARATOR: char = '.';

/// Splits a fully-qualified name into its package and local name.
///
/// # Examples
///
/// ```
/// use metamodel_core::identifier::split;
///
/// assert_eq!(split("org.fleet.Car"), (Some("org.fleet"), "Car"));
/// assert_eq!(split("Car"), (None, "Car"));
/// ```
pub fn split(fqn: &str) -> (Option<&str>, &str) {
    match fqn.rfind(SEPARATOR) {
        Some(idx) => (Some(&fqn[..idx]), &fqn[idx + SEPARATOR.len_utf8()..]),
        None => (None, fqn),
    }
}

/// Joins a package and a local name back into a fully-qualified name.
///
/// # Examples
///
/// ```
/// use metamodel_core::identifier::join;
///
/// assert_eq!(join(Some("org.fleet"), "Car"), "org.fleet.Car");
/// assert_eq!(join(None, "Car"), "Car");
/// ```
pub fn join(package: Option<&str>, name: &str) -> String {
    match package {
        Some(package) => format!("{package}{SEPARATOR}{name}"),
        None => name.to_string(),
    }
}
