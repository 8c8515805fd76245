//! Stable key of a declared type

use std::fmt;

use super::element::Element;
use crate::errors::{BoundaryError, Result};

/// Declared type identified by archive + canonical name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclaredType {
    archive: String,
    canonical_name: String,
}

impl DeclaredType {
    pub fn new(archive: impl Into<String>, canonical_name: impl Into<String>) -> Self {
        Self {
            archive: archive.into(),
            canonical_name: canonical_name.into(),
        }
    }

    /// Key of a declared-type element
    pub fn from_element<E: Element + ?Sized>(element: &E) -> Result<Self> {
        if !element.is_declared_type() {
            return Err(BoundaryError::invalid_argument(format!(
                "Element is not a declared type: {}",
                element.canonical_name()
            )));
        }
        if element.canonical_name().is_empty() {
            return Err(BoundaryError::invalid_argument(
                "Declared type must have a canonical name.",
            ));
        }
        let archive = element.archive_name().ok_or_else(|| {
            BoundaryError::invalid_argument(format!(
                "Declared type {} does not belong to an archive.",
                element.canonical_name()
            ))
        })?;

        Ok(Self::new(archive, element.canonical_name()))
    }

    pub fn archive(&self) -> &str {
        &self.archive
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    /// Everything before the last `.`; empty for the default package
    pub fn package_name(&self) -> &str {
        match self.canonical_name.rfind('.') {
            Some(index) => &self.canonical_name[..index],
            None => "",
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.canonical_name, self.archive)
    }
}
