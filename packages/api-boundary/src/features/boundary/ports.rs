//! API boundary port
//!
//! A boundary answers "is this declared type part of the API" for exactly one
//! archive. Implementations are immutable once built and shared across
//! threads behind `Arc<dyn ApiBoundary>`.

use std::fmt;

use crate::errors::{BoundaryError, Result};
use crate::features::owner_resolution::ElementOwnerResolver;
use crate::shared::models::{DeclaredType, Element};

/// Module system a boundary was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    Platform,
    Proprietary,
}

impl BoundaryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryKind::Platform => "platform",
            BoundaryKind::Proprietary => "proprietary",
        }
    }
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision function over declared types of one archive
///
/// `Display` renders the human-readable description logged once per archive
/// (module name and package sets).
pub trait ApiBoundary: fmt::Display + Send + Sync {
    /// Whether the declared type belongs to the API surface
    fn is_api(&self, declared_type: &DeclaredType) -> bool;

    /// True when the boundary carries no usable export information
    fn is_empty(&self) -> bool;

    fn kind(&self) -> BoundaryKind;

    /// Archive the boundary was built for
    fn archive_name(&self) -> &str;

    fn module_name(&self) -> Option<&str>;
}

/// Element-level queries for any boundary
pub trait ApiBoundaryExt: ApiBoundary {
    /// Resolve the owning declared type of `element` and ask the boundary.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the element has no enclosing declared type
    /// - `InvalidArgument` when the element belongs to another archive
    fn is_api_element<E: Element + ?Sized>(&self, element: &E) -> Result<bool> {
        let owner = ElementOwnerResolver::owner_key_of(element)?;
        if owner.archive() != self.archive_name() {
            return Err(BoundaryError::invalid_argument(format!(
                "Type {} belongs to '{}', not to '{}'.",
                owner.canonical_name(),
                owner.archive(),
                self.archive_name()
            )));
        }
        Ok(self.is_api(&owner))
    }
}

impl<B: ApiBoundary + ?Sized> ApiBoundaryExt for B {}
