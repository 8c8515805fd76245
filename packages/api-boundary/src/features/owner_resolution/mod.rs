//! Element owner resolution
//!
//! API decisions are made per top-level type: members, parameters and nested
//! types all resolve to the outermost declared type that sits directly under a
//! non-type container (usually a package).

use crate::errors::{BoundaryError, Result};
use crate::shared::models::{DeclaredType, Element};

/// Finds the outermost enclosing declared type of an element
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementOwnerResolver;

impl ElementOwnerResolver {
    /// Walk parent links up to the first declared type whose parent is not one.
    ///
    /// Returns `element` itself when it already qualifies.
    ///
    /// # Errors
    ///
    /// `NotFound` when the root is reached without finding such a type.
    pub fn owner_type_of<'e, E: Element + ?Sized>(element: &'e E) -> Result<&'e E> {
        let mut current = element;
        loop {
            let parent = current.parent();
            let parent_is_type = parent.map_or(false, |p| p.is_declared_type());

            if current.is_declared_type() && !parent_is_type {
                return Ok(current);
            }

            match parent {
                Some(parent) => current = parent,
                None => {
                    return Err(BoundaryError::not_found(format!(
                        "Could not find the declared type element for: {}",
                        element.canonical_name()
                    )))
                }
            }
        }
    }

    /// Stable key of the owning type
    pub fn owner_key_of<E: Element + ?Sized>(element: &E) -> Result<DeclaredType> {
        DeclaredType::from_element(Self::owner_type_of(element)?)
    }
}
