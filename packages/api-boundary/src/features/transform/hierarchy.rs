//! Annotation lookup over the type hierarchy

use std::collections::{HashMap, HashSet};

use crate::shared::models::TypeKind;

/// Type information the engine exposes for the compared archives
pub trait TypeHierarchy: Send + Sync {
    fn type_kind(&self, type_name: &str) -> Option<TypeKind>;

    /// Whether the type is directly annotated with `annotation`
    fn has_annotation(&self, type_name: &str, annotation: &str) -> bool;

    fn direct_supertypes(&self, type_name: &str) -> Vec<String>;
}

/// The type, or any transitive supertype, is of an accepted kind and directly
/// carries the annotation. Cycles in the hierarchy are tolerated.
pub fn carries_annotation<H: TypeHierarchy + ?Sized>(
    hierarchy: &H,
    type_name: &str,
    annotation: &str,
    accepted_kinds: &[TypeKind],
) -> bool {
    let mut visited = HashSet::new();
    let mut pending = vec![type_name.to_string()];

    while let Some(current) = pending.pop() {
        if !visited.insert(current.clone()) {
            continue;
        }
        let accepted = hierarchy
            .type_kind(&current)
            .map_or(false, |kind| accepted_kinds.contains(&kind));
        if accepted && hierarchy.has_annotation(&current, annotation) {
            return true;
        }
        pending.extend(hierarchy.direct_supertypes(&current));
    }
    false
}

#[derive(Debug, Clone)]
struct TypeInfo {
    kind: TypeKind,
    annotations: HashSet<String>,
    supertypes: Vec<String>,
}

/// Hierarchy assembled by hand, for engines that export plain type tables
#[derive(Debug, Clone, Default)]
pub struct InMemoryTypeHierarchy {
    types: HashMap<String, TypeInfo>,
}

impl InMemoryTypeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, name: &str, kind: TypeKind) -> Self {
        self.types.insert(
            name.to_string(),
            TypeInfo {
                kind,
                annotations: HashSet::new(),
                supertypes: Vec::new(),
            },
        );
        self
    }

    /// No-op when the type was not declared first
    pub fn annotated(mut self, name: &str, annotation: &str) -> Self {
        if let Some(info) = self.types.get_mut(name) {
            info.annotations.insert(annotation.to_string());
        }
        self
    }

    pub fn extends(mut self, name: &str, supertype: &str) -> Self {
        if let Some(info) = self.types.get_mut(name) {
            info.supertypes.push(supertype.to_string());
        }
        self
    }
}

impl TypeHierarchy for InMemoryTypeHierarchy {
    fn type_kind(&self, type_name: &str) -> Option<TypeKind> {
        self.types.get(type_name).map(|info| info.kind)
    }

    fn has_annotation(&self, type_name: &str, annotation: &str) -> bool {
        self.types
            .get(type_name)
            .map_or(false, |info| info.annotations.contains(annotation))
    }

    fn direct_supertypes(&self, type_name: &str) -> Vec<String> {
        self.types
            .get(type_name)
            .map(|info| info.supertypes.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_EXTEND: &str = "org.mule.api.annotation.NoExtend";
    const CLASSES: &[TypeKind] = &[TypeKind::Class, TypeKind::Enum];

    #[test]
    fn test_direct_annotation() {
        let hierarchy = InMemoryTypeHierarchy::new()
            .with_type("org.foo.A", TypeKind::Class)
            .annotated("org.foo.A", NO_EXTEND);
        assert!(carries_annotation(&hierarchy, "org.foo.A", NO_EXTEND, CLASSES));
        assert!(!carries_annotation(&hierarchy, "org.foo.Missing", NO_EXTEND, CLASSES));
    }

    #[test]
    fn test_inherited_through_superclass() {
        let hierarchy = InMemoryTypeHierarchy::new()
            .with_type("org.foo.Base", TypeKind::Class)
            .annotated("org.foo.Base", NO_EXTEND)
            .with_type("org.foo.Mid", TypeKind::Class)
            .extends("org.foo.Mid", "org.foo.Base")
            .with_type("org.foo.Leaf", TypeKind::Class)
            .extends("org.foo.Leaf", "org.foo.Mid");
        assert!(carries_annotation(&hierarchy, "org.foo.Leaf", NO_EXTEND, CLASSES));
    }

    #[test]
    fn test_kind_must_be_accepted() {
        let hierarchy = InMemoryTypeHierarchy::new()
            .with_type("org.foo.I", TypeKind::Interface)
            .annotated("org.foo.I", NO_EXTEND)
            .with_type("org.foo.Impl", TypeKind::Class)
            .extends("org.foo.Impl", "org.foo.I");
        assert!(!carries_annotation(&hierarchy, "org.foo.Impl", NO_EXTEND, CLASSES));
        assert!(carries_annotation(
            &hierarchy,
            "org.foo.Impl",
            NO_EXTEND,
            &[TypeKind::Interface]
        ));
    }

    #[test]
    fn test_cycle_terminates() {
        let hierarchy = InMemoryTypeHierarchy::new()
            .with_type("a.A", TypeKind::Class)
            .extends("a.A", "a.B")
            .with_type("a.B", TypeKind::Class)
            .extends("a.B", "a.A");
        assert!(!carries_annotation(&hierarchy, "a.A", NO_EXTEND, CLASSES));
    }
}
