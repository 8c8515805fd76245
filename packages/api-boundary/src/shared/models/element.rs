//! Element tree abstraction
//!
//! The diffing engine owns its element tree. This crate only needs identity
//! (canonical name + archive), the parent link and the kind of each node.
//! [`ElementNode`] is a ready-made `Arc`-linked tree for engines (and tests)
//! without a tree of their own.

use std::fmt;
use std::sync::Arc;

/// Kind of a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Record,
}

/// Kind of an element node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Package,
    Type(TypeKind),
    Method,
    Constructor,
    Field,
    Parameter,
    Annotation,
}

impl ElementKind {
    /// Declared-type nodes are where API decisions are made
    pub fn is_declared_type(&self) -> bool {
        matches!(self, ElementKind::Type(_))
    }

    pub fn type_kind(&self) -> Option<TypeKind> {
        match self {
            ElementKind::Type(kind) => Some(*kind),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    PackagePrivate,
    Private,
}

/// A node of the engine's element tree
pub trait Element: fmt::Debug {
    fn kind(&self) -> ElementKind;

    fn parent(&self) -> Option<&Self>;

    /// Dot-qualified name; for types `org.foo.Outer.Inner`
    fn canonical_name(&self) -> &str;

    /// Name of the archive that declares this element, if any
    fn archive_name(&self) -> Option<&str>;

    fn visibility(&self) -> Visibility {
        Visibility::Public
    }

    fn is_declared_type(&self) -> bool {
        self.kind().is_declared_type()
    }
}

/// `Arc`-linked element tree node
#[derive(Debug)]
pub struct ElementNode {
    kind: ElementKind,
    canonical_name: String,
    archive: Option<String>,
    visibility: Visibility,
    parent: Option<Arc<ElementNode>>,
}

impl ElementNode {
    /// Root package node of an archive
    pub fn package(archive: Option<&str>, name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            kind: ElementKind::Package,
            canonical_name: name.into(),
            archive: archive.map(str::to_string),
            visibility: Visibility::Public,
            parent: None,
        })
    }

    /// Child node; inherits the archive of its parent
    pub fn child(
        parent: &Arc<ElementNode>,
        kind: ElementKind,
        name: &str,
        visibility: Visibility,
    ) -> Arc<Self> {
        let canonical_name = match (parent.kind, kind) {
            (ElementKind::Package, _) if parent.canonical_name.is_empty() => name.to_string(),
            (ElementKind::Package, _) | (ElementKind::Type(_), ElementKind::Type(_)) => {
                format!("{}.{}", parent.canonical_name, name)
            }
            (ElementKind::Type(_), _) => format!("{}#{}", parent.canonical_name, name),
            _ => format!("{}/{}", parent.canonical_name, name),
        };

        Arc::new(Self {
            kind,
            canonical_name,
            archive: parent.archive.clone(),
            visibility,
            parent: Some(Arc::clone(parent)),
        })
    }

    /// Public top-level type; builds the package node from the qualified name
    pub fn top_level_type(archive: Option<&str>, qualified_name: &str, kind: TypeKind) -> Arc<Self> {
        let (package, simple) = match qualified_name.rfind('.') {
            Some(index) => (&qualified_name[..index], &qualified_name[index + 1..]),
            None => ("", qualified_name),
        };
        let package = Self::package(archive, package);
        Self::child(&package, ElementKind::Type(kind), simple, Visibility::Public)
    }

    pub fn parent_node(&self) -> Option<&Arc<ElementNode>> {
        self.parent.as_ref()
    }
}

impl Element for ElementNode {
    fn kind(&self) -> ElementKind {
        self.kind
    }

    fn parent(&self) -> Option<&Self> {
        self.parent.as_deref()
    }

    fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    fn archive_name(&self) -> Option<&str> {
        self.archive.as_deref()
    }

    fn visibility(&self) -> Visibility {
        self.visibility
    }
}

impl fmt::Display for ElementNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.archive {
            Some(archive) => write!(f, "{:?} {} ({})", self.kind, self.canonical_name, archive),
            None => write!(f, "{:?} {}", self.kind, self.canonical_name),
        }
    }
}
