//! Shared models: archives, element tree and declared-type keys

pub mod archive;
pub mod declared_type;
pub mod element;

pub use archive::{Archive, ArchiveReader, ArchiveSource};
pub use declared_type::DeclaredType;
pub use element::{Element, ElementKind, ElementNode, TypeKind, Visibility};
