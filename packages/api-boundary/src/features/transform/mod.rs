//! Annotation-based difference suppression
//!
//! Runs after the engine has produced a difference report; it never touches
//! boundary resolution.

pub mod annotation;
pub mod difference;
pub mod hierarchy;

pub use annotation::{
    apply_transforms, default_transforms, AnnotationTransform, DifferenceTransform, NO_EXTEND,
    NO_EXTEND_ID, NO_IMPLEMENT, NO_IMPLEMENT_ID, NO_INSTANTIATE, NO_INSTANTIATE_ID,
};
pub use difference::{codes, Difference};
pub use hierarchy::{carries_annotation, InMemoryTypeHierarchy, TypeHierarchy};
