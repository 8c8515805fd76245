/*
 * api-boundary - API surface resolution for jars
 *
 * Feature-First Architecture:
 * - shared/   : Archive handle, element tree, declared-type keys
 * - features/ : Vertical slices (owner_resolution → module_descriptor →
 *               boundary → policy → cache → filter, plus transform)
 * - config/   : Versioned YAML configuration
 * - errors    : Crate error type
 *
 * A diffing engine asks the filter, per element, whether it is API. The
 * answer comes from the archive's platform module (`module-info.class`) or its
 * proprietary descriptor (`META-INF/mule-module.properties`), resolved once
 * per archive and cached for the run.
 */

#![allow(clippy::new_without_default)] // builders are not meant to be defaulted
#![allow(clippy::module_inception)]

pub mod config;
pub mod errors;
pub mod features;
pub mod shared;

#[doc(hidden)]
pub mod testing;

pub use config::{ApiBoundaryConfig, ModuleSystemMode};
pub use errors::{BoundaryError, Result};
pub use features::boundary::{
    ApiBoundary, ApiBoundaryExt, BoundaryKind, CachedApiBoundary, PlatformApiBoundary,
    ProprietaryApiBoundary,
};
pub use features::cache::BoundaryCache;
pub use features::filter::{ApiElementFilter, ApiVersion, EXTENSION_ID};
pub use features::owner_resolution::ElementOwnerResolver;
pub use features::policy::BoundaryResolutionPolicy;
pub use shared::models::{
    Archive, DeclaredType, Element, ElementKind, ElementNode, TypeKind, Visibility,
};
