//! Element filter consumed by the diffing engine
//!
//! The engine calls [`ApiElementFilter::applies`] for every candidate element
//! and [`ApiElementFilter::should_descend_into`] before recursing into a type.
//! Elements from archives outside the comparison (JDK, dependencies) are never
//! API.

use std::collections::HashMap;
use std::sync::Arc;

use prometheus::Registry;

use crate::config::ApiBoundaryConfig;
use crate::errors::{BoundaryError, Result};
use crate::features::boundary::ApiBoundary;
use crate::features::cache::BoundaryCache;
use crate::features::owner_resolution::ElementOwnerResolver;
use crate::features::policy::BoundaryResolutionPolicy;
use crate::shared::models::{Archive, Element};

/// Extension id the engine registers the filter under
pub const EXTENSION_ID: &str = "mule.module.filter";

/// Which side of the comparison an archive belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    Old,
    New,
}

#[derive(Debug)]
pub struct ApiElementFilter {
    policy: BoundaryResolutionPolicy,
    cache: BoundaryCache,
    archives: HashMap<String, (ApiVersion, Archive)>,
    verbose: bool,
}

impl ApiElementFilter {
    /// Filter with a private metrics registry
    pub fn new(
        config: &ApiBoundaryConfig,
        old_archives: impl IntoIterator<Item = Archive>,
        new_archives: impl IntoIterator<Item = Archive>,
    ) -> Result<Self> {
        Self::with_registry(config, old_archives, new_archives, &Registry::new())
    }

    pub fn with_registry(
        config: &ApiBoundaryConfig,
        old_archives: impl IntoIterator<Item = Archive>,
        new_archives: impl IntoIterator<Item = Archive>,
        registry: &Registry,
    ) -> Result<Self> {
        let mut archives = HashMap::new();
        let tagged = old_archives
            .into_iter()
            .map(|a| (ApiVersion::Old, a))
            .chain(new_archives.into_iter().map(|a| (ApiVersion::New, a)));
        for (version, archive) in tagged {
            archive.ensure_named()?;
            let name = archive.name().to_string();
            // elements only carry the archive name, so names must tell the sides apart
            if let Some((existing, _)) = archives.insert(name.clone(), (version, archive)) {
                return Err(BoundaryError::invalid_argument(format!(
                    "Archive name '{}' is used by both the {:?} and the {:?} side; archive names must be unique.",
                    name, existing, version
                )));
            }
        }

        Ok(Self {
            policy: BoundaryResolutionPolicy::from_config(config)?,
            cache: BoundaryCache::new(registry)?,
            archives,
            verbose: config.verbose_logging,
        })
    }

    pub fn extension_id(&self) -> &'static str {
        EXTENSION_ID
    }

    pub fn policy(&self) -> &BoundaryResolutionPolicy {
        &self.policy
    }

    pub fn cache(&self) -> &BoundaryCache {
        &self.cache
    }

    /// Side of the comparison the archive was registered for
    pub fn api_version_of(&self, archive_name: &str) -> Option<ApiVersion> {
        self.archives.get(archive_name).map(|(version, _)| *version)
    }

    /// Whether the element is part of the API of its archive
    ///
    /// # Errors
    ///
    /// Any resolution error; nothing is defaulted to "not API".
    pub fn applies<E: Element + ?Sized>(&self, element: &E) -> Result<bool> {
        let verdict = self.decide(element)?;
        if self.verbose {
            tracing::info!(element = %element.canonical_name(), verdict, "applies");
        }
        Ok(verdict)
    }

    /// Whether the engine should recurse into the element; only types qualify
    pub fn should_descend_into<E: Element + ?Sized>(&self, element: &E) -> Result<bool> {
        let descend = element.is_declared_type() && self.decide(element)?;
        if self.verbose {
            tracing::info!(element = %element.canonical_name(), descend, "should descend into");
        }
        Ok(descend)
    }

    fn decide<E: Element + ?Sized>(&self, element: &E) -> Result<bool> {
        let Some(archive) = element
            .archive_name()
            .and_then(|name| self.archives.get(name))
            .map(|(_, archive)| archive)
        else {
            return Ok(false);
        };

        let owner = ElementOwnerResolver::owner_key_of(element)?;
        let boundary = self.boundary_for(element, archive)?;
        Ok(boundary.is_api(&owner))
    }

    fn boundary_for<E: Element + ?Sized>(
        &self,
        element: &E,
        archive: &Archive,
    ) -> Result<Arc<dyn ApiBoundary>> {
        self.cache.boundary_for(archive, || {
            let boundary = self.policy.resolve_boundary(element, archive)?;
            if self.verbose {
                tracing::info!(archive = %archive.name(), "Resolved API boundary: {}", boundary);
            }
            Ok(boundary)
        })
    }
}
