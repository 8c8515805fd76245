//! Boundary resolution policy
//!
//! Picks the module system that decides the API boundary of an archive:
//!
//! | mode               | boundary                                                    |
//! |--------------------|-------------------------------------------------------------|
//! | `platform_only`    | platform module (automatic for plain jars)                  |
//! | `proprietary_only` | proprietary descriptor (empty when absent)                  |
//! | `mixed`            | platform module, unless it is automatic and the proprietary |
//! |                    | descriptor is non-empty                                     |
//!
//! Every returned boundary is wrapped in [`CachedApiBoundary`].

use std::sync::Arc;

use crate::config::{ApiBoundaryConfig, ModuleSystemMode, ProprietaryDescriptorConfig};
use crate::errors::{BoundaryError, Result};
use crate::features::boundary::{
    ApiBoundary, CachedApiBoundary, PlatformApiBoundary, ProprietaryApiBoundary,
};
use crate::features::module_descriptor::ExcludedTargetPatterns;
use crate::shared::models::{Archive, Element};

#[derive(Debug, Clone)]
pub struct BoundaryResolutionPolicy {
    mode: ModuleSystemMode,
    excluded_targets: ExcludedTargetPatterns,
    descriptor: ProprietaryDescriptorConfig,
}

impl BoundaryResolutionPolicy {
    pub fn new(
        mode: ModuleSystemMode,
        excluded_targets: ExcludedTargetPatterns,
        descriptor: ProprietaryDescriptorConfig,
    ) -> Self {
        Self {
            mode,
            excluded_targets,
            descriptor,
        }
    }

    /// Compile the excluded-target patterns of the configuration
    pub fn from_config(config: &ApiBoundaryConfig) -> Result<Self> {
        let excluded_targets =
            ExcludedTargetPatterns::from_patterns(&config.excluded_platform_export_targets)?;
        Ok(Self::new(
            config.module_system_mode,
            excluded_targets,
            config.proprietary_descriptor.clone(),
        ))
    }

    pub fn mode(&self) -> ModuleSystemMode {
        self.mode
    }

    /// Platform boundary of the archive; not available in `proprietary_only`
    pub fn platform_boundary(&self, archive: &Archive) -> Result<PlatformApiBoundary> {
        match self.mode {
            ModuleSystemMode::ProprietaryOnly => Err(self.unsupported("platform")),
            ModuleSystemMode::PlatformOnly | ModuleSystemMode::Mixed => {
                PlatformApiBoundary::from_archive(archive, &self.excluded_targets)
            }
        }
    }

    /// Proprietary boundary of the archive; not available in `platform_only`
    pub fn proprietary_boundary(&self, archive: &Archive) -> Result<ProprietaryApiBoundary> {
        match self.mode {
            ModuleSystemMode::PlatformOnly => Err(self.unsupported("proprietary")),
            ModuleSystemMode::ProprietaryOnly | ModuleSystemMode::Mixed => {
                ProprietaryApiBoundary::from_archive(archive, &self.descriptor)
            }
        }
    }

    /// Boundary for the archive that declares `element`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the element does not belong to `archive`, plus
    /// every error of [`Self::resolve_archive_boundary`].
    pub fn resolve_boundary<E: Element + ?Sized>(
        &self,
        element: &E,
        archive: &Archive,
    ) -> Result<Arc<dyn ApiBoundary>> {
        match element.archive_name() {
            Some(name) if name == archive.name() => self.resolve_archive_boundary(archive),
            Some(name) => Err(BoundaryError::invalid_argument(format!(
                "Element {} belongs to '{}', not to '{}'.",
                element.canonical_name(),
                name,
                archive.name()
            ))),
            None => Err(BoundaryError::invalid_argument(format!(
                "Element {} does not belong to an archive.",
                element.canonical_name()
            ))),
        }
    }

    pub fn resolve_archive_boundary(&self, archive: &Archive) -> Result<Arc<dyn ApiBoundary>> {
        archive.ensure_named()?;

        let boundary: Arc<dyn ApiBoundary> = match self.mode {
            ModuleSystemMode::PlatformOnly => Arc::new(self.platform_boundary(archive)?),
            ModuleSystemMode::ProprietaryOnly => Arc::new(self.proprietary_boundary(archive)?),
            ModuleSystemMode::Mixed => self.resolve_mixed(archive)?,
        };

        tracing::debug!(
            archive = %archive.name(),
            mode = %self.mode,
            kind = %boundary.kind(),
            empty = boundary.is_empty(),
            "Resolved API boundary"
        );
        Ok(Arc::new(CachedApiBoundary::new(boundary)))
    }

    fn resolve_mixed(&self, archive: &Archive) -> Result<Arc<dyn ApiBoundary>> {
        let platform = self.platform_boundary(archive)?;
        if !platform.is_automatic() {
            return Ok(Arc::new(platform));
        }

        let proprietary = self.proprietary_boundary(archive)?;
        if proprietary.is_empty() {
            return Ok(Arc::new(platform));
        }

        tracing::debug!(
            archive = %archive.name(),
            module = platform.module_name().unwrap_or_default(),
            "Automatic module, using the proprietary descriptor instead"
        );
        Ok(Arc::new(proprietary))
    }

    fn unsupported(&self, requested: &'static str) -> BoundaryError {
        BoundaryError::UnsupportedMode {
            mode: self.mode.to_string(),
            requested,
        }
    }
}
