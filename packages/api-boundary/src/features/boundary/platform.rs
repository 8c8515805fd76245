//! Boundary from the platform module system

use std::fmt;

use super::ports::{ApiBoundary, BoundaryKind};
use crate::errors::Result;
use crate::features::module_descriptor::{
    automatic_module_name, read_platform_module, ExcludedTargetPatterns, PlatformModuleDescriptor,
};
use crate::shared::models::{Archive, DeclaredType};

#[derive(Debug, Clone)]
pub struct PlatformApiBoundary {
    archive: String,
    descriptor: PlatformModuleDescriptor,
}

impl PlatformApiBoundary {
    /// Build from the archive's module metadata.
    ///
    /// A jar without any metadata is an automatic module named after its file,
    /// which is how the platform itself would load it.
    pub fn from_archive(archive: &Archive, excluded: &ExcludedTargetPatterns) -> Result<Self> {
        let descriptor = match read_platform_module(archive, excluded)? {
            Some(descriptor) => descriptor,
            None => {
                let name = automatic_module_name(archive.file_name());
                tracing::debug!(archive = %archive.name(), module = %name, "Treating plain jar as automatic module");
                PlatformModuleDescriptor::automatic(name)
            }
        };
        Ok(Self::from_descriptor(archive.name(), descriptor))
    }

    pub fn from_descriptor(archive: impl Into<String>, descriptor: PlatformModuleDescriptor) -> Self {
        Self {
            archive: archive.into(),
            descriptor,
        }
    }

    pub fn descriptor(&self) -> &PlatformModuleDescriptor {
        &self.descriptor
    }

    pub fn is_automatic(&self) -> bool {
        self.descriptor.is_automatic
    }

    pub fn is_open(&self) -> bool {
        self.descriptor.is_open
    }
}

impl ApiBoundary for PlatformApiBoundary {
    fn is_api(&self, declared_type: &DeclaredType) -> bool {
        self.descriptor.is_exported(declared_type.package_name())
    }

    fn is_empty(&self) -> bool {
        self.descriptor.exported_packages.is_empty()
    }

    fn kind(&self) -> BoundaryKind {
        BoundaryKind::Platform
    }

    fn archive_name(&self) -> &str {
        &self.archive
    }

    fn module_name(&self) -> Option<&str> {
        Some(&self.descriptor.name)
    }
}

impl fmt::Display for PlatformApiBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descriptor.is_automatic {
            return write!(
                f,
                "Java Module System API. Module: {}. Exported packages: ALL (automatic module)",
                self.descriptor.name
            );
        }
        write!(
            f,
            "Java Module System API. Module: {}{}. Exported packages: {:?}",
            self.descriptor.name,
            if self.descriptor.is_open { " (open)" } else { "" },
            self.descriptor.exported_packages
        )
    }
}
