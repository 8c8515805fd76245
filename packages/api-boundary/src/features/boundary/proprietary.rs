//! Boundary from the properties-based module descriptor

use std::fmt;

use super::ports::{ApiBoundary, BoundaryKind};
use crate::config::ProprietaryDescriptorConfig;
use crate::errors::Result;
use crate::features::module_descriptor::{read_proprietary_module, ProprietaryModuleDescriptor};
use crate::shared::models::{Archive, DeclaredType};

/// Standard and privileged packages both count as API
#[derive(Debug, Clone)]
pub struct ProprietaryApiBoundary {
    archive: String,
    descriptor: ProprietaryModuleDescriptor,
}

impl ProprietaryApiBoundary {
    /// Missing descriptor file yields an empty boundary
    pub fn from_archive(archive: &Archive, keys: &ProprietaryDescriptorConfig) -> Result<Self> {
        let descriptor = read_proprietary_module(archive, keys)?.unwrap_or_default();
        Ok(Self::from_descriptor(archive.name(), descriptor))
    }

    pub fn from_descriptor(archive: impl Into<String>, descriptor: ProprietaryModuleDescriptor) -> Self {
        Self {
            archive: archive.into(),
            descriptor,
        }
    }

    pub fn descriptor(&self) -> &ProprietaryModuleDescriptor {
        &self.descriptor
    }
}

impl ApiBoundary for ProprietaryApiBoundary {
    fn is_api(&self, declared_type: &DeclaredType) -> bool {
        self.descriptor.is_exported(declared_type.package_name())
    }

    fn is_empty(&self) -> bool {
        self.descriptor.is_empty()
    }

    fn kind(&self) -> BoundaryKind {
        BoundaryKind::Proprietary
    }

    fn archive_name(&self) -> &str {
        &self.archive
    }

    fn module_name(&self) -> Option<&str> {
        self.descriptor.module_name.as_deref()
    }
}

impl fmt::Display for ProprietaryApiBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mule Runtime Module System API. {}", self.descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::JarBuilder;

    #[test]
    fn test_standard_and_privileged_are_api() {
        let archive = JarBuilder::new()
            .mule_module(
                "module.name=mule-core\n\
                 artifact.export.classPackages=org.foo\n\
                 artifact.privileged.classPackages=org.priv\n",
            )
            .to_archive("core.jar")
            .unwrap();
        let boundary = ProprietaryApiBoundary::from_archive(&archive, &Default::default()).unwrap();

        assert!(boundary.is_api(&DeclaredType::new("core.jar", "org.foo.A")));
        assert!(boundary.is_api(&DeclaredType::new("core.jar", "org.priv.B")));
        assert!(!boundary.is_api(&DeclaredType::new("core.jar", "org.internal.C")));
        assert!(!boundary.is_empty());
        assert_eq!(boundary.module_name(), Some("mule-core"));
        assert_eq!(boundary.kind(), BoundaryKind::Proprietary);
    }

    #[test]
    fn test_missing_descriptor_is_empty() {
        let archive = JarBuilder::new().class("org.foo.A").to_archive("plain.jar").unwrap();
        let boundary = ProprietaryApiBoundary::from_archive(&archive, &Default::default()).unwrap();

        assert!(boundary.is_empty());
        assert_eq!(boundary.module_name(), None);
        assert!(!boundary.is_api(&DeclaredType::new("plain.jar", "org.foo.A")));
    }

    #[test]
    fn test_description() {
        let descriptor = ProprietaryModuleDescriptor {
            module_name: Some("m".to_string()),
            standard_packages: ["org.a".to_string()].into_iter().collect(),
            privileged_packages: Default::default(),
        };
        let boundary = ProprietaryApiBoundary::from_descriptor("m.jar", descriptor);
        assert_eq!(
            boundary.to_string(),
            "Mule Runtime Module System API. Module: m. Standard packages: {\"org.a\"}. Privileged packages: {}"
        );
    }
}
