//! Properties-based module descriptor embedded in the archive

use std::collections::BTreeSet;
use std::fmt;

use super::jar::JarReader;
use super::properties::{Properties, PropertiesError};
use crate::config::ProprietaryDescriptorConfig;
use crate::errors::{BoundaryError, Result};
use crate::shared::models::Archive;

/// Standard and privileged exported packages of a module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProprietaryModuleDescriptor {
    pub module_name: Option<String>,
    pub standard_packages: BTreeSet<String>,
    pub privileged_packages: BTreeSet<String>,
}

impl ProprietaryModuleDescriptor {
    pub fn from_properties(properties: &Properties, keys: &ProprietaryDescriptorConfig) -> Self {
        let packages = |key: &str| properties.get(key).map(split_package_list).unwrap_or_default();

        Self {
            module_name: properties.get(&keys.module_name_key).map(str::to_string),
            standard_packages: packages(&keys.standard_packages_key),
            privileged_packages: packages(&keys.privileged_packages_key),
        }
    }

    pub fn parse(text: &str, keys: &ProprietaryDescriptorConfig) -> std::result::Result<Self, PropertiesError> {
        Ok(Self::from_properties(&Properties::parse(text)?, keys))
    }

    /// Standard and privileged packages count the same for the boundary
    pub fn is_exported(&self, package: &str) -> bool {
        self.standard_packages.contains(package) || self.privileged_packages.contains(package)
    }

    pub fn is_empty(&self) -> bool {
        self.standard_packages.is_empty() && self.privileged_packages.is_empty()
    }
}

impl fmt::Display for ProprietaryModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Module: {}. Standard packages: {:?}. Privileged packages: {:?}",
            self.module_name.as_deref().unwrap_or("<unnamed>"),
            self.standard_packages,
            self.privileged_packages
        )
    }
}

/// Split a comma-separated package list: trim, drop empty entries, deduplicate
pub fn split_package_list(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read the descriptor file from the archive.
///
/// Absence of the file is `Ok(None)`. An unreadable archive or an
/// unparseable file is an error.
pub fn read_proprietary_module(
    archive: &Archive,
    keys: &ProprietaryDescriptorConfig,
) -> Result<Option<ProprietaryModuleDescriptor>> {
    archive.ensure_named()?;
    let mut jar = JarReader::open(archive)?;

    let Some(bytes) = jar.read_entry(&keys.path)? else {
        tracing::debug!(archive = %archive.name(), path = %keys.path, "No proprietary module descriptor found");
        return Ok(None);
    };

    let properties = Properties::parse_latin1(&bytes).map_err(|e| {
        tracing::error!(archive = %archive.name(), error = %e, "Failed to parse module descriptor");
        BoundaryError::malformed_descriptor(archive.name(), keys.path.as_str(), e)
    })?;
    Ok(Some(ProprietaryModuleDescriptor::from_properties(&properties, keys)))
}
