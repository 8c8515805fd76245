//! Boundary resolution configuration
//!
//! YAML schema v1:
//!
//! ```yaml
//! version: 1
//! module_system_mode: mixed
//! excluded_platform_export_targets:
//!   - "org\\.mule\\.test\\..*"
//! verbose_logging: false
//! proprietary_descriptor:
//!   path: META-INF/mule-module.properties
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};

/// Supported YAML schema versions
pub const SUPPORTED_VERSIONS: &[u64] = &[1];

pub const DEFAULT_DESCRIPTOR_PATH: &str = "META-INF/mule-module.properties";
pub const DEFAULT_MODULE_NAME_KEY: &str = "module.name";
pub const DEFAULT_STANDARD_PACKAGES_KEY: &str = "artifact.export.classPackages";
pub const DEFAULT_PRIVILEGED_PACKAGES_KEY: &str = "artifact.privileged.classPackages";

/// Which module system(s) decide the API boundary of an archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleSystemMode {
    /// Platform module first, proprietary descriptor when the module is automatic
    #[default]
    Mixed,
    PlatformOnly,
    ProprietaryOnly,
}

impl ModuleSystemMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleSystemMode::Mixed => "mixed",
            ModuleSystemMode::PlatformOnly => "platform_only",
            ModuleSystemMode::ProprietaryOnly => "proprietary_only",
        }
    }
}

impl fmt::Display for ModuleSystemMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleSystemMode {
    type Err = ConfigError;

    /// Accepts `MIXED`, `platform-only`, `Proprietary_Only`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "mixed" => Ok(ModuleSystemMode::Mixed),
            "platform_only" => Ok(ModuleSystemMode::PlatformOnly),
            "proprietary_only" => Ok(ModuleSystemMode::ProprietaryOnly),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

/// Location and keys of the properties-based module descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProprietaryDescriptorConfig {
    /// Entry name inside the archive
    pub path: String,
    pub module_name_key: String,
    pub standard_packages_key: String,
    pub privileged_packages_key: String,
}

impl Default for ProprietaryDescriptorConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_DESCRIPTOR_PATH.to_string(),
            module_name_key: DEFAULT_MODULE_NAME_KEY.to_string(),
            standard_packages_key: DEFAULT_STANDARD_PACKAGES_KEY.to_string(),
            privileged_packages_key: DEFAULT_PRIVILEGED_PACKAGES_KEY.to_string(),
        }
    }
}

/// Top-level configuration consumed by the policy and the element filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiBoundaryConfig {
    pub module_system_mode: ModuleSystemMode,

    /// Regexes matched (whole string) against directed export target modules
    pub excluded_platform_export_targets: Vec<String>,

    pub verbose_logging: bool,

    pub proprietary_descriptor: ProprietaryDescriptorConfig,
}

impl ApiBoundaryConfig {
    pub fn new(mode: ModuleSystemMode) -> Self {
        Self {
            module_system_mode: mode,
            ..Self::default()
        }
    }

    pub fn with_excluded_target(mut self, pattern: impl Into<String>) -> Self {
        self.excluded_platform_export_targets.push(pattern.into());
        self
    }

    pub fn with_verbose_logging(mut self, verbose: bool) -> Self {
        self.verbose_logging = verbose;
        self
    }

    pub fn with_proprietary_descriptor(mut self, descriptor: ProprietaryDescriptorConfig) -> Self {
        self.proprietary_descriptor = descriptor;
        self
    }

    /// Load a versioned YAML configuration file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Parse a versioned YAML document
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let mut document: serde_yaml::Value = serde_yaml::from_str(content)?;

        let version = match document.as_mapping_mut().and_then(|m| m.remove("version")) {
            Some(value) => value.as_u64().ok_or(ConfigError::MissingVersion)?,
            None => return Err(ConfigError::MissingVersion),
        };
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let config: ApiBoundaryConfig = serde_yaml::from_value(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize as a versioned YAML document
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let mut document = serde_yaml::to_value(self)?;
        if let Some(mapping) = document.as_mapping_mut() {
            mapping.insert("version".into(), SUPPORTED_VERSIONS[0].into());
        }
        Ok(serde_yaml::to_string(&document)?)
    }

    /// Check patterns compile and descriptor fields are usable
    pub fn validate(&self) -> ConfigResult<()> {
        for pattern in &self.excluded_platform_export_targets {
            regex::Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
        }

        let descriptor = &self.proprietary_descriptor;
        let required = [
            ("proprietary_descriptor.path", &descriptor.path),
            ("proprietary_descriptor.module_name_key", &descriptor.module_name_key),
            (
                "proprietary_descriptor.standard_packages_key",
                &descriptor.standard_packages_key,
            ),
            (
                "proprietary_descriptor.privileged_packages_key",
                &descriptor.privileged_packages_key,
            ),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::empty_field(
                    field,
                    "Remove the field to fall back to the default.",
                ));
            }
        }

        Ok(())
    }
}
