//! Platform module descriptor read from `module-info.class` or the manifest

use std::collections::BTreeSet;
use std::fmt;

use regex::Regex;

use super::classfile::{parse_module_info, ModuleAttribute, ACC_OPEN};
use super::jar::JarReader;
use crate::config::{ConfigError, ConfigResult};
use crate::errors::{BoundaryError, Result};
use crate::shared::models::Archive;

pub const MODULE_INFO: &str = "module-info.class";
const VERSIONS_PREFIX: &str = "META-INF/versions/";
const AUTOMATIC_MODULE_NAME: &str = "Automatic-Module-Name";

/// Compiled target-module exclusion patterns, full-match
#[derive(Debug, Clone, Default)]
pub struct ExcludedTargetPatterns {
    patterns: Vec<Regex>,
}

impl ExcludedTargetPatterns {
    pub fn from_patterns(patterns: &[String]) -> ConfigResult<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| {
                    ConfigError::InvalidPattern {
                        pattern: pattern.clone(),
                        source,
                    }
                })
            })
            .collect::<ConfigResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches(&self, target: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(target))
    }

    /// A directive is dropped only when it is directed and every target is excluded
    pub fn excludes(&self, directive: &ExportDirective) -> bool {
        !directive.targets.is_empty() && directive.targets.iter().all(|t| self.matches(t))
    }
}

/// `exports <package> [to <targets>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDirective {
    pub package: String,
    pub targets: BTreeSet<String>,
}

impl ExportDirective {
    pub fn is_qualified(&self) -> bool {
        !self.targets.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformModuleDescriptor {
    pub name: String,
    pub is_automatic: bool,
    pub is_open: bool,
    /// Every directive as declared
    pub exports: Vec<ExportDirective>,
    /// Packages that survive target exclusion
    pub exported_packages: BTreeSet<String>,
}

impl PlatformModuleDescriptor {
    /// Automatic module: no directives, every package visible to the platform
    pub fn automatic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_automatic: true,
            is_open: false,
            exports: Vec::new(),
            exported_packages: BTreeSet::new(),
        }
    }

    pub fn from_module_attribute(module: ModuleAttribute, excluded: &ExcludedTargetPatterns) -> Self {
        let ModuleAttribute { name, flags, exports } = module;
        let exports: Vec<ExportDirective> = exports
            .into_iter()
            .map(|export| ExportDirective {
                package: export.package,
                targets: export.targets.into_iter().collect(),
            })
            .collect();

        let exported_packages = exports
            .iter()
            .filter(|directive| {
                let dropped = excluded.excludes(directive);
                if dropped {
                    tracing::debug!(
                        module = %name,
                        package = %directive.package,
                        targets = ?directive.targets,
                        "Export excluded, every target matches an excluded pattern"
                    );
                }
                !dropped
            })
            .map(|directive| directive.package.clone())
            .collect();

        Self {
            name,
            is_automatic: false,
            is_open: flags & ACC_OPEN != 0,
            exports,
            exported_packages,
        }
    }

    pub fn is_exported(&self, package: &str) -> bool {
        self.is_automatic || self.exported_packages.contains(package)
    }
}

impl fmt::Display for PlatformModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_automatic {
            return write!(f, "Automatic module: {}", self.name);
        }
        write!(
            f,
            "{}Module: {}. Exported packages: {:?}",
            if self.is_open { "Open " } else { "" },
            self.name,
            self.exported_packages
        )
    }
}

/// Module name the platform derives for a plain jar.
///
/// `foo-bar-1.2.3.jar` becomes `foo.bar`.
pub fn automatic_module_name(file_name: &str) -> String {
    let stem = file_name.strip_suffix(".jar").unwrap_or(file_name);
    let bytes = stem.as_bytes();
    let version_start = (0..bytes.len().saturating_sub(1))
        .find(|&i| bytes[i] == b'-' && bytes[i + 1].is_ascii_digit())
        .unwrap_or(stem.len());

    let mut name = String::with_capacity(version_start);
    for c in stem[..version_start].chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c);
        } else if !name.is_empty() && !name.ends_with('.') {
            name.push('.');
        }
    }
    name.trim_end_matches('.').to_string()
}

/// Read the platform module of an archive.
///
/// `Ok(None)` for a plain jar with neither `module-info.class` nor an
/// `Automatic-Module-Name` manifest attribute.
///
/// # Errors
///
/// - `ArchiveRead` when the jar cannot be opened or read
/// - `MalformedDescriptor` when a `module-info.class` cannot be parsed
/// - `AmbiguousModule` when the candidates name different modules
pub fn read_platform_module(
    archive: &Archive,
    excluded: &ExcludedTargetPatterns,
) -> Result<Option<PlatformModuleDescriptor>> {
    archive.ensure_named()?;
    let mut jar = JarReader::open(archive)?;

    let mut candidates: Vec<(u32, String)> = jar
        .entry_names()
        .into_iter()
        .filter_map(|entry| module_info_release(&entry).map(|release| (release, entry)))
        .collect();

    if candidates.is_empty() {
        return match jar.manifest_attribute(AUTOMATIC_MODULE_NAME)? {
            Some(name) if !name.is_empty() => {
                tracing::debug!(archive = %archive.name(), module = %name, "Automatic module from manifest");
                Ok(Some(PlatformModuleDescriptor::automatic(name)))
            }
            _ => {
                tracing::debug!(archive = %archive.name(), "No platform module found");
                Ok(None)
            }
        };
    }

    candidates.sort_by_key(|(release, _)| *release);
    let mut modules = Vec::with_capacity(candidates.len());
    for (_, entry) in &candidates {
        let bytes = jar.read_entry(entry)?.unwrap_or_default();
        let module = parse_module_info(&bytes).map_err(|e| {
            tracing::error!(archive = %archive.name(), entry = %entry, error = %e, "Failed to parse module descriptor");
            BoundaryError::malformed_descriptor(archive.name(), entry.as_str(), e)
        })?;
        modules.push(module);
    }

    let names: BTreeSet<&str> = modules.iter().map(|m| m.name.as_str()).collect();
    if names.len() > 1 {
        return Err(BoundaryError::AmbiguousModule {
            archive: archive.name().to_string(),
            modules: names.into_iter().map(str::to_string).collect(),
        });
    }

    // candidates are sorted by release, the last one wins
    let Some(module) = modules.pop() else {
        return Ok(None);
    };
    Ok(Some(PlatformModuleDescriptor::from_module_attribute(module, excluded)))
}

/// Release of a `module-info.class` entry; the root entry is release 0
fn module_info_release(entry: &str) -> Option<u32> {
    if entry == MODULE_INFO {
        return Some(0);
    }
    let rest = entry.strip_prefix(VERSIONS_PREFIX)?;
    let (release, file) = rest.split_once('/')?;
    if file != MODULE_INFO {
        return None;
    }
    release.parse().ok()
}
