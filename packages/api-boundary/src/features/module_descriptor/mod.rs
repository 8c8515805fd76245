//! Module descriptor reading
//!
//! Two independent descriptor forms can live in a jar:
//! - platform: `module-info.class` (possibly multi-release) or the manifest's
//!   `Automatic-Module-Name`
//! - proprietary: a properties file listing standard and privileged packages
//!
//! Absence of either form is `Ok(None)`; unreadable archives and unparseable
//! descriptors are errors.

pub mod classfile;
pub mod jar;
pub mod platform;
pub mod properties;
pub mod proprietary;

pub use classfile::ClassParseError;
pub use jar::JarReader;
pub use platform::{
    automatic_module_name, read_platform_module, ExcludedTargetPatterns, ExportDirective,
    PlatformModuleDescriptor,
};
pub use properties::{Properties, PropertiesError};
pub use proprietary::{read_proprietary_module, split_package_list, ProprietaryModuleDescriptor};
