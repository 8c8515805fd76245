//! Configuration layer
//!
//! A single [`ApiBoundaryConfig`] is threaded explicitly through the policy and
//! the element filter. There is no global or environment lookup.
//!
//! # Examples
//!
//! ```rust
//! use api_boundary::config::{ApiBoundaryConfig, ModuleSystemMode};
//!
//! // In code
//! let config = ApiBoundaryConfig::new(ModuleSystemMode::Mixed)
//!     .with_excluded_target("org\\.mule\\.test\\..*");
//! assert!(config.validate().is_ok());
//!
//! // From YAML
//! let config = ApiBoundaryConfig::from_yaml_str("version: 1\nverbose_logging: true\n").unwrap();
//! assert!(config.verbose_logging);
//! ```

pub mod boundary_config;
pub mod error;

pub use boundary_config::{
    ApiBoundaryConfig, ModuleSystemMode, ProprietaryDescriptorConfig, DEFAULT_DESCRIPTOR_PATH,
};
pub use error::{ConfigError, ConfigResult};
