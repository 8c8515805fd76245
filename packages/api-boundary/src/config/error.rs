//! Configuration error types

use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Excluded export target pattern does not compile
    #[error("Invalid excluded target pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Required string field is empty
    #[error("Field '{field}' must not be empty. {hint}")]
    EmptyField { field: String, hint: String },

    /// Unknown module system mode name
    #[error("Unknown module system mode '{0}'. Valid modes: mixed, platform_only, proprietary_only")]
    UnknownMode(String),

    /// Missing version field in YAML
    #[error("Missing 'version' field in configuration file. Add 'version: 1' to the top of your YAML file.")]
    MissingVersion,

    /// Unsupported version
    #[error("Unsupported configuration version {found}. Supported versions: {}", supported.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "))]
    UnsupportedVersion { found: u64, supported: Vec<u64> },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    pub fn empty_field(field: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::EmptyField {
            field: field.into(),
            hint: hint.into(),
        }
    }
}
