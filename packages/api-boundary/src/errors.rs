//! Error types for api-boundary
//!
//! Every error is fatal for the enclosing comparison run. The two expected
//! absences (no platform module, no proprietary descriptor) are modelled as
//! `Option::None`, never as errors.

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for boundary resolution
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// A required input is missing (empty archive name, element without owner, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The archive describes more than one platform module
    #[error("Archive '{archive}' describes more than one module: {}", modules.join(", "))]
    AmbiguousModule {
        archive: String,
        modules: Vec<String>,
    },

    /// The archive could not be opened or read
    #[error("Failed to read archive '{archive}': {source}")]
    ArchiveRead {
        archive: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The configured module system mode cannot serve the request
    #[error("Module system mode '{mode}' does not support {requested} boundaries")]
    UnsupportedMode {
        mode: String,
        requested: &'static str,
    },

    /// No enclosing declared type exists for an element
    #[error("Not found: {0}")]
    NotFound(String),

    /// A module descriptor exists but cannot be parsed
    #[error("Malformed module descriptor in '{archive}' ({entry}): {source}")]
    MalformedDescriptor {
        archive: String,
        entry: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Metrics registration failed
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl BoundaryError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        BoundaryError::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        BoundaryError::NotFound(msg.into())
    }

    /// Wrap an I/O or zip failure for the given archive
    pub fn archive_read(
        archive: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        BoundaryError::ArchiveRead {
            archive: archive.into(),
            source: Box::new(source),
        }
    }

    /// Wrap a class-file or properties parse failure
    pub fn malformed_descriptor(
        archive: impl Into<String>,
        entry: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        BoundaryError::MalformedDescriptor {
            archive: archive.into(),
            entry: entry.into(),
            source: Box::new(source),
        }
    }

    /// Stable category name, mainly for logs and CLI output
    pub fn kind(&self) -> &'static str {
        match self {
            BoundaryError::InvalidArgument(_) => "invalid_argument",
            BoundaryError::AmbiguousModule { .. } => "ambiguous_module",
            BoundaryError::ArchiveRead { .. } => "archive_read",
            BoundaryError::UnsupportedMode { .. } => "unsupported_mode",
            BoundaryError::NotFound(_) => "not_found",
            BoundaryError::MalformedDescriptor { .. } => "malformed_descriptor",
            BoundaryError::Config(_) => "config",
            BoundaryError::Metrics(_) => "metrics",
        }
    }
}

/// Result type alias for boundary operations
pub type Result<T> = std::result::Result<T, BoundaryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn test_ambiguous_module_display() {
        let err = BoundaryError::AmbiguousModule {
            archive: "lib.jar".to_string(),
            modules: vec!["org.a".to_string(), "org.b".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Archive 'lib.jar' describes more than one module: org.a, org.b"
        );
        assert_eq!(err.kind(), "ambiguous_module");
    }

    #[test]
    fn test_archive_read_keeps_source() {
        let io_err = io::Error::new(io::ErrorKind::UnexpectedEof, "truncated");
        let err = BoundaryError::archive_read("broken.jar", io_err);

        assert!(err.to_string().contains("broken.jar"));
        let source = err.source().unwrap();
        assert!(source.to_string().contains("truncated"));
    }

    #[test]
    fn test_unsupported_mode_display() {
        let err = BoundaryError::UnsupportedMode {
            mode: "platform_only".to_string(),
            requested: "proprietary",
        };
        assert_eq!(
            err.to_string(),
            "Module system mode 'platform_only' does not support proprietary boundaries"
        );
    }

    #[test]
    fn test_result_propagation() {
        fn inner() -> Result<()> {
            Err(BoundaryError::not_found("org.foo.A#field"))
        }

        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }

        let err = outer().unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }
}
