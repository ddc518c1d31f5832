//! Error types for catalog, asset and generation operations.
//!
//! Backends and filesystem plumbing report failures with `anyhow` context;
//! everything that crosses the public API is converted into [`Error`] so the
//! HTTP layer can map each kind onto a status code.

use std::path::PathBuf;

/// Result type for notecraft operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the catalog, asset store and generation gateway.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A required field is missing, empty or out of range.
    #[error("{0}")]
    Validation(String),

    /// A referenced image, folder or asset does not exist.
    #[error("{0}")]
    NotFound(String),

    /// An asset path tried to leave the asset root.
    #[error("path escapes asset root: {path:?}")]
    PathTraversal { path: PathBuf },

    /// The image model answered but returned no usable image.
    #[error("generation failed: {0}")]
    Generation(String),

    /// The image model could not be reached or answered with an error status.
    #[error("{0}")]
    Upstream(String),

    /// The image model did not answer within the configured timeout.
    #[error("image generation timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The persistence layer failed (disk full, permission denied, corrupt file).
    #[error("storage unavailable: {context}")]
    StorageUnavailable {
        context: String,
        #[source]
        source: anyhow::Error,
    },

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a path traversal error.
    pub fn path_traversal(path: impl Into<PathBuf>) -> Self {
        Self::PathTraversal { path: path.into() }
    }

    /// Create a generation error.
    pub fn generation(reason: impl Into<String>) -> Self {
        Self::Generation(reason.into())
    }

    /// Create an upstream (transport) error.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    /// Wrap a persistence failure with context.
    pub fn storage(context: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::StorageUnavailable {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Returns true for errors caused by the caller's input.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::NotFound(_) | Self::PathTraversal { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_keeps_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::storage("Failed to save catalog", io);
        assert_eq!(err.to_string(), "storage unavailable: Failed to save catalog");
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("denied"));
    }

    #[test]
    fn test_client_error_classification() {
        assert!(Error::validation("name required").is_client_error());
        assert!(Error::not_found("missing").is_client_error());
        assert!(Error::path_traversal("../x").is_client_error());
        assert!(!Error::generation("no image").is_client_error());
        assert!(!Error::Timeout { timeout_secs: 5 }.is_client_error());
    }
}
