//! Error types for PartCatalog.
//!
//! Library crates use [`PartCatalogError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all PartCatalog operations.
#[derive(Debug, thiserror::Error)]
pub enum PartCatalogError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while fetching a catalog page.
    #[error("network error: {0}")]
    Network(String),

    /// A landmark the whole run depends on is missing from the markup.
    #[error("structure not found: {landmark}")]
    StructureNotFound { landmark: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (mismatched CSV headers, non-array JSON, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Serializing records to an output format failed.
    #[error("export error: {0}")]
    Export(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PartCatalogError>;

impl PartCatalogError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Signal that a required landmark could not be located.
    pub fn structure_not_found(landmark: impl Into<String>) -> Self {
        Self::StructureNotFound {
            landmark: landmark.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
