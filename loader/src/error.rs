//! Error types for blueprint catalog operations.
//!
//! Provides a unified error type covering all failure modes: I/O,
//! serialization, schema compilation, graph assembly, and checksum
//! verification.

use blueprint_schema_core::{GraphError, SchemaError};
use thiserror::Error;

/// Errors that can occur while loading or compiling a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Malformed schema declaration (duplicate fields, bad defaults, ...).
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Graph assembly failure (duplicate modules, unknown references,
    /// cyclic references).
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    /// Bundle hash does not match the bundle contents.
    #[error("bundle hash mismatch: expected {expected}, computed {computed}")]
    ChecksumMismatch {
        /// Hash recorded in the bundle.
        expected: String,
        /// Hash computed from the bundle's modules.
        computed: String,
    },

    /// All configured catalog sources failed.
    #[error("no blueprint sources available")]
    NoSourcesAvailable,
}

/// Convenience alias for results with [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;
