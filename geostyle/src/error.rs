//! Error types used by the crate.

use thiserror::Error;

/// Geostyle error type.
#[derive(Debug, Error)]
pub enum GeostyleError {
    /// The map item kind cannot be represented as a style layer. Items of this kind are skipped.
    #[error("unsupported item type: {0}")]
    UnsupportedItemKind(&'static str),
    /// A map parameter misses a required property or has a property of a wrong type.
    #[error("invalid map parameter: {0}")]
    InvalidParameter(String),
    /// Layer type name is not one of the types known to the renderer.
    #[error("unknown layer type: {0}")]
    UnknownLayerType(String),
    /// Failed to read configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
