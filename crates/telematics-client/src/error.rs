//! Error types for command request construction

use thiserror::Error;

use crate::generation::ProtocolGeneration;

/// Result type alias for command request construction
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while building command requests
#[derive(Error, Debug)]
pub enum ClientError {
    /// Endpoint could not be formed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// API root cannot carry a path (e.g. `mailto:` style URLs)
    #[error("API root cannot be used as a base: {0}")]
    InvalidApiRoot(String),

    /// Static descriptor has no payload for the active generation.
    /// This is a catalog authoring bug, not a runtime data issue.
    #[error("Invalid descriptor '{segment}': no {generation} payload")]
    InvalidDescriptor {
        segment: String,
        generation: ProtocolGeneration,
    },

    /// Command name not in the catalog
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Charge limit outside 50..=100 or not a multiple of 10
    #[error("Invalid charge limit {0}: must be 50-100 in steps of 10")]
    InvalidChargeLimit(u8),

    /// Catalog file could not be parsed
    #[error("Failed to parse catalog: {0}")]
    CatalogParse(String),
}
