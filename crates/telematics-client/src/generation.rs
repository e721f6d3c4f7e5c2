//! Protocol generation detection

use serde::{Deserialize, Serialize};

/// Substring that marks a legacy API root (compared case-insensitively)
pub const LEGACY_MARKER: &str = "/api/v1/";

/// Which API generation an endpoint speaks.
///
/// This is about the endpoint, not the vehicle: a modern endpoint may serve
/// vehicles with or without CCS2 capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolGeneration {
    /// Flat V1 control API
    Legacy,
    /// Nested V2 API
    Modern,
}

impl ProtocolGeneration {
    /// Detect the generation from an API root.
    ///
    /// The only signal is whether the root contains [`LEGACY_MARKER`].
    ///
    /// ```
    /// # use telematics_client::ProtocolGeneration;
    /// assert_eq!(
    ///     ProtocolGeneration::detect("https://api.example.com/API/V1/spa/"),
    ///     ProtocolGeneration::Legacy
    /// );
    /// assert_eq!(
    ///     ProtocolGeneration::detect("https://api.example.com/api/v2/spa/"),
    ///     ProtocolGeneration::Modern
    /// );
    /// ```
    pub fn detect(api_root: &str) -> Self {
        if api_root.to_ascii_lowercase().contains(LEGACY_MARKER) {
            Self::Legacy
        } else {
            Self::Modern
        }
    }

    /// Whether this is the modern generation
    pub fn is_modern(&self) -> bool {
        matches!(self, Self::Modern)
    }
}

impl std::fmt::Display for ProtocolGeneration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Legacy => "legacy",
            Self::Modern => "modern",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_must_be_a_path_fragment() {
        assert_eq!(
            ProtocolGeneration::detect("https://api.example.com/api/v1"),
            ProtocolGeneration::Modern
        );
        assert_eq!(
            ProtocolGeneration::detect("https://api.example.com/api/v10/"),
            ProtocolGeneration::Modern
        );
        assert_eq!(
            ProtocolGeneration::detect("https://api.example.com/api/v1/"),
            ProtocolGeneration::Legacy
        );
    }

    #[test]
    fn display() {
        assert_eq!(ProtocolGeneration::Legacy.to_string(), "legacy");
        assert_eq!(ProtocolGeneration::Modern.to_string(), "modern");
    }
}
