//! Telematics command request construction
//!
//! Builds the `(URI, payload, auth requirement)` triple for a logical
//! command against either API generation. No I/O happens here; hand the
//! [`CommandRequest`] to whatever transport performs the call.
//!
//! # Example
//!
//! ```rust
//! use telematics_client::{CommandCatalog, CommandContext, CommandRequestBuilder};
//!
//! let catalog = CommandCatalog::standard();
//! let ctx = CommandContext::new("https://api.example.com/api/v2/spa/", "veh-1")
//!     .with_ccs2(true);
//!
//! let request = CommandRequestBuilder::new()
//!     .build(catalog.require("start_climate")?, &ctx)?;
//!
//! assert_eq!(
//!     request.uri.as_str(),
//!     "https://api.example.com/api/v2/spa/vehicles/veh-1/ccs2/climate/start"
//! );
//! assert!(request.requires_auth_token);
//! # Ok::<(), telematics_client::ClientError>(())
//! ```
//!
//! # Generations
//!
//! | Generation | Detected by | Static URI | Door URI | Token |
//! |------------|-------------|------------|----------|-------|
//! | Legacy | root contains `/api/v1/` | control segment | door endpoint | never |
//! | Modern | anything else | vehicle resource, `control/` and `ccs2/` prefixed as needed | door endpoint | door, CCS2 vehicle, or `ccs2/` suffix |

mod catalog;
mod endpoints;
mod error;
mod generation;
mod request;

pub use catalog::{ChargeLimits, CommandCatalog};
pub use endpoints::{EndpointBuilder, StandardEndpoints};
pub use error::{ClientError, Result};
pub use generation::{ProtocolGeneration, LEGACY_MARKER};
pub use request::{
    build_request, diagnostic_segment, resolve_modern_path, CommandContext, CommandRequest,
    CommandRequestBuilder, CCS2_NAMESPACE, REMOTE_DOOR_PATH,
};

// Re-export core types for convenience
pub use telematics_core::{CommandDescriptor, DoorAction, Payload, StaticCommand};
