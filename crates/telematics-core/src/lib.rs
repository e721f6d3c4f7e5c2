//! telematics-core - Core types for telematics telemetry and remote commands
//!
//! This crate provides the pieces shared by the telemetry normalizer and the
//! command request builder: the telemetry tree accessors, the canonical
//! [`VehicleStatus`] record, and the [`CommandDescriptor`] catalog entry.

pub mod error;
pub mod models;
pub mod path;

pub use error::{CoreError, CoreResult};
pub use models::*;
pub use path::{extract, node, parse_telemetry, FromTelemetry};
