//! telematics-conv - Telemetry normalization
//!
//! Turns the status documents returned by the vehicle backend into one
//! [`VehicleStatus`] record, whichever protocol generation produced them.
//!
//! # Quick Start
//!
//! ```rust
//! use telematics_conv::normalize;
//! use serde_json::json;
//!
//! let doc = json!({
//!     "resMsg": {
//!         "vehicleStatusInfo": {
//!             "vehicleStatus": {
//!                 "evStatus": {"batteryStatus": 81, "remainTime2": {"atc": {"value": 45}}},
//!                 "time": "20240915140000"
//!             }
//!         }
//!     }
//! });
//!
//! let status = normalize("KMHXX00XXXX000000", &doc);
//! assert_eq!(status.battery_level, Some(81.0));
//! assert_eq!(status.charging, Some(true));
//! assert_eq!(status.door_status_summary.as_deref(), Some("Closed"));
//! assert!(status.fuel_level.is_none());
//! ```
//!
//! # Shapes
//!
//! | Shape | Root | Detected by |
//! |-------|------|-------------|
//! | Legacy (V1) | `vehicleStatus`, `vehicleLocation`, `odometer` | object at `vehicleStatus` |
//! | CCS2 | `Green`, `Cabin`, `Body`, `Drivetrain`, ... | anything else |
//!
//! Envelopes (`resMsg`, `resMsg.state.Vehicle`, `resMsg.vehicleStatusInfo`)
//! are stripped before detection.

pub mod layout;
pub mod normalize;

pub use layout::{unwrap_envelope, Corners, FieldLayout, TelemetryShape, CCS2, LEGACY};
pub use normalize::{
    normalize, normalize_with_layout, parse_timestamp, TelemetryNormalizer, ALL_CLOSED,
    TIRE_PRESSURE_PREFIX,
};
pub use telematics_core::VehicleStatus;
