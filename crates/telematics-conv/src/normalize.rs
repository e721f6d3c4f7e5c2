//! Telemetry normalization
//!
//! Maps a raw status document into a [`VehicleStatus`]. Normalization is
//! total: a missing path, a `null`, a wrong type or a malformed date leaves
//! the corresponding field unknown and never fails the call.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use telematics_core::{extract, ChargingState, DistanceUnit, VehicleStatus};
use tracing::{debug, instrument, trace};

use crate::layout::{unwrap_envelope, Corners, FieldLayout, Path, TelemetryShape};

/// Summary text used when nothing is open
pub const ALL_CLOSED: &str = "Closed";

/// Prefix of the tire pressure warning text
pub const TIRE_PRESSURE_PREFIX: &str = "Low tire pressure: ";

/// Token the backend sends in place of a cabin temperature when HVAC is off
pub const CLIMATE_OFF_TOKEN: &str = "OFF";

/// Backend timestamp format (UTC)
pub const DATE_FORMAT: &str = "%Y%m%d%H%M%S";

const DATE_LEN: usize = 14;

/// Converts backend status documents into [`VehicleStatus`] records.
///
/// The shape is detected per document unless pinned with
/// [`TelemetryNormalizer::with_shape`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TelemetryNormalizer {
    shape: Option<TelemetryShape>,
}

impl TelemetryNormalizer {
    /// Create a normalizer that detects the document shape
    pub fn new() -> Self {
        Self::default()
    }

    /// Always read documents as `shape`
    pub fn with_shape(shape: TelemetryShape) -> Self {
        Self { shape: Some(shape) }
    }

    /// Normalize one status document
    #[instrument(skip(self, tree))]
    pub fn normalize(&self, vin: &str, tree: &Value) -> VehicleStatus {
        let root = unwrap_envelope(tree);
        let shape = self.shape.unwrap_or_else(|| TelemetryShape::detect(root));
        debug!(?shape, "Normalizing telemetry");
        normalize_with_layout(vin, root, shape.layout())
    }
}

/// Normalize a status document, detecting its shape
pub fn normalize(vin: &str, tree: &Value) -> VehicleStatus {
    TelemetryNormalizer::new().normalize(vin, tree)
}

/// Normalize an unwrapped document against an explicit layout
pub fn normalize_with_layout(vin: &str, root: &Value, layout: &FieldLayout) -> VehicleStatus {
    let mut status = VehicleStatus::new();
    if !vin.trim().is_empty() {
        status.vin = Some(vin.to_string());
    }

    apply_energy(&mut status, root, layout);
    apply_security(&mut status, root, layout);
    apply_climate(&mut status, root, layout);
    apply_charging(&mut status, root, layout);
    apply_diagnostics(&mut status, root, layout);
    apply_location(&mut status, root, layout);

    status.last_updated = extract::<String>(root, layout.date).and_then(|s| parse_timestamp(&s));
    if status.last_updated.is_none() {
        trace!("No usable status timestamp");
    }

    status
}

/// Parse a `yyyyMMddHHmmss` UTC timestamp.
///
/// Only the first 14 characters are read, so trailing milliseconds are
/// tolerated. Shorter or malformed strings yield `None`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let head = raw.get(..DATE_LEN)?;
    NaiveDateTime::parse_from_str(head, DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

fn unit(root: &Value, path: Path) -> Option<DistanceUnit> {
    extract::<i64>(root, path).and_then(DistanceUnit::from_code)
}

fn apply_energy(status: &mut VehicleStatus, root: &Value, layout: &FieldLayout) {
    status.battery_level = extract(root, layout.battery_level);

    status.range = extract(root, layout.total_range);
    status.ev_mode_range = status.range;
    status.range_unit = unit(root, layout.total_range_unit);
    status.ev_mode_range_unit = status.range_unit;

    // The target-SoC EV range wins over the combined figure whenever it is
    // reported. The combined value is not restored afterwards.
    if let Some(ev_range) = extract::<f64>(root, layout.target_soc_range) {
        trace!(ev_range, "Using target state-of-charge range");
        let ev_unit = unit(root, layout.target_soc_range_unit);
        status.range = Some(ev_range);
        status.ev_mode_range = Some(ev_range);
        status.range_unit = ev_unit;
        status.ev_mode_range_unit = ev_unit;
    }

    status.gas_mode_range = extract(root, layout.gas_mode_range);
    status.gas_mode_range_unit = unit(root, layout.gas_mode_range_unit);
    status.odometer = extract(root, layout.odometer);
    status.odometer_unit = unit(root, layout.odometer_unit);
    status.fuel_level = extract(root, layout.fuel_level);
    status.auxiliary_battery_level = extract(root, layout.auxiliary_battery_level);
}

/// Labels of every corner that reports `true`, in display order
fn flagged(root: &Value, corners: &Corners) -> Vec<&'static str> {
    corners
        .labelled()
        .into_iter()
        .filter(|(_, path)| extract::<bool>(root, path) == Some(true))
        .map(|(label, _)| label)
        .collect()
}

fn summarize(open: Vec<&'static str>) -> String {
    if open.is_empty() {
        ALL_CLOSED.to_string()
    } else {
        open.join(", ")
    }
}

fn apply_security(status: &mut VehicleStatus, root: &Value, layout: &FieldLayout) {
    // All four flags must be present; one unknown door makes the aggregate unknown
    let locks: Option<Vec<bool>> = layout
        .door_locks
        .labelled()
        .iter()
        .map(|(_, path)| extract::<bool>(root, path))
        .collect();
    status.doors_locked = locks.map(|flags| flags.iter().all(|locked| *locked));

    status.trunk_open = extract(root, layout.trunk_open);
    status.hood_open = extract(root, layout.hood_open);

    let mut doors = flagged(root, &layout.doors_open);
    if status.trunk_open == Some(true) {
        doors.push("Trunk");
    }
    if status.hood_open == Some(true) {
        doors.push("Hood");
    }
    status.door_status_summary = Some(summarize(doors));

    let mut windows = flagged(root, &layout.windows_open);
    if extract::<bool>(root, layout.sunroof_open) == Some(true) {
        windows.push("Sunroof");
    }
    status.window_status_summary = Some(summarize(windows));
}

fn apply_climate(status: &mut VehicleStatus, root: &Value, layout: &FieldLayout) {
    status.climate_on = if extract::<f64>(root, layout.cabin_temperature).is_some() {
        Some(true)
    } else if extract::<String>(root, layout.cabin_temperature).as_deref() == Some(CLIMATE_OFF_TOKEN) {
        Some(false)
    } else {
        None
    };
    status.acc = extract(root, layout.acc);
}

fn apply_charging(status: &mut VehicleStatus, root: &Value, layout: &FieldLayout) {
    match extract::<f64>(root, layout.remaining_charge_time) {
        Some(minutes) if minutes > 0.0 => {
            status.charging = Some(true);
            status.charging_state = Some(ChargingState::Charging);
            status.remaining_charge_time_minutes = Some(minutes.round() as i64);
        }
        Some(_) => {
            status.charging = Some(false);
            status.charging_state = Some(ChargingState::Idle);
            status.remaining_charge_time_minutes = Some(0);
        }
        None => {}
    }

    status.connector_fastened = extract(root, layout.connector_fastened);
    status.charge_limit_ac = extract(root, layout.charge_limit_ac);
    status.charge_limit_dc = extract(root, layout.charge_limit_dc);
}

fn apply_diagnostics(status: &mut VehicleStatus, root: &Value, layout: &FieldLayout) {
    let low = flagged(root, &layout.tire_pressure_low);
    if !low.is_empty() {
        status.minor_warnings = Some(format!("{}{}", TIRE_PRESSURE_PREFIX, low.join(", ")));
    }
    status.battery_warning = extract(root, layout.battery_warning);
    status.low_fuel_light = extract(root, layout.low_fuel_light);
}

fn apply_location(status: &mut VehicleStatus, root: &Value, layout: &FieldLayout) {
    // A zero coordinate means "no fix". This drops genuine readings on the
    // equator or prime meridian.
    if let (Some(lat), Some(lon)) = (
        extract::<f64>(root, layout.latitude),
        extract::<f64>(root, layout.longitude),
    ) {
        if lat != 0.0 && lon != 0.0 {
            status.latitude = Some(lat);
            status.longitude = Some(lon);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn legacy(status: Value) -> Value {
        json!({ "vehicleStatus": status })
    }

    #[test]
    fn empty_document_only_has_summaries() {
        let status = normalize("", &json!({}));
        assert_eq!(
            status,
            VehicleStatus {
                door_status_summary: Some(ALL_CLOSED.to_string()),
                window_status_summary: Some(ALL_CLOSED.to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn vin_is_copied_when_present() {
        assert_eq!(normalize("KMHXX00XXXX000000", &json!({})).vin.as_deref(), Some("KMHXX00XXXX000000"));
        assert_eq!(normalize("   ", &json!({})).vin, None);
    }

    #[test]
    fn doors_locked_requires_all_four_flags() {
        let all = legacy(json!({"doorLockState": {
            "frontLeft": true, "frontRight": true, "backLeft": true, "backRight": true
        }}));
        assert_eq!(normalize("", &all).doors_locked, Some(true));

        let one_open = legacy(json!({"doorLockState": {
            "frontLeft": true, "frontRight": false, "backLeft": true, "backRight": true
        }}));
        assert_eq!(normalize("", &one_open).doors_locked, Some(false));

        let one_missing = legacy(json!({"doorLockState": {
            "frontLeft": true, "frontRight": true, "backLeft": true
        }}));
        assert_eq!(normalize("", &one_missing).doors_locked, None);
    }

    #[test]
    fn open_summaries_follow_fixed_order() {
        let doc = legacy(json!({
            "doorOpen": {"frontLeft": 0, "frontRight": 1, "backLeft": 0, "backRight": 1},
            "windowOpen": {"frontLeft": 1, "frontRight": 0, "backLeft": 0, "backRight": 0},
            "trunkOpen": true,
            "hoodOpen": false,
            "sunroofOpen": true
        }));
        let status = normalize("", &doc);
        assert_eq!(status.door_status_summary.as_deref(), Some("Front Right, Rear Right, Trunk"));
        assert_eq!(status.window_status_summary.as_deref(), Some("Front Left, Sunroof"));
        assert_eq!(status.trunk_open, Some(true));
        assert_eq!(status.hood_open, Some(false));
    }

    #[test]
    fn climate_on_when_temperature_is_numeric() {
        let doc = legacy(json!({"airTemp": {"value": 21.5}}));
        assert_eq!(normalize("", &doc).climate_on, Some(true));
    }

    #[test]
    fn climate_off_only_for_off_token() {
        let off = legacy(json!({"airTemp": {"value": "OFF"}}));
        assert_eq!(normalize("", &off).climate_on, Some(false));

        let other = legacy(json!({"airTemp": {"value": "LO"}}));
        assert_eq!(normalize("", &other).climate_on, None);

        let missing = legacy(json!({"airTemp": {}}));
        assert_eq!(normalize("", &missing).climate_on, None);
    }

    #[test]
    fn positive_remaining_time_means_charging() {
        let doc = legacy(json!({"evStatus": {"remainTime2": {"atc": {"value": 45}}}}));
        let status = normalize("", &doc);
        assert_eq!(status.charging, Some(true));
        assert_eq!(status.charging_state, Some(ChargingState::Charging));
        assert_eq!(status.remaining_charge_time_minutes, Some(45));
    }

    #[test]
    fn non_positive_remaining_time_means_idle() {
        for minutes in [json!(0), json!(-5)] {
            let doc = legacy(json!({"evStatus": {"remainTime2": {"atc": {"value": minutes}}}}));
            let status = normalize("", &doc);
            assert_eq!(status.charging, Some(false));
            assert_eq!(status.charging_state, Some(ChargingState::Idle));
            assert_eq!(status.remaining_charge_time_minutes, Some(0));
        }
    }

    #[test]
    fn absent_remaining_time_leaves_charging_unknown() {
        let doc = legacy(json!({"evStatus": {"batteryPlugin": 0}}));
        let status = normalize("", &doc);
        assert_eq!(status.charging, None);
        assert_eq!(status.charging_state, None);
        assert_eq!(status.remaining_charge_time_minutes, None);
        assert_eq!(status.connector_fastened, Some(false));
    }

    #[test]
    fn tire_warnings_only_when_low() {
        let low = legacy(json!({"tirePressureLamp": {
            "tirePressureLampFL": 1, "tirePressureLampFR": 0,
            "tirePressureLampRL": 0, "tirePressureLampRR": 1
        }}));
        assert_eq!(
            normalize("", &low).minor_warnings.as_deref(),
            Some("Low tire pressure: Front Left, Rear Right")
        );

        let fine = legacy(json!({"tirePressureLamp": {
            "tirePressureLampFL": 0, "tirePressureLampFR": 0,
            "tirePressureLampRL": 0, "tirePressureLampRR": 0
        }}));
        assert_eq!(normalize("", &fine).minor_warnings, None);
    }

    #[test]
    fn zero_coordinate_is_no_fix() {
        let doc = json!({"vehicleLocation": {"coord": {"lat": 0.0, "lon": 12.3}}});
        let status = normalize("", &doc);
        assert_eq!(status.latitude, None);
        assert_eq!(status.longitude, None);

        let doc = json!({"vehicleLocation": {"coord": {"lat": 48.1, "lon": 11.5}}});
        let status = normalize("", &doc);
        assert_eq!(status.latitude, Some(48.1));
        assert_eq!(status.longitude, Some(11.5));
    }

    #[test]
    fn single_coordinate_is_no_fix() {
        let doc = json!({"vehicleLocation": {"coord": {"lat": 48.1}}});
        assert_eq!(normalize("", &doc).latitude, None);
    }

    #[test]
    fn timestamp_parsing() {
        assert_eq!(
            parse_timestamp("20240915140000"),
            Some(Utc.with_ymd_and_hms(2024, 9, 15, 14, 0, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("20240915140000123"),
            Some(Utc.with_ymd_and_hms(2024, 9, 15, 14, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("2024091514"), None);
        assert_eq!(parse_timestamp("2024-09-15T14:00"), None);
        assert_eq!(parse_timestamp("20241315140000"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn short_date_leaves_last_updated_absent() {
        let doc = legacy(json!({"time": "2024091514"}));
        assert_eq!(normalize("", &doc).last_updated, None);
    }

    #[test]
    fn target_soc_range_overrides_total_range() {
        let doc = legacy(json!({"evStatus": {
            "drvDistance": {"rangeByFuel": {"totalAvailableRange": {"value": 300, "unit": 1}}},
            "reservChargeInfos": {"targetSOC": {"dte": {"rangeByFuel": {
                "evModeRange": {"value": 250, "unit": 3}
            }}}}
        }}));
        let status = normalize("", &doc);
        assert_eq!(status.range, Some(250.0));
        assert_eq!(status.ev_mode_range, Some(250.0));
        assert_eq!(status.range_unit, Some(DistanceUnit::Miles));
        assert_eq!(status.ev_mode_range_unit, Some(DistanceUnit::Miles));
    }

    #[test]
    fn total_range_used_without_target_soc_range() {
        let doc = legacy(json!({"evStatus": {
            "drvDistance": {"rangeByFuel": {"totalAvailableRange": {"value": 300, "unit": 1}}}
        }}));
        let status = normalize("", &doc);
        assert_eq!(status.range, Some(300.0));
        assert_eq!(status.ev_mode_range, Some(300.0));
        assert_eq!(status.range_unit, Some(DistanceUnit::Km));
    }

    #[test]
    fn pinned_shape_ignores_detection() {
        let doc = json!({"Date": "20240915140000", "vehicleStatus": {}});
        let status = TelemetryNormalizer::with_shape(TelemetryShape::Ccs2).normalize("", &doc);
        assert!(status.last_updated.is_some());
        assert_eq!(normalize("", &doc).last_updated, None);
    }
}
