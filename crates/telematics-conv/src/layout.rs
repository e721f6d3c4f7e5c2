//! Field layouts for each backend telemetry shape
//!
//! A layout maps every normalized field to the key path it is read from.
//! The derivation rules in [`crate::normalize`] are written once against
//! [`FieldLayout`], so supporting another backend shape means adding a
//! table, not another normalizer.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use telematics_core::node;

/// Key path from the document root to a value
pub type Path = &'static [&'static str];

/// Four paths addressed by wheel/door position
#[derive(Debug, Clone, Copy)]
pub struct Corners {
    pub front_left: Path,
    pub front_right: Path,
    pub rear_left: Path,
    pub rear_right: Path,
}

impl Corners {
    /// Paths in fixed display order, with their labels
    pub fn labelled(&self) -> [(&'static str, Path); 4] {
        [
            ("Front Left", self.front_left),
            ("Front Right", self.front_right),
            ("Rear Left", self.rear_left),
            ("Rear Right", self.rear_right),
        ]
    }
}

/// Where each normalized field lives in one backend shape
#[derive(Debug, Clone, Copy)]
pub struct FieldLayout {
    // Energy
    pub battery_level: Path,
    /// Combined fuel-system distance to empty
    pub total_range: Path,
    pub total_range_unit: Path,
    /// EV range at the configured target state of charge
    pub target_soc_range: Path,
    pub target_soc_range_unit: Path,
    pub gas_mode_range: Path,
    pub gas_mode_range_unit: Path,
    pub odometer: Path,
    pub odometer_unit: Path,
    pub fuel_level: Path,
    pub auxiliary_battery_level: Path,

    // Security
    pub door_locks: Corners,
    pub doors_open: Corners,
    pub windows_open: Corners,
    pub trunk_open: Path,
    pub hood_open: Path,
    pub sunroof_open: Path,

    // Climate / drivetrain
    pub cabin_temperature: Path,
    pub acc: Path,

    // Charging
    pub remaining_charge_time: Path,
    pub connector_fastened: Path,
    pub charge_limit_ac: Path,
    pub charge_limit_dc: Path,

    // Diagnostics
    pub tire_pressure_low: Corners,
    pub battery_warning: Path,
    pub low_fuel_light: Path,

    // Location / freshness
    pub latitude: Path,
    pub longitude: Path,
    pub date: Path,
}

/// Legacy (V1) status document
pub static LEGACY: FieldLayout = FieldLayout {
    battery_level: &["vehicleStatus", "evStatus", "batteryStatus"],
    total_range: &["vehicleStatus", "evStatus", "drvDistance", "rangeByFuel", "totalAvailableRange", "value"],
    total_range_unit: &["vehicleStatus", "evStatus", "drvDistance", "rangeByFuel", "totalAvailableRange", "unit"],
    target_soc_range: &["vehicleStatus", "evStatus", "reservChargeInfos", "targetSOC", "dte", "rangeByFuel", "evModeRange", "value"],
    target_soc_range_unit: &["vehicleStatus", "evStatus", "reservChargeInfos", "targetSOC", "dte", "rangeByFuel", "evModeRange", "unit"],
    gas_mode_range: &["vehicleStatus", "evStatus", "drvDistance", "rangeByFuel", "gasModeRange", "value"],
    gas_mode_range_unit: &["vehicleStatus", "evStatus", "drvDistance", "rangeByFuel", "gasModeRange", "unit"],
    odometer: &["odometer", "value"],
    odometer_unit: &["odometer", "unit"],
    fuel_level: &["vehicleStatus", "fuelLevel"],
    auxiliary_battery_level: &["vehicleStatus", "battery", "batSoc"],

    door_locks: Corners {
        front_left: &["vehicleStatus", "doorLockState", "frontLeft"],
        front_right: &["vehicleStatus", "doorLockState", "frontRight"],
        rear_left: &["vehicleStatus", "doorLockState", "backLeft"],
        rear_right: &["vehicleStatus", "doorLockState", "backRight"],
    },
    doors_open: Corners {
        front_left: &["vehicleStatus", "doorOpen", "frontLeft"],
        front_right: &["vehicleStatus", "doorOpen", "frontRight"],
        rear_left: &["vehicleStatus", "doorOpen", "backLeft"],
        rear_right: &["vehicleStatus", "doorOpen", "backRight"],
    },
    windows_open: Corners {
        front_left: &["vehicleStatus", "windowOpen", "frontLeft"],
        front_right: &["vehicleStatus", "windowOpen", "frontRight"],
        rear_left: &["vehicleStatus", "windowOpen", "backLeft"],
        rear_right: &["vehicleStatus", "windowOpen", "backRight"],
    },
    trunk_open: &["vehicleStatus", "trunkOpen"],
    hood_open: &["vehicleStatus", "hoodOpen"],
    sunroof_open: &["vehicleStatus", "sunroofOpen"],

    cabin_temperature: &["vehicleStatus", "airTemp", "value"],
    acc: &["vehicleStatus", "acc"],

    remaining_charge_time: &["vehicleStatus", "evStatus", "remainTime2", "atc", "value"],
    connector_fastened: &["vehicleStatus", "evStatus", "batteryPlugin"],
    charge_limit_ac: &["vehicleStatus", "evStatus", "reservChargeInfos", "targetSOC", "standard"],
    charge_limit_dc: &["vehicleStatus", "evStatus", "reservChargeInfos", "targetSOC", "fast"],

    tire_pressure_low: Corners {
        front_left: &["vehicleStatus", "tirePressureLamp", "tirePressureLampFL"],
        front_right: &["vehicleStatus", "tirePressureLamp", "tirePressureLampFR"],
        rear_left: &["vehicleStatus", "tirePressureLamp", "tirePressureLampRL"],
        rear_right: &["vehicleStatus", "tirePressureLamp", "tirePressureLampRR"],
    },
    battery_warning: &["vehicleStatus", "battery", "batState"],
    low_fuel_light: &["vehicleStatus", "lowFuelLight"],

    latitude: &["vehicleLocation", "coord", "lat"],
    longitude: &["vehicleLocation", "coord", "lon"],
    date: &["vehicleStatus", "time"],
};

/// CCS2 capability tree
pub static CCS2: FieldLayout = FieldLayout {
    battery_level: &["Green", "BatteryManagement", "BatteryRemain", "Ratio"],
    total_range: &["Drivetrain", "FuelSystem", "DTE", "Total"],
    total_range_unit: &["Drivetrain", "FuelSystem", "DTE", "Unit"],
    target_soc_range: &["Green", "ChargingInformation", "DTE", "TargetSoC", "Standard"],
    target_soc_range_unit: &["Green", "ChargingInformation", "DTE", "TargetSoC", "Unit"],
    gas_mode_range: &["Drivetrain", "FuelSystem", "DTE", "Gas"],
    gas_mode_range_unit: &["Drivetrain", "FuelSystem", "DTE", "Unit"],
    odometer: &["Drivetrain", "Odometer"],
    odometer_unit: &["Drivetrain", "OdometerUnit"],
    fuel_level: &["Drivetrain", "FuelSystem", "FuelLevel"],
    auxiliary_battery_level: &["Electronics", "Battery", "Level"],

    door_locks: Corners {
        front_left: &["Cabin", "Door", "Row1", "Driver", "Lock"],
        front_right: &["Cabin", "Door", "Row1", "Passenger", "Lock"],
        rear_left: &["Cabin", "Door", "Row2", "Left", "Lock"],
        rear_right: &["Cabin", "Door", "Row2", "Right", "Lock"],
    },
    doors_open: Corners {
        front_left: &["Cabin", "Door", "Row1", "Driver", "Open"],
        front_right: &["Cabin", "Door", "Row1", "Passenger", "Open"],
        rear_left: &["Cabin", "Door", "Row2", "Left", "Open"],
        rear_right: &["Cabin", "Door", "Row2", "Right", "Open"],
    },
    windows_open: Corners {
        front_left: &["Cabin", "Window", "Row1", "Driver", "Open"],
        front_right: &["Cabin", "Window", "Row1", "Passenger", "Open"],
        rear_left: &["Cabin", "Window", "Row2", "Left", "Open"],
        rear_right: &["Cabin", "Window", "Row2", "Right", "Open"],
    },
    trunk_open: &["Body", "Trunk", "Open"],
    hood_open: &["Body", "Hood", "Open"],
    sunroof_open: &["Body", "Sunroof", "Glass", "Open"],

    cabin_temperature: &["Cabin", "HVAC", "Row1", "Driver", "Temperature", "Value"],
    acc: &["Electronics", "PowerSupply", "Accessory"],

    remaining_charge_time: &["Green", "ChargingInformation", "Charging", "RemainTime"],
    connector_fastened: &["Green", "ChargingInformation", "ConnectorFastening", "State"],
    charge_limit_ac: &["Green", "ChargingInformation", "TargetSoC", "Standard"],
    charge_limit_dc: &["Green", "ChargingInformation", "TargetSoC", "Quick"],

    tire_pressure_low: Corners {
        front_left: &["Chassis", "Axle", "Row1", "Left", "Tire", "PressureLow"],
        front_right: &["Chassis", "Axle", "Row1", "Right", "Tire", "PressureLow"],
        rear_left: &["Chassis", "Axle", "Row2", "Left", "Tire", "PressureLow"],
        rear_right: &["Chassis", "Axle", "Row2", "Right", "Tire", "PressureLow"],
    },
    battery_warning: &["Electronics", "Battery", "Auxiliary", "FailWarning"],
    low_fuel_light: &["Drivetrain", "FuelSystem", "LowFuelWarning"],

    latitude: &["Location", "GeoCoord", "Latitude"],
    longitude: &["Location", "GeoCoord", "Longitude"],
    date: &["Date"],
};

/// Which backend shape a document uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryShape {
    /// Flat legacy document rooted at `vehicleStatus`
    Legacy,
    /// Nested CCS2 capability tree
    Ccs2,
}

impl TelemetryShape {
    /// Pick the shape of an already unwrapped document.
    ///
    /// An object at `vehicleStatus` means legacy; anything else is read as CCS2.
    pub fn detect(root: &Value) -> Self {
        if node(root, &["vehicleStatus"]).is_some_and(Value::is_object) {
            Self::Legacy
        } else {
            Self::Ccs2
        }
    }

    /// Path table for this shape
    pub fn layout(&self) -> &'static FieldLayout {
        match self {
            Self::Legacy => &LEGACY,
            Self::Ccs2 => &CCS2,
        }
    }
}

/// Strip the response envelope the backend wraps status documents in.
///
/// Descends into `resMsg`, then into `state.Vehicle` or `vehicleStatusInfo`
/// when present. Documents without an envelope are returned unchanged.
pub fn unwrap_envelope(tree: &Value) -> &Value {
    let root = node(tree, &["resMsg"])
        .filter(|v| v.is_object())
        .unwrap_or(tree);

    [&["state", "Vehicle"][..], &["vehicleStatusInfo"][..]]
        .iter()
        .find_map(|inner| node(root, inner).filter(|v| v.is_object()))
        .unwrap_or(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detects_legacy_documents() {
        let doc = json!({"vehicleStatus": {"doorLock": true}});
        assert_eq!(TelemetryShape::detect(&doc), TelemetryShape::Legacy);
    }

    #[test]
    fn anything_else_is_ccs2() {
        assert_eq!(TelemetryShape::detect(&json!({"Green": {}})), TelemetryShape::Ccs2);
        assert_eq!(TelemetryShape::detect(&json!({})), TelemetryShape::Ccs2);
        assert_eq!(
            TelemetryShape::detect(&json!({"vehicleStatus": "n/a"})),
            TelemetryShape::Ccs2
        );
    }

    #[test]
    fn unwraps_ccs2_envelope() {
        let doc = json!({"resMsg": {"state": {"Vehicle": {"Date": "20240915140000"}}}});
        assert_eq!(unwrap_envelope(&doc), &json!({"Date": "20240915140000"}));
    }

    #[test]
    fn unwraps_legacy_envelope() {
        let doc = json!({"resMsg": {"vehicleStatusInfo": {"vehicleStatus": {}}}});
        assert_eq!(unwrap_envelope(&doc), &json!({"vehicleStatus": {}}));
    }

    #[test]
    fn bare_documents_pass_through() {
        let doc = json!({"vehicleStatus": {}});
        assert_eq!(unwrap_envelope(&doc), &doc);
        let doc = json!({"resMsg": "error"});
        assert_eq!(unwrap_envelope(&doc), &doc);
    }

    #[test]
    fn corners_keep_display_order() {
        let labels: Vec<_> = LEGACY.doors_open.labelled().iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, ["Front Left", "Front Right", "Rear Left", "Rear Right"]);
    }
}
