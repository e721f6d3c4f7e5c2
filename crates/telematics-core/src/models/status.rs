//! Canonical vehicle status record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Distance unit attached to a range or odometer reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    /// Kilometres (backend code 1)
    Km,
    /// Miles (backend code 3)
    Miles,
}

impl DistanceUnit {
    /// Decode a backend unit code; unknown codes yield `None`
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Km),
            3 => Some(Self::Miles),
            _ => None,
        }
    }

    /// Short display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Km => "km",
            Self::Miles => "mi",
        }
    }
}

impl std::fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Charging session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargingState {
    /// Not charging
    Idle,
    /// Charge in progress
    Charging,
}

impl ChargingState {
    /// Numeric state as reported to host channels
    pub fn code(&self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Charging => 1,
        }
    }
}

impl std::fmt::Display for ChargingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Charging => "charging",
        };
        f.write_str(s)
    }
}

/// Normalized status of one vehicle.
///
/// Every field is independently optional. `None` means "unknown" and must
/// never be read as zero or false by consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleStatus {
    /// Vehicle identification number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,

    // Energy
    /// High-voltage battery state of charge in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<f64>,
    /// Total remaining range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_unit: Option<DistanceUnit>,
    /// Electric-only range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ev_mode_range: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ev_mode_range_unit: Option<DistanceUnit>,
    /// Combustion-only range (hybrids)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_mode_range: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_mode_range_unit: Option<DistanceUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odometer: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odometer_unit: Option<DistanceUnit>,
    /// Fuel tank level in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_level: Option<f64>,
    /// 12V battery state of charge in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auxiliary_battery_level: Option<f64>,

    // Security
    /// True only when all four doors report locked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doors_locked: Option<bool>,
    /// Open doors, trunk and hood as text, or "Closed"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub door_status_summary: Option<String>,
    /// Open windows and sunroof as text, or "Closed"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_status_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trunk_open: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hood_open: Option<bool>,

    // Climate / drivetrain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub climate_on: Option<bool>,
    /// Ignition / accessory ready
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acc: Option<bool>,

    // Charging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charging: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charging_state: Option<ChargingState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_charge_time_minutes: Option<i64>,
    /// Charge cable plugged in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connector_fastened: Option<bool>,
    /// Target state of charge for AC (standard) charging
    #[serde(rename = "chargeLimitAC", skip_serializing_if = "Option::is_none")]
    pub charge_limit_ac: Option<i64>,
    /// Target state of charge for DC (fast) charging
    #[serde(rename = "chargeLimitDC", skip_serializing_if = "Option::is_none")]
    pub charge_limit_dc: Option<i64>,

    // Diagnostics
    /// Low tire pressure warnings, if any wheel is low
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minor_warnings: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_warning: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_fuel_light: Option<bool>,

    // Location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    /// When the backend last refreshed this status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl VehicleStatus {
    /// Create an empty status with every field unknown
    pub fn new() -> Self {
        Self::default()
    }

    /// Render every present field as a `(name, value)` pair, in record order.
    ///
    /// Absent fields are skipped so a host bridge can map each pair to a
    /// channel update without inventing defaults.
    pub fn present_fields(&self) -> Vec<(&'static str, String)> {
        fn push<T: ToString>(out: &mut Vec<(&'static str, String)>, name: &'static str, value: &Option<T>) {
            if let Some(v) = value {
                out.push((name, v.to_string()));
            }
        }

        let mut out = Vec::new();
        push(&mut out, "vin", &self.vin);
        push(&mut out, "batteryLevel", &self.battery_level);
        push(&mut out, "range", &self.range);
        push(&mut out, "rangeUnit", &self.range_unit);
        push(&mut out, "evModeRange", &self.ev_mode_range);
        push(&mut out, "evModeRangeUnit", &self.ev_mode_range_unit);
        push(&mut out, "gasModeRange", &self.gas_mode_range);
        push(&mut out, "gasModeRangeUnit", &self.gas_mode_range_unit);
        push(&mut out, "odometer", &self.odometer);
        push(&mut out, "odometerUnit", &self.odometer_unit);
        push(&mut out, "fuelLevel", &self.fuel_level);
        push(&mut out, "auxiliaryBatteryLevel", &self.auxiliary_battery_level);
        push(&mut out, "doorsLocked", &self.doors_locked);
        push(&mut out, "doorStatusSummary", &self.door_status_summary);
        push(&mut out, "windowStatusSummary", &self.window_status_summary);
        push(&mut out, "trunkOpen", &self.trunk_open);
        push(&mut out, "hoodOpen", &self.hood_open);
        push(&mut out, "climateOn", &self.climate_on);
        push(&mut out, "acc", &self.acc);
        push(&mut out, "charging", &self.charging);
        push(&mut out, "chargingState", &self.charging_state);
        push(&mut out, "remainingChargeTimeMinutes", &self.remaining_charge_time_minutes);
        push(&mut out, "connectorFastened", &self.connector_fastened);
        push(&mut out, "chargeLimitAC", &self.charge_limit_ac);
        push(&mut out, "chargeLimitDC", &self.charge_limit_dc);
        push(&mut out, "minorWarnings", &self.minor_warnings);
        push(&mut out, "batteryWarning", &self.battery_warning);
        push(&mut out, "lowFuelLight", &self.low_fuel_light);
        push(&mut out, "latitude", &self.latitude);
        push(&mut out, "longitude", &self.longitude);
        push(
            &mut out,
            "lastUpdated",
            &self.last_updated.map(|t| t.to_rfc3339()),
        );
        out
    }
}
