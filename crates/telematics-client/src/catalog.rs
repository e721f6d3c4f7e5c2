//! Command catalog
//!
//! A name -> [`CommandDescriptor`] table. The request builder never consults
//! it; callers look a command up and pass the descriptor in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use telematics_core::{CommandDescriptor, DoorAction, Payload, StaticCommand};

use crate::error::{ClientError, Result};

/// Named command descriptors, keyed case-insensitively
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandCatalog {
    #[serde(default)]
    commands: BTreeMap<String, CommandDescriptor>,
}

impl CommandCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in command set
    pub fn standard() -> Self {
        let mut catalog = Self::new();

        catalog.insert("lock", CommandDescriptor::remote_door(DoorAction::Lock));
        catalog.insert("unlock", CommandDescriptor::remote_door(DoorAction::Unlock));

        catalog.insert(
            "start_climate",
            StaticCommand::new("temperature")
                .with_ccs2_suffix("climate/start")
                .with_legacy_payload(payload(json!({
                    "action": "start",
                    "hvacType": 0,
                    "options": {"defrost": false, "heating1": 0},
                    "tempCode": "10H",
                    "unit": "C"
                })))
                .with_modern_payload(payload(json!({
                    "command": "start",
                    "hvacTempType": 1,
                    "temperature": 21,
                    "unit": "C",
                    "windshieldFrontDefogState": false
                })))
                .into(),
        );
        catalog.insert(
            "stop_climate",
            StaticCommand::new("temperature")
                .with_ccs2_suffix("climate/stop")
                .with_legacy_payload(payload(json!({
                    "action": "stop",
                    "hvacType": 0,
                    "options": {"defrost": false, "heating1": 0},
                    "tempCode": "10H",
                    "unit": "C"
                })))
                .with_modern_payload(payload(json!({"command": "stop"})))
                .into(),
        );

        catalog.insert(
            "start_charge",
            StaticCommand::new("charge")
                .with_legacy_payload(payload(json!({"action": "start"})))
                .with_modern_payload(payload(json!({"command": "start"})))
                .into(),
        );
        catalog.insert(
            "stop_charge",
            StaticCommand::new("charge")
                .with_legacy_payload(payload(json!({"action": "stop"})))
                .with_modern_payload(payload(json!({"command": "stop"})))
                .into(),
        );
        catalog.insert("set_charge_limits", ChargeLimits::default().descriptor());

        catalog.insert(
            "horn_lights",
            StaticCommand::new("hornlight")
                .with_legacy_payload(payload(json!({"action": "on"})))
                .with_modern_payload(payload(json!({"command": "on"})))
                .into(),
        );
        catalog.insert(
            "lights",
            StaticCommand::new("light")
                .with_legacy_payload(payload(json!({"action": "on"})))
                .with_modern_payload(payload(json!({"command": "on"})))
                .into(),
        );

        catalog
    }

    /// Parse a catalog from TOML (`[commands.<name>]` tables)
    pub fn from_toml(text: &str) -> Result<Self> {
        let raw: Self = toml::from_str(text).map_err(|e| ClientError::CatalogParse(e.to_string()))?;
        Ok(raw.normalized())
    }

    /// Parse a catalog from JSON (`{"commands": {"<name>": {...}}}`)
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: Self =
            serde_json::from_str(text).map_err(|e| ClientError::CatalogParse(e.to_string()))?;
        Ok(raw.normalized())
    }

    /// Add or replace a command
    pub fn insert(&mut self, name: &str, descriptor: CommandDescriptor) {
        self.commands.insert(name.to_ascii_lowercase(), descriptor);
    }

    /// Look a command up by name
    pub fn get(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.get(&name.to_ascii_lowercase())
    }

    /// Look a command up, failing on unknown names
    pub fn require(&self, name: &str) -> Result<&CommandDescriptor> {
        self.get(name)
            .ok_or_else(|| ClientError::UnknownCommand(name.to_string()))
    }

    /// Commands in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandDescriptor)> {
        self.commands.iter().map(|(name, d)| (name.as_str(), d))
    }

    /// Merge `other` over this catalog
    pub fn extend(&mut self, other: CommandCatalog) {
        for (name, descriptor) in other.commands {
            self.insert(&name, descriptor);
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn normalized(self) -> Self {
        let mut out = Self::new();
        out.extend(self);
        out
    }
}

/// Target state of charge for AC and DC charging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeLimits {
    /// Standard (AC) charging target in percent
    pub ac: u8,
    /// Fast (DC) charging target in percent
    pub dc: u8,
}

impl Default for ChargeLimits {
    fn default() -> Self {
        Self { ac: 100, dc: 80 }
    }
}

impl ChargeLimits {
    /// Validate and create limits. Each must be 50..=100 in steps of 10.
    pub fn new(ac: u8, dc: u8) -> Result<Self> {
        for limit in [ac, dc] {
            if !(50..=100).contains(&limit) || limit % 10 != 0 {
                return Err(ClientError::InvalidChargeLimit(limit));
            }
        }
        Ok(Self { ac, dc })
    }

    /// Backend body: plug type 0 is DC, plug type 1 is AC
    pub fn payload(&self) -> Payload {
        payload(json!({
            "targetSOClist": [
                {"plugType": 0, "targetSOClevel": self.dc},
                {"plugType": 1, "targetSOClevel": self.ac}
            ]
        }))
    }

    /// Descriptor that sets these limits on either generation
    pub fn descriptor(&self) -> CommandDescriptor {
        StaticCommand::new("charge/target")
            .with_payload(self.payload())
            .into()
    }
}

fn payload(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        _ => Payload::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_catalog_contents() {
        let catalog = CommandCatalog::standard();
        let names: Vec<&str> = catalog.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            [
                "horn_lights",
                "lights",
                "lock",
                "set_charge_limits",
                "start_charge",
                "start_climate",
                "stop_charge",
                "stop_climate",
                "unlock",
            ]
        );
        assert!(catalog.get("LOCK").is_some_and(CommandDescriptor::is_remote_door));
    }

    #[test]
    fn every_static_command_has_both_payloads() {
        for (name, descriptor) in CommandCatalog::standard().iter() {
            if let CommandDescriptor::Static(cmd) = descriptor {
                assert!(cmd.legacy_payload.is_some(), "{name} missing legacy payload");
                assert!(cmd.modern_payload.is_some(), "{name} missing modern payload");
            }
        }
    }

    #[test]
    fn unknown_command() {
        assert!(matches!(
            CommandCatalog::standard().require("self_destruct"),
            Err(ClientError::UnknownCommand(name)) if name == "self_destruct"
        ));
    }

    #[test]
    fn catalog_from_toml() {
        let catalog = CommandCatalog::from_toml(
            r#"
[commands.Valet]
kind = "static"
legacy_segment = "valet"
ccs2_suffix = "valet/activate"

[commands.Valet.legacy_payload]
action = "activate"

[commands.Valet.modern_payload]
command = "activate"

[commands.lock]
kind = "remote_door"
action = "lock"
"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        let Some(CommandDescriptor::Static(valet)) = catalog.get("valet") else {
            panic!("valet should be a static command");
        };
        assert_eq!(valet.modern_path(), "valet/activate");
        assert_eq!(
            valet.legacy_payload.as_ref().and_then(|p| p.get("action")),
            Some(&json!("activate"))
        );
    }

    #[test]
    fn catalog_from_json() {
        let catalog = CommandCatalog::from_json(
            r#"{"commands": {"unlock": {"kind": "remote_door", "action": "unlock"}}}"#,
        )
        .unwrap();
        assert_eq!(
            catalog.get("unlock"),
            Some(&CommandDescriptor::remote_door(DoorAction::Unlock))
        );
        assert!(matches!(
            CommandCatalog::from_json(r#"{"commands": {"x": {"kind": "teleport"}}}"#),
            Err(ClientError::CatalogParse(_))
        ));
    }

    #[test]
    fn charge_limit_validation() {
        assert!(ChargeLimits::new(80, 90).is_ok());
        assert!(matches!(ChargeLimits::new(85, 90), Err(ClientError::InvalidChargeLimit(85))));
        assert!(matches!(ChargeLimits::new(80, 40), Err(ClientError::InvalidChargeLimit(40))));
        assert!(matches!(ChargeLimits::new(110, 90), Err(ClientError::InvalidChargeLimit(110))));
    }

    #[test]
    fn charge_limit_payload() {
        let limits = ChargeLimits::new(80, 90).unwrap();
        assert_eq!(
            Value::Object(limits.payload()),
            json!({"targetSOClist": [
                {"plugType": 0, "targetSOClevel": 90},
                {"plugType": 1, "targetSOClevel": 80}
            ]})
        );
    }
}
