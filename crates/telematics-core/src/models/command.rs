//! Remote command descriptors

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON object sent as a command body
pub type Payload = Map<String, Value>;

/// Door command action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorAction {
    Lock,
    Unlock,
}

impl DoorAction {
    /// Token the backend expects in the `action` / `command` field
    pub fn token(&self) -> &'static str {
        match self {
            Self::Lock => "close",
            Self::Unlock => "open",
        }
    }
}

impl std::fmt::Display for DoorAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// A command addressed by fixed paths with a fixed body per protocol generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticCommand {
    /// Flat control segment used by the legacy API (e.g. "temperature")
    pub legacy_segment: String,
    /// Path suffix used by the modern API (e.g. "climate/start" or "lock").
    /// Falls back to `legacy_segment` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ccs2_suffix: Option<String>,
    /// Body for the legacy API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_payload: Option<Payload>,
    /// Body for the modern API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modern_payload: Option<Payload>,
}

impl StaticCommand {
    /// Create a command with only a legacy segment
    pub fn new(legacy_segment: impl Into<String>) -> Self {
        Self {
            legacy_segment: legacy_segment.into(),
            ccs2_suffix: None,
            legacy_payload: None,
            modern_payload: None,
        }
    }

    /// Set the modern path suffix
    pub fn with_ccs2_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.ccs2_suffix = Some(suffix.into());
        self
    }

    /// Set the legacy body
    pub fn with_legacy_payload(mut self, payload: Payload) -> Self {
        self.legacy_payload = Some(payload);
        self
    }

    /// Set the modern body
    pub fn with_modern_payload(mut self, payload: Payload) -> Self {
        self.modern_payload = Some(payload);
        self
    }

    /// Use the same body for both generations
    pub fn with_payload(self, payload: Payload) -> Self {
        self.with_legacy_payload(payload.clone())
            .with_modern_payload(payload)
    }

    /// Path used against the modern API before namespace prefixing
    pub fn modern_path(&self) -> &str {
        self.ccs2_suffix.as_deref().unwrap_or(&self.legacy_segment)
    }
}

/// One logical remote command.
///
/// Door lock/unlock has a structurally different body from every other
/// command, so it is its own variant rather than a flag on [`StaticCommand`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandDescriptor {
    /// Fixed paths and fixed bodies
    Static(StaticCommand),
    /// Door lock/unlock through the dedicated door endpoint
    RemoteDoor {
        /// Requested action
        action: DoorAction,
    },
}

impl CommandDescriptor {
    /// Shorthand for a door command
    pub fn remote_door(action: DoorAction) -> Self {
        Self::RemoteDoor { action }
    }

    /// Whether this is a door command
    pub fn is_remote_door(&self) -> bool {
        matches!(self, Self::RemoteDoor { .. })
    }
}

impl From<StaticCommand> for CommandDescriptor {
    fn from(command: StaticCommand) -> Self {
        Self::Static(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn modern_path_falls_back_to_legacy_segment() {
        let cmd = StaticCommand::new("horn");
        assert_eq!(cmd.modern_path(), "horn");
        let cmd = cmd.with_ccs2_suffix("control/hornlight");
        assert_eq!(cmd.modern_path(), "control/hornlight");
    }

    #[test]
    fn descriptor_is_internally_tagged() {
        let door: CommandDescriptor = serde_json::from_value(json!({
            "kind": "remote_door",
            "action": "unlock"
        }))
        .unwrap();
        assert_eq!(door, CommandDescriptor::remote_door(DoorAction::Unlock));

        let climate: CommandDescriptor = serde_json::from_value(json!({
            "kind": "static",
            "legacy_segment": "temperature",
            "ccs2_suffix": "climate/start",
            "modern_payload": {"command": "start"}
        }))
        .unwrap();
        let CommandDescriptor::Static(cmd) = climate else {
            panic!("expected static descriptor");
        };
        assert_eq!(cmd.ccs2_suffix.as_deref(), Some("climate/start"));
        assert!(cmd.legacy_payload.is_none());
    }

    #[test]
    fn door_tokens() {
        assert_eq!(DoorAction::Lock.token(), "close");
        assert_eq!(DoorAction::Unlock.token(), "open");
    }
}
