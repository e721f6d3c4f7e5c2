//! Commands command - show the command catalog

use anyhow::Result;
use telematics_client::{CommandCatalog, CommandDescriptor, REMOTE_DOOR_PATH};

use crate::output::{CommandRow, OutputContext};

/// List every command in the catalog
pub fn list(catalog: &CommandCatalog, ctx: &OutputContext) -> Result<()> {
    let rows: Vec<CommandRow> = catalog
        .iter()
        .map(|(name, descriptor)| command_row(name, descriptor))
        .collect();

    ctx.print(&rows);
    Ok(())
}

fn command_row(name: &str, descriptor: &CommandDescriptor) -> CommandRow {
    match descriptor {
        CommandDescriptor::RemoteDoor { action } => CommandRow {
            name: name.to_string(),
            kind: format!("door ({action})"),
            legacy_segment: "door".to_string(),
            modern_path: REMOTE_DOOR_PATH.to_string(),
        },
        CommandDescriptor::Static(command) => CommandRow {
            name: name.to_string(),
            kind: "static".to_string(),
            legacy_segment: command.legacy_segment.clone(),
            modern_path: command.modern_path().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use telematics_client::DoorAction;

    #[test]
    fn rows_for_standard_commands() {
        let catalog = CommandCatalog::standard();

        let lock = command_row("lock", catalog.require("lock").unwrap());
        assert_eq!(lock.kind, "door (close)");
        assert_eq!(lock.modern_path, "ccs2/control/door");

        let climate = command_row("start_climate", catalog.require("start_climate").unwrap());
        assert_eq!(climate.legacy_segment, "temperature");
        assert_eq!(climate.modern_path, "climate/start");

        let unlock = command_row("unlock", &CommandDescriptor::remote_door(DoorAction::Unlock));
        assert_eq!(unlock.kind, "door (open)");
    }
}
