//! Command implementations for telematics-cli

pub mod list;
pub mod normalize;
pub mod request;

pub use list::list;
pub use normalize::normalize;
pub use request::request;

use std::path::Path;

use anyhow::{Context, Result};
use telematics_client::CommandCatalog;

/// Standard catalog, with entries from `path` merged over it.
///
/// Files ending in `.json` are read as JSON, everything else as TOML.
pub fn load_catalog(path: Option<&Path>) -> Result<CommandCatalog> {
    let mut catalog = CommandCatalog::standard();
    let Some(path) = path else {
        return Ok(catalog);
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    let extra = if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
        CommandCatalog::from_json(&text)
    } else {
        CommandCatalog::from_toml(&text)
    }
    .with_context(|| format!("Failed to parse catalog file: {}", path.display()))?;

    tracing::debug!(path = %path.display(), commands = extra.len(), "Loaded catalog file");
    catalog.extend(extra);
    Ok(catalog)
}
