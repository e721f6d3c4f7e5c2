//! Configuration file handling for telematics-cli

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use telematics_client::CommandContext;

use crate::output::OutputFormat;

/// Default API root when neither the config file nor the CLI sets one
pub const DEFAULT_API_ROOT: &str = "https://api.example.com/api/v2/spa/";

/// Configuration for the CLI tool
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// API root; contains `/api/v1/` for legacy endpoints
    pub api_root: Option<String>,
    /// Default vehicle id
    pub vehicle_id: Option<String>,
    /// Device id sent with legacy door commands
    pub device_id: Option<String>,
    /// Whether the vehicle supports CCS2
    pub ccs2_supported: Option<bool>,
    /// Extra catalog file (TOML or JSON) merged over the standard catalog
    pub catalog: Option<PathBuf>,
    /// Default output format
    pub output: Option<String>,
    /// Disable colored output
    pub no_color: Option<bool>,
}

impl Config {
    /// Load configuration from the default config file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("telematics-cli");

        Ok(config_dir.join("config.toml"))
    }

    /// Merge CLI arguments over config file values
    pub fn merge_with_args(&self, args: &ArgOverrides) -> MergedConfig {
        MergedConfig {
            api_root: args
                .api_root
                .clone()
                .or_else(|| self.api_root.clone())
                .unwrap_or_else(|| DEFAULT_API_ROOT.to_string()),
            vehicle_id: args.vehicle_id.clone().or_else(|| self.vehicle_id.clone()),
            device_id: args.device_id.clone().or_else(|| self.device_id.clone()),
            ccs2_supported: args.ccs2 || self.ccs2_supported.unwrap_or(false),
            catalog: args.catalog.clone().or_else(|| self.catalog.clone()),
            output: args
                .output
                .or_else(|| self.output.as_deref().and_then(OutputFormat::from_name))
                .unwrap_or_default(),
            no_color: args.no_color || self.no_color.unwrap_or(false),
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ArgOverrides {
    pub api_root: Option<String>,
    pub vehicle_id: Option<String>,
    pub device_id: Option<String>,
    pub ccs2: bool,
    pub catalog: Option<PathBuf>,
    pub output: Option<OutputFormat>,
    pub no_color: bool,
}

/// Fully resolved configuration after merging CLI args
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub api_root: String,
    pub vehicle_id: Option<String>,
    pub device_id: Option<String>,
    pub ccs2_supported: bool,
    pub catalog: Option<PathBuf>,
    pub output: OutputFormat,
    pub no_color: bool,
}

impl MergedConfig {
    /// Command context for the configured vehicle
    pub fn command_context(&self) -> Result<CommandContext> {
        let vehicle_id = self
            .vehicle_id
            .clone()
            .context("No vehicle id: pass --vehicle-id or set vehicle_id in the config file")?;
        Ok(CommandContext {
            api_root: self.api_root.clone(),
            vehicle_id,
            device_id: self.device_id.clone(),
            ccs2_supported: self.ccs2_supported,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn cli_args_override_file() {
        let config = Config {
            api_root: Some("https://file.example.com/api/v1/spa/".to_string()),
            vehicle_id: Some("file-vehicle".to_string()),
            ccs2_supported: Some(false),
            output: Some("json".to_string()),
            ..Default::default()
        };
        let merged = config.merge_with_args(&ArgOverrides {
            vehicle_id: Some("cli-vehicle".to_string()),
            ccs2: true,
            ..Default::default()
        });

        assert_eq!(merged.api_root, "https://file.example.com/api/v1/spa/");
        assert_eq!(merged.vehicle_id.as_deref(), Some("cli-vehicle"));
        assert!(merged.ccs2_supported);
        assert_eq!(merged.output, OutputFormat::Json);
    }

    #[test]
    fn defaults_without_file() {
        let merged = Config::default().merge_with_args(&ArgOverrides::default());
        assert_eq!(merged.api_root, DEFAULT_API_ROOT);
        assert_eq!(merged.output, OutputFormat::Table);
        assert!(merged.command_context().is_err());
    }

    #[test]
    fn load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
api_root = "https://api.example.com/api/v2/spa/"
vehicle_id = "veh-1"
device_id = "dev-1"
ccs2_supported = true
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        let ctx = config
            .merge_with_args(&ArgOverrides::default())
            .command_context()
            .unwrap();
        assert_eq!(
            ctx,
            CommandContext::new("https://api.example.com/api/v2/spa/", "veh-1")
                .with_device_id("dev-1")
                .with_ccs2(true)
        );
    }
}
