//! Telematics CLI - normalize vehicle status documents and build remote command requests
//!
//! Nothing here talks to a backend: `request` prints the request a transport
//! would send, `normalize` reads a status document captured from one.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use telematics_client::ProtocolGeneration;
use telematics_conv::TelemetryShape;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::commands::request::RequestOptions;
use crate::config::{ArgOverrides, Config};
use crate::output::{OutputContext, OutputFormat};

#[derive(Parser)]
#[command(name = "telematics-cli")]
#[command(author, version, about = "Vehicle telematics status and command tool")]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "TELEMATICS_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a raw status document into a vehicle snapshot
    Normalize {
        /// Status document (JSON), or `-` for stdin
        file: PathBuf,

        /// VIN to stamp on the snapshot
        #[arg(long, default_value = "")]
        vin: String,

        /// Document shape (detected when omitted)
        #[arg(long, value_enum)]
        shape: Option<ShapeArg>,
    },

    /// Build the HTTP request for a remote command
    Request {
        /// Command name from the catalog (see `commands`)
        command: String,

        /// API root; `/api/v1/` selects the legacy API
        #[arg(long, env = "TELEMATICS_API_ROOT")]
        api_root: Option<String>,

        /// Vehicle id
        #[arg(long)]
        vehicle_id: Option<String>,

        /// Device id for legacy door commands
        #[arg(long)]
        device_id: Option<String>,

        /// Vehicle supports CCS2
        #[arg(long)]
        ccs2: bool,

        /// Protocol generation (detected from the API root when omitted)
        #[arg(long, value_enum)]
        generation: Option<GenerationArg>,

        /// AC charge target for set_charge_limits (50-100, steps of 10)
        #[arg(long)]
        ac: Option<u8>,

        /// DC charge target for set_charge_limits (50-100, steps of 10)
        #[arg(long)]
        dc: Option<u8>,

        /// Extra command catalog (TOML or JSON)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// List the command catalog
    Commands {
        /// Extra command catalog (TOML or JSON)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ShapeArg {
    Legacy,
    Ccs2,
}

impl From<ShapeArg> for TelemetryShape {
    fn from(shape: ShapeArg) -> Self {
        match shape {
            ShapeArg::Legacy => TelemetryShape::Legacy,
            ShapeArg::Ccs2 => TelemetryShape::Ccs2,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GenerationArg {
    Legacy,
    Modern,
}

impl From<GenerationArg> for ProtocolGeneration {
    fn from(generation: GenerationArg) -> Self {
        match generation {
            GenerationArg::Legacy => ProtocolGeneration::Legacy,
            GenerationArg::Modern => ProtocolGeneration::Modern,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Load config file
    let config = if let Some(config_path) = &cli.config {
        Config::load_from(config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    let mut overrides = ArgOverrides {
        output: cli.output,
        no_color: cli.no_color,
        ..Default::default()
    };
    match &cli.command {
        Commands::Request {
            api_root,
            vehicle_id,
            device_id,
            ccs2,
            catalog,
            ..
        } => {
            overrides.api_root = api_root.clone();
            overrides.vehicle_id = vehicle_id.clone();
            overrides.device_id = device_id.clone();
            overrides.ccs2 = *ccs2;
            overrides.catalog = catalog.clone();
        }
        Commands::Commands { catalog } => overrides.catalog = catalog.clone(),
        Commands::Normalize { .. } => {}
    }

    // Merge CLI args with config
    let merged = config.merge_with_args(&overrides);

    // Create output context
    let ctx = OutputContext::new(merged.output, merged.no_color, cli.quiet);

    // Execute command
    match &cli.command {
        Commands::Normalize { file, vin, shape } => {
            commands::normalize(file, vin, shape.map(Into::into), &ctx)?;
        }

        Commands::Request {
            command,
            generation,
            ac,
            dc,
            ..
        } => {
            let catalog = commands::load_catalog(merged.catalog.as_deref())?;
            let options = RequestOptions {
                generation: generation.map(Into::into),
                ac_limit: *ac,
                dc_limit: *dc,
            };
            commands::request(&catalog, command, &merged.command_context()?, &options, &ctx)?;
        }

        Commands::Commands { .. } => {
            let catalog = commands::load_catalog(merged.catalog.as_deref())?;
            commands::list(&catalog, &ctx)?;
        }
    }

    Ok(())
}
