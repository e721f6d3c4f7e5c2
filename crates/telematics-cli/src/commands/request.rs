//! Request command - build the HTTP request for a remote command

use anyhow::{bail, Context, Result};
use serde::Serialize;
use telematics_client::{
    diagnostic_segment, ChargeLimits, CommandCatalog, CommandContext, CommandDescriptor,
    CommandRequest, CommandRequestBuilder, ProtocolGeneration,
};
use tracing::debug;

use crate::output::OutputContext;

/// Command whose payload comes from `--ac` / `--dc`
pub const CHARGE_LIMITS_COMMAND: &str = "set_charge_limits";

/// Request plus the routing facts that produced it
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestView {
    pub command: String,
    pub generation: ProtocolGeneration,
    pub segment: String,
    #[serde(flatten)]
    pub request: CommandRequest,
}

/// Options for building a single request
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub generation: Option<ProtocolGeneration>,
    pub ac_limit: Option<u8>,
    pub dc_limit: Option<u8>,
}

/// Build the request for `name` and print it
pub fn request(
    catalog: &CommandCatalog,
    name: &str,
    command_ctx: &CommandContext,
    options: &RequestOptions,
    ctx: &OutputContext,
) -> Result<()> {
    let view = build_view(catalog, name, command_ctx, options)?;

    let detected = ProtocolGeneration::detect(&command_ctx.api_root);
    if view.generation != detected {
        ctx.warn(&format!(
            "Building a {} request against a {} API root",
            view.generation, detected
        ));
    }
    ctx.info(&format!("{} -> {}", view.command, view.segment));

    let payload = serde_json::to_string(&view.request.payload).context("Failed to encode payload")?;
    let pairs = [
        ("URI", view.request.uri.to_string()),
        ("Generation", view.generation.to_string()),
        ("Requires auth token", view.request.requires_auth_token.to_string()),
        ("Payload", payload),
    ];
    ctx.print_record(&pairs, &view);
    Ok(())
}

/// Resolve the descriptor and build the request
pub fn build_view(
    catalog: &CommandCatalog,
    name: &str,
    command_ctx: &CommandContext,
    options: &RequestOptions,
) -> Result<RequestView> {
    let descriptor = resolve_descriptor(catalog, name, options)?;
    let generation = options
        .generation
        .unwrap_or_else(|| ProtocolGeneration::detect(&command_ctx.api_root));
    debug!(command = name, %generation, "Resolved command");

    let request = CommandRequestBuilder::new()
        .build_for_generation(&descriptor, generation, command_ctx)
        .with_context(|| format!("Failed to build request for '{name}'"))?;

    Ok(RequestView {
        command: name.to_ascii_lowercase(),
        generation,
        segment: diagnostic_segment(&descriptor, command_ctx.ccs2_supported),
        request,
    })
}

fn resolve_descriptor(
    catalog: &CommandCatalog,
    name: &str,
    options: &RequestOptions,
) -> Result<CommandDescriptor> {
    let has_limits = options.ac_limit.is_some() || options.dc_limit.is_some();
    if !name.eq_ignore_ascii_case(CHARGE_LIMITS_COMMAND) {
        if has_limits {
            bail!("--ac and --dc only apply to {CHARGE_LIMITS_COMMAND}");
        }
        return Ok(catalog.require(name)?.clone());
    }
    if !has_limits {
        return Ok(catalog.require(name)?.clone());
    }

    let defaults = ChargeLimits::default();
    let limits = ChargeLimits::new(
        options.ac_limit.unwrap_or(defaults.ac),
        options.dc_limit.unwrap_or(defaults.dc),
    )?;
    Ok(limits.descriptor())
}
