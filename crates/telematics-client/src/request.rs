//! Command request construction
//!
//! Turns a [`CommandDescriptor`] plus the target vehicle's context into the
//! URI, body and auth requirement a transport needs, for either protocol
//! generation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use telematics_core::{CommandDescriptor, DoorAction, Payload, StaticCommand};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::endpoints::{EndpointBuilder, StandardEndpoints};
use crate::error::{ClientError, Result};
use crate::generation::ProtocolGeneration;

/// Path namespace of CCS2 resources
pub const CCS2_NAMESPACE: &str = "ccs2/";

/// Path reported for door commands in diagnostics
pub const REMOTE_DOOR_PATH: &str = "ccs2/control/door";

/// Prefix for bare modern action names
const CONTROL_PREFIX: &str = "control/";

/// Per-call target of a command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandContext {
    /// API root; also decides the protocol generation
    pub api_root: String,
    pub vehicle_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    /// Whether the vehicle (not the endpoint) supports CCS2
    #[serde(default)]
    pub ccs2_supported: bool,
}

impl CommandContext {
    /// Create a context for a non-CCS2 vehicle without a device id
    pub fn new(api_root: impl Into<String>, vehicle_id: impl Into<String>) -> Self {
        Self {
            api_root: api_root.into(),
            vehicle_id: vehicle_id.into(),
            device_id: None,
            ccs2_supported: false,
        }
    }

    /// Set the device id
    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Set the vehicle's CCS2 capability
    pub fn with_ccs2(mut self, supported: bool) -> Self {
        self.ccs2_supported = supported;
        self
    }

    /// Device id, if set and not blank
    fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref().filter(|id| !id.trim().is_empty())
    }
}

/// Everything a transport needs to send one command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    pub uri: Url,
    pub payload: Payload,
    /// Whether the CCS2 capability token must accompany the request
    pub requires_auth_token: bool,
}

/// Builds [`CommandRequest`]s against a set of endpoints
#[derive(Debug, Clone, Default)]
pub struct CommandRequestBuilder<E = StandardEndpoints> {
    endpoints: E,
}

impl CommandRequestBuilder<StandardEndpoints> {
    /// Builder using [`StandardEndpoints`]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: EndpointBuilder> CommandRequestBuilder<E> {
    /// Builder using custom endpoints
    pub fn with_endpoints(endpoints: E) -> Self {
        Self { endpoints }
    }

    /// The endpoint builder in use
    pub fn endpoints(&self) -> &E {
        &self.endpoints
    }

    /// Build a request, detecting the generation from the API root
    pub fn build(
        &self,
        descriptor: &CommandDescriptor,
        ctx: &CommandContext,
    ) -> Result<CommandRequest> {
        let generation = ProtocolGeneration::detect(&ctx.api_root);
        self.build_for_generation(descriptor, generation, ctx)
    }

    /// Build a request for an explicitly chosen generation
    #[instrument(skip(self, descriptor, ctx), fields(vehicle_id = %ctx.vehicle_id))]
    pub fn build_for_generation(
        &self,
        descriptor: &CommandDescriptor,
        generation: ProtocolGeneration,
        ctx: &CommandContext,
    ) -> Result<CommandRequest> {
        let segment = diagnostic_segment(descriptor, ctx.ccs2_supported);
        debug!(%generation, segment = %segment, ccs2 = ctx.ccs2_supported, "Building command request");

        let request = match descriptor {
            CommandDescriptor::RemoteDoor { action } => CommandRequest {
                uri: self.endpoints.remote_door_endpoint(
                    &ctx.api_root,
                    &ctx.vehicle_id,
                    generation,
                )?,
                payload: door_payload(*action, generation, ctx),
                requires_auth_token: generation.is_modern(),
            },
            CommandDescriptor::Static(command) => {
                let payload = static_payload(command, generation, ctx.ccs2_supported)?;
                match generation {
                    ProtocolGeneration::Legacy => CommandRequest {
                        uri: self.endpoints.control_endpoint(
                            &ctx.api_root,
                            &ctx.vehicle_id,
                            &command.legacy_segment,
                        )?,
                        payload,
                        requires_auth_token: false,
                    },
                    ProtocolGeneration::Modern => {
                        let suffix = command.modern_path();
                        let path = resolve_modern_path(suffix, ctx.ccs2_supported);
                        CommandRequest {
                            uri: self.endpoints.vehicle_endpoint(
                                &ctx.api_root,
                                &ctx.vehicle_id,
                                &path,
                            )?,
                            payload,
                            requires_auth_token: ctx.ccs2_supported
                                || suffix.starts_with(CCS2_NAMESPACE),
                        }
                    }
                }
            }
        };

        debug!(
            uri = %request.uri,
            requires_auth_token = request.requires_auth_token,
            "Built command request"
        );
        Ok(request)
    }
}

/// Build a request with [`StandardEndpoints`]
pub fn build_request(
    descriptor: &CommandDescriptor,
    api_root: &str,
    vehicle_id: &str,
    device_id: Option<&str>,
    ccs2_supported: bool,
) -> Result<CommandRequest> {
    let ctx = CommandContext {
        api_root: api_root.to_string(),
        vehicle_id: vehicle_id.to_string(),
        device_id: device_id.map(str::to_string),
        ccs2_supported,
    };
    CommandRequestBuilder::new().build(descriptor, &ctx)
}

/// Resolve a modern path suffix.
///
/// Bare action names go under `control/`; CCS2-capable vehicles get the
/// `ccs2/` namespace. Both rules apply together.
///
/// ```
/// # use telematics_client::resolve_modern_path;
/// assert_eq!(resolve_modern_path("lock", true), "ccs2/control/lock");
/// assert_eq!(resolve_modern_path("lock", false), "control/lock");
/// assert_eq!(resolve_modern_path("climate/start", true), "ccs2/climate/start");
/// assert_eq!(resolve_modern_path("ccs2/climate/start", true), "ccs2/climate/start");
/// ```
pub fn resolve_modern_path(suffix: &str, ccs2_supported: bool) -> String {
    let path = if suffix.contains('/') {
        suffix.to_string()
    } else {
        format!("{CONTROL_PREFIX}{suffix}")
    };
    with_ccs2_namespace(path, ccs2_supported)
}

fn with_ccs2_namespace(path: String, ccs2_supported: bool) -> String {
    if ccs2_supported && !path.starts_with(CCS2_NAMESPACE) {
        format!("{CCS2_NAMESPACE}{path}")
    } else {
        path
    }
}

/// Path reported for a command in logs.
///
/// Door commands always report [`REMOTE_DOOR_PATH`]. Static commands report
/// the modern suffix (or the legacy segment) with the `ccs2/` namespace
/// applied for CCS2-capable vehicles.
pub fn diagnostic_segment(descriptor: &CommandDescriptor, ccs2_supported: bool) -> String {
    match descriptor {
        CommandDescriptor::RemoteDoor { .. } => REMOTE_DOOR_PATH.to_string(),
        CommandDescriptor::Static(command) => {
            with_ccs2_namespace(command.modern_path().to_string(), ccs2_supported)
        }
    }
}

fn door_payload(action: DoorAction, generation: ProtocolGeneration, ctx: &CommandContext) -> Payload {
    let token = Value::String(action.token().to_string());
    let mut payload = Payload::new();
    match generation {
        ProtocolGeneration::Legacy => {
            payload.insert("action".to_string(), token);
            if let Some(device_id) = ctx.device_id() {
                payload.insert("deviceId".to_string(), Value::String(device_id.to_string()));
            }
        }
        ProtocolGeneration::Modern => {
            // Non-CCS2 vehicles on the modern API still read `action`
            if !ctx.ccs2_supported {
                payload.insert("action".to_string(), token.clone());
            }
            payload.insert("command".to_string(), token);
        }
    }
    payload
}

/// Copy the template for `generation`, adding `action` where needed.
///
/// The descriptor's template is never modified; catalogs reuse it.
fn static_payload(
    command: &StaticCommand,
    generation: ProtocolGeneration,
    ccs2_supported: bool,
) -> Result<Payload> {
    let template = match generation {
        ProtocolGeneration::Legacy => command.legacy_payload.as_ref(),
        ProtocolGeneration::Modern => command.modern_payload.as_ref(),
    }
    .ok_or_else(|| {
        warn!(segment = %command.legacy_segment, %generation, "Descriptor has no payload");
        ClientError::InvalidDescriptor {
            segment: command.legacy_segment.clone(),
            generation,
        }
    })?;

    let mut payload = template.clone();
    if generation.is_modern() && !ccs2_supported && !payload.contains_key("action") {
        if let Some(command) = payload.get("command").cloned() {
            payload.insert("action".to_string(), command);
        }
    }
    Ok(payload)
}
