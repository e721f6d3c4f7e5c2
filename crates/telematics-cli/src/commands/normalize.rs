//! Normalize command - turn a raw status document into a vehicle snapshot

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use telematics_conv::{TelemetryNormalizer, TelemetryShape, VehicleStatus};
use telematics_core::parse_telemetry;

use crate::output::OutputContext;

/// Normalize the document in `input` (`-` reads stdin) and print the snapshot
pub fn normalize(
    input: &Path,
    vin: &str,
    shape: Option<TelemetryShape>,
    ctx: &OutputContext,
) -> Result<()> {
    let text = read_input(input)?;
    let status = normalize_text(&text, vin, shape)
        .with_context(|| format!("Failed to parse status document: {}", input.display()))?;

    if status.last_updated.is_none() {
        ctx.warn("Status document has no readable timestamp");
    }

    ctx.print_record(&status.present_fields(), &status);
    Ok(())
}

/// Parse and normalize a status document
pub fn normalize_text(
    text: &str,
    vin: &str,
    shape: Option<TelemetryShape>,
) -> telematics_core::CoreResult<VehicleStatus> {
    let tree = parse_telemetry(text)?;
    let normalizer = match shape {
        Some(shape) => TelemetryNormalizer::with_shape(shape),
        None => TelemetryNormalizer::new(),
    };
    Ok(normalizer.normalize(vin, &tree))
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read status document from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read status document: {}", input.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use telematics_core::CoreError;

    #[test]
    fn normalizes_wrapped_legacy_document() {
        let text = r#"{"resMsg": {"vehicleStatusInfo": {
            "vehicleStatus": {"evStatus": {"batteryStatus": 72}, "time": "20240105083000"},
            "odometer": {"value": 1234.5, "unit": 1}
        }}}"#;

        let status = normalize_text(text, "KMH123", None).unwrap();
        assert_eq!(status.vin.as_deref(), Some("KMH123"));
        assert_eq!(status.battery_level, Some(72.0));
        assert_eq!(status.odometer, Some(1234.5));
        assert!(status.last_updated.is_some());
    }

    #[test]
    fn forced_shape_skips_detection() {
        let text = r#"{"vehicleStatus": {"evStatus": {"batteryStatus": 72}}}"#;
        let status = normalize_text(text, "", Some(TelemetryShape::Ccs2)).unwrap();
        assert_eq!(status.battery_level, None);
    }

    #[test]
    fn rejects_non_object_documents() {
        assert!(matches!(
            normalize_text("[1, 2]", "KMH123", None),
            Err(CoreError::NotAnObject(_))
        ));
        assert!(matches!(
            normalize_text("{not json", "KMH123", None),
            Err(CoreError::Json(_))
        ));
    }
}
