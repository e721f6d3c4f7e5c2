//! Endpoint construction
//!
//! The request builder decides which endpoint family a command goes to;
//! the exact path grammar of each family lives behind [`EndpointBuilder`].

use url::Url;

use crate::error::{ClientError, Result};
use crate::generation::ProtocolGeneration;

/// Builds absolute URIs for the three endpoint families
pub trait EndpointBuilder {
    /// Legacy flat control endpoint for `segment`
    fn control_endpoint(&self, api_root: &str, vehicle_id: &str, segment: &str) -> Result<Url>;

    /// Modern vehicle resource endpoint for an already resolved `path`
    fn vehicle_endpoint(&self, api_root: &str, vehicle_id: &str, path: &str) -> Result<Url>;

    /// Dedicated door lock/unlock endpoint
    fn remote_door_endpoint(
        &self,
        api_root: &str,
        vehicle_id: &str,
        generation: ProtocolGeneration,
    ) -> Result<Url>;
}

/// Default URL layout:
///
/// | Family | Path under the API root |
/// |--------|-------------------------|
/// | control | `vehicles/{id}/control/{segment}` |
/// | vehicle resource | `vehicles/{id}/{path}` |
/// | remote door (legacy) | `vehicles/{id}/control/door` |
/// | remote door (modern) | `vehicles/{id}/ccs2/control/door` |
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEndpoints;

impl StandardEndpoints {
    fn resolve<'a>(
        api_root: &str,
        vehicle_id: &str,
        rest: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url> {
        let mut url = Url::parse(api_root)?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ClientError::InvalidApiRoot(api_root.to_string()))?;
            segments.pop_if_empty();
            segments.push("vehicles");
            segments.push(vehicle_id);
            segments.extend(rest.into_iter().filter(|s| !s.is_empty()));
        }
        Ok(url)
    }
}

impl EndpointBuilder for StandardEndpoints {
    fn control_endpoint(&self, api_root: &str, vehicle_id: &str, segment: &str) -> Result<Url> {
        Self::resolve(
            api_root,
            vehicle_id,
            std::iter::once("control").chain(segment.split('/')),
        )
    }

    fn vehicle_endpoint(&self, api_root: &str, vehicle_id: &str, path: &str) -> Result<Url> {
        Self::resolve(api_root, vehicle_id, path.split('/'))
    }

    fn remote_door_endpoint(
        &self,
        api_root: &str,
        vehicle_id: &str,
        generation: ProtocolGeneration,
    ) -> Result<Url> {
        let rest: &[&str] = match generation {
            ProtocolGeneration::Legacy => &["control", "door"],
            ProtocolGeneration::Modern => &["ccs2", "control", "door"],
        };
        Self::resolve(api_root, vehicle_id, rest.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "https://api.example.com/api/v2/spa/";

    #[test]
    fn control_endpoint() {
        let url = StandardEndpoints
            .control_endpoint("https://api.example.com/api/v1/spa/", "veh-1", "temperature")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/api/v1/spa/vehicles/veh-1/control/temperature"
        );
    }

    #[test]
    fn root_without_trailing_slash() {
        let url = StandardEndpoints
            .vehicle_endpoint("https://api.example.com/api/v2/spa", "veh-1", "ccs2/climate/start")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/api/v2/spa/vehicles/veh-1/ccs2/climate/start"
        );
    }

    #[test]
    fn vehicle_id_is_one_segment() {
        let url = StandardEndpoints
            .vehicle_endpoint(ROOT, "a/b c", "control/lock")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/api/v2/spa/vehicles/a%2Fb%20c/control/lock"
        );
    }

    #[test]
    fn remote_door_per_generation() {
        let modern = StandardEndpoints
            .remote_door_endpoint(ROOT, "veh-1", ProtocolGeneration::Modern)
            .unwrap();
        assert!(modern.path().ends_with("/vehicles/veh-1/ccs2/control/door"));

        let legacy = StandardEndpoints
            .remote_door_endpoint(ROOT, "veh-1", ProtocolGeneration::Legacy)
            .unwrap();
        assert!(legacy.path().ends_with("/vehicles/veh-1/control/door"));
    }

    #[test]
    fn bad_roots_are_rejected() {
        assert!(matches!(
            StandardEndpoints.control_endpoint("not a url", "veh-1", "lock"),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            StandardEndpoints.control_endpoint("mailto:fleet@example.com", "veh-1", "lock"),
            Err(ClientError::InvalidApiRoot(_))
        ));
    }
}
