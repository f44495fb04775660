//! OSRM HTTP adapter for point-to-point directions.

use serde::Deserialize;

use crate::coordinate::Coordinate;
use crate::error::ProviderError;
use crate::route::{RouteStep, TravelMode};
use crate::traits::{DirectionsProvider, ProviderRoute};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, origin: Coordinate, destination: Coordinate, mode: TravelMode) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=full&geometries=geojson&steps=true",
            self.config.base_url.trim_end_matches('/'),
            mode.profile(),
            origin.lng,
            origin.lat,
            destination.lng,
            destination.lat
        )
    }
}

impl DirectionsProvider for OsrmClient {
    fn directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<ProviderRoute, ProviderError> {
        let url = self.route_url(origin, destination, mode);
        tracing::debug!(%url, "requesting OSRM route");

        let response = self.client.get(&url).send()?;
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            // OSRM reports NoRoute/NoSegment as a 400 with a JSON body.
            return Err(match serde_json::from_str::<OsrmRouteResponse>(&text) {
                Ok(body) => ProviderError::NoRoute {
                    code: body.code,
                    message: body.message.unwrap_or_default(),
                },
                Err(_) => ProviderError::Status {
                    status: status.as_u16(),
                    body: text,
                },
            });
        }

        let body: OsrmRouteResponse = serde_json::from_str(&text)?;
        body.into_provider_route()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    /// `[lng, lat]` pairs.
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    distance: f64,
    duration: f64,
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    distance: f64,
    duration: f64,
    #[serde(default)]
    name: String,
    maneuver: OsrmManeuver,
}

#[derive(Debug, Deserialize)]
struct OsrmManeuver {
    #[serde(rename = "type")]
    kind: String,
    modifier: Option<String>,
    location: Option<[f64; 2]>,
}

impl OsrmRouteResponse {
    /// Keeps the first candidate's first leg.
    pub(crate) fn into_provider_route(self) -> Result<ProviderRoute, ProviderError> {
        if self.code != "Ok" {
            return Err(ProviderError::NoRoute {
                code: self.code,
                message: self.message.unwrap_or_default(),
            });
        }

        let no_route = |message: &str| ProviderError::NoRoute {
            code: "Ok".to_string(),
            message: message.to_string(),
        };

        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| no_route("response contained no routes"))?;
        let leg = route
            .legs
            .into_iter()
            .next()
            .ok_or_else(|| no_route("route has no legs"))?;
        if route.geometry.coordinates.is_empty() {
            return Err(no_route("route has empty geometry"));
        }

        let geometry = route
            .geometry
            .coordinates
            .iter()
            .map(|&[lng, lat]| Coordinate::try_new(lat, lng))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| no_route("route geometry has out-of-range coordinates"))?;

        let steps = leg
            .steps
            .into_iter()
            .map(|step| RouteStep {
                instruction: describe_maneuver(&step.maneuver, &step.name),
                distance_m: step.distance,
                duration_s: step.duration,
                maneuver: step.maneuver.kind,
                location: step
                    .maneuver
                    .location
                    .map(|[lng, lat]| Coordinate::from_lng_lat(lng, lat)),
            })
            .collect();

        Ok(ProviderRoute {
            geometry,
            distance_m: leg.distance,
            duration_s: leg.duration,
            steps,
        })
    }
}

/// OSRM returns maneuver types rather than text, e.g. `turn` + `left`
/// on `Rajpath` becomes "Turn left onto Rajpath".
fn describe_maneuver(maneuver: &OsrmManeuver, road: &str) -> String {
    let verb = match maneuver.kind.as_str() {
        "depart" => "Head out",
        "arrive" => "Arrive at destination",
        "roundabout" | "rotary" => "Take the roundabout",
        "new name" | "continue" => "Continue",
        "merge" => "Merge",
        "fork" => "Keep",
        "end of road" | "turn" | "on ramp" | "off ramp" => "Turn",
        _ => "Continue",
    };

    let mut text = verb.to_string();
    if maneuver.kind != "arrive" {
        if let Some(modifier) = maneuver.modifier.as_deref() {
            text.push(' ');
            text.push_str(modifier);
        }
        if !road.is_empty() {
            text.push_str(" onto ");
            text.push_str(road);
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALK_RESPONSE: &str = r#"{
        "code": "Ok",
        "routes": [{
            "distance": 2300.0,
            "duration": 1680.0,
            "geometry": {
                "type": "LineString",
                "coordinates": [[77.2090, 28.6139], [77.2095, 28.6145], [77.2100, 28.6150]]
            },
            "legs": [{
                "distance": 2300.0,
                "duration": 1680.0,
                "steps": [
                    {"distance": 1200.0, "duration": 860.0, "name": "Janpath",
                     "maneuver": {"type": "depart", "location": [77.2090, 28.6139]}},
                    {"distance": 1100.0, "duration": 820.0, "name": "Rajpath",
                     "maneuver": {"type": "turn", "modifier": "left",
                                  "location": [77.2095, 28.6145]}},
                    {"distance": 0.0, "duration": 0.0, "name": "",
                     "maneuver": {"type": "arrive", "location": [77.2100, 28.6150]}}
                ]
            }]
        }]
    }"#;

    fn parse(body: &str) -> Result<ProviderRoute, ProviderError> {
        serde_json::from_str::<OsrmRouteResponse>(body)
            .map_err(ProviderError::from)
            .and_then(OsrmRouteResponse::into_provider_route)
    }

    #[test]
    fn test_geometry_converted_to_lat_lng() {
        let route = parse(WALK_RESPONSE).unwrap();
        assert_eq!(route.geometry[0], Coordinate::new(28.6139, 77.2090));
        assert_eq!(route.geometry.len(), 3);
        assert_eq!(route.distance_m, 2300.0);
        assert_eq!(route.duration_s, 1680.0);
    }

    #[test]
    fn test_steps_described() {
        let route = parse(WALK_RESPONSE).unwrap();
        let instructions: Vec<_> = route.steps.iter().map(|s| s.instruction.as_str()).collect();
        assert_eq!(
            instructions,
            vec!["Head out onto Janpath", "Turn left onto Rajpath", "Arrive at destination"]
        );
        assert_eq!(route.steps[1].location, Some(Coordinate::new(28.6145, 77.2095)));
    }

    #[test]
    fn test_no_route_code() {
        let err = parse(r#"{"code": "NoRoute", "message": "Impossible route between points"}"#)
            .unwrap_err();
        assert!(matches!(err, ProviderError::NoRoute { ref code, .. } if code == "NoRoute"));
    }

    #[test]
    fn test_empty_routes() {
        let err = parse(r#"{"code": "Ok", "routes": []}"#).unwrap_err();
        assert!(matches!(err, ProviderError::NoRoute { .. }));
    }

    #[test]
    fn test_out_of_range_geometry_rejected() {
        let err = parse(
            r#"{
                "code": "Ok",
                "routes": [{
                    "geometry": {"coordinates": [[77.2090, 28.6139], [1e300, 0.0]]},
                    "legs": [{"distance": 10.0, "duration": 5.0, "steps": []}]
                }]
            }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::NoRoute { ref message, .. } if message.contains("out-of-range")
        ));
    }

    #[test]
    fn test_route_url_uses_lng_lat_order() {
        let client = OsrmClient::new(OsrmConfig {
            base_url: "http://localhost:5000/".to_string(),
            timeout_secs: 1,
        })
        .unwrap();
        let url = client.route_url(
            Coordinate::new(28.6139, 77.2090),
            Coordinate::new(28.6150, 77.2100),
            TravelMode::Cycling,
        );
        assert_eq!(
            url,
            concat!(
                "http://localhost:5000/route/v1/cycling/77.209000,28.613900;77.210000,28.615000",
                "?overview=full&geometries=geojson&steps=true"
            )
        );
    }
}
