//! OpenRouteService HTTP adapter for heavy-vehicle directions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RoutingError;
use crate::models::{AvoidFeature, Coordinate, VehicleConstraints, VehicleType};
use crate::polyline::RoutePolyline;
use crate::traits::{Route, RouteProvider, RouteSummary};

#[derive(Debug, Clone)]
pub struct OrsConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for OrsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openrouteservice.org".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrsClient {
    config: OrsConfig,
    client: reqwest::blocking::Client,
}

impl OrsClient {
    pub fn new(config: OrsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl RouteProvider for OrsClient {
    fn route(
        &self,
        start: Coordinate,
        end: Coordinate,
        vehicle: &VehicleConstraints,
    ) -> Result<Route, RoutingError> {
        let url = format!(
            "{}/v2/directions/{}/geojson",
            self.config.base_url.trim_end_matches('/'),
            vehicle.profile.as_str()
        );

        let response = self
            .client
            .post(url)
            .header(reqwest::header::AUTHORIZATION, &self.config.api_key)
            .json(&DirectionsRequest::new(start, end, vehicle))
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(provider_error(status.as_u16(), &body));
        }

        let route = parse_directions(&body)?;
        debug!(
            points = route.polyline.points().len(),
            distance_m = route.summary.map(|s| s.distance_m),
            "received route"
        );
        Ok(route)
    }
}

#[derive(Debug, Serialize)]
struct DirectionsRequest {
    coordinates: [[f64; 2]; 2],
    options: DirectionsOptions,
}

#[derive(Debug, Serialize)]
struct DirectionsOptions {
    vehicle_type: VehicleType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    avoid_features: Vec<AvoidFeature>,
    profile_params: ProfileParams,
}

#[derive(Debug, Serialize)]
struct ProfileParams {
    restrictions: Restrictions,
}

#[derive(Debug, Serialize)]
struct Restrictions {
    weight: f64,
    height: f64,
    width: f64,
    length: f64,
}

impl DirectionsRequest {
    fn new(start: Coordinate, end: Coordinate, vehicle: &VehicleConstraints) -> Self {
        Self {
            coordinates: [[start.lon, start.lat], [end.lon, end.lat]],
            options: DirectionsOptions {
                vehicle_type: vehicle.vehicle_type,
                avoid_features: vehicle.avoid_features.clone(),
                profile_params: ProfileParams {
                    restrictions: Restrictions {
                        weight: vehicle.weight_tonnes,
                        height: vehicle.height_m,
                        width: vehicle.width_m,
                        length: vehicle.length_m,
                    },
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
    #[serde(default)]
    properties: Option<Properties>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct Properties {
    summary: Option<Summary>,
}

#[derive(Debug, Deserialize)]
struct Summary {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

/// ORS reports errors either as an object or as a bare string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Detailed { code: Option<i64>, message: String },
    Message(String),
}

fn parse_directions(body: &str) -> Result<Route, RoutingError> {
    let response: DirectionsResponse = serde_json::from_str(body)?;
    let feature = response.features.into_iter().next().ok_or(RoutingError::EmptyRoute)?;
    let polyline = RoutePolyline::from_lon_lat(&feature.geometry.coordinates)?;
    let summary = feature
        .properties
        .and_then(|p| p.summary)
        .map(|s| RouteSummary {
            distance_m: s.distance,
            duration_s: s.duration,
        });

    Ok(Route { polyline, summary })
}

fn provider_error(status: u16, body: &str) -> RoutingError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse {
            error: ErrorBody::Detailed { code, message },
        }) => RoutingError::Provider { code, message },
        Ok(ErrorResponse {
            error: ErrorBody::Message(message),
        }) => RoutingError::Provider { code: None, message },
        Err(_) => RoutingError::Provider {
            code: None,
            message: format!("HTTP {}: {}", status, body.trim()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_is_lon_first_with_restrictions() {
        let request = DirectionsRequest::new(
            Coordinate::new(-38.5267, -3.7172),
            Coordinate::new(-49.9037, -6.0675),
            &VehicleConstraints::default(),
        );
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["coordinates"][0][0], -38.5267);
        assert_eq!(body["coordinates"][1][1], -6.0675);
        assert_eq!(body["options"]["vehicle_type"], "hgv");
        assert_eq!(body["options"]["avoid_features"][0], "tollways");
        assert_eq!(body["options"]["profile_params"]["restrictions"]["weight"], 120.0);
        assert_eq!(body["options"]["profile_params"]["restrictions"]["height"], 4.3);
    }

    #[test]
    fn test_empty_avoid_features_are_omitted() {
        let vehicle = VehicleConstraints {
            avoid_features: Vec::new(),
            ..VehicleConstraints::default()
        };
        let request = DirectionsRequest::new(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0), &vehicle);
        let body = serde_json::to_value(&request).unwrap();
        assert!(body["options"].get("avoid_features").is_none());
    }

    #[test]
    fn test_parse_directions() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"summary": {"distance": 1234.5, "duration": 98.7}},
                "geometry": {"type": "LineString", "coordinates": [[-38.52, -3.71], [-38.60, -3.80], [-38.70, -3.90]]}
            }]
        }"#;
        let route = parse_directions(body).unwrap();
        assert_eq!(route.polyline.points().len(), 3);
        assert_eq!(route.polyline.start(), Coordinate::new(-38.52, -3.71));
        assert_eq!(
            route.summary,
            Some(RouteSummary {
                distance_m: 1234.5,
                duration_s: 98.7
            })
        );
    }

    #[test]
    fn test_parse_directions_without_features() {
        let result = parse_directions(r#"{"type":"FeatureCollection","features":[]}"#);
        assert!(matches!(result, Err(RoutingError::EmptyRoute)));
    }

    #[test]
    fn test_parse_directions_with_degenerate_geometry() {
        let body = r#"{"features":[{"geometry":{"coordinates":[[-38.52,-3.71]]}}]}"#;
        assert!(matches!(parse_directions(body), Err(RoutingError::Geometry(_))));
    }

    #[test]
    fn test_provider_error_message() {
        let body = r#"{"error":{"code":2004,"message":"Request parameters exceed the server configuration limits."}}"#;
        match provider_error(400, body) {
            RoutingError::Provider { code, message } => {
                assert_eq!(code, Some(2004));
                assert!(message.contains("exceed"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_provider_error_plain_text() {
        match provider_error(403, "Access to this API has been disallowed") {
            RoutingError::Provider { code, message } => {
                assert_eq!(code, None);
                assert!(message.starts_with("HTTP 403"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
