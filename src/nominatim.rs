//! Nominatim HTTP geocoder.

use serde::Deserialize;
use tracing::debug;

use crate::error::GeocodeError;
use crate::models::Coordinate;
use crate::traits::Geocoder;

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Nominatim's usage policy requires an identifying agent.
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "truck_route_planner".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }
}

impl Geocoder for NominatimClient {
    fn resolve(&self, name: &str) -> Result<Coordinate, GeocodeError> {
        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        let places: Vec<NominatimPlace> = self
            .client
            .get(url)
            .query(&[("q", name), ("format", "jsonv2"), ("limit", "1")])
            .send()?
            .error_for_status()?
            .json()?;

        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NotFound(name.to_string()))?;
        debug!(query = name, display_name = %place.display_name, "geocoded");
        place.coordinate(name)
    }
}

/// One search hit. Nominatim encodes coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

impl NominatimPlace {
    fn coordinate(&self, query: &str) -> Result<Coordinate, GeocodeError> {
        let parse = |value: &str| {
            value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| GeocodeError::InvalidCoordinate {
                    query: query.to_string(),
                    value: value.to_string(),
                })
        };
        Ok(Coordinate::new(parse(&self.lon)?, parse(&self.lat)?))
    }
}
