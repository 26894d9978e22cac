//! Overpass API adapter for points of interest.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::SourceError;
use crate::models::{BoundingBox, CandidatePoint, Category, Coordinate};
use crate::traits::PointSource;

#[derive(Debug, Clone)]
pub struct OverpassConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            base_url: "https://overpass-api.de".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OverpassClient {
    config: OverpassConfig,
    client: reqwest::blocking::Client,
}

impl OverpassClient {
    pub fn new(config: OverpassConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl PointSource for OverpassClient {
    fn query(&self, bbox: &BoundingBox, category: Category) -> Result<Vec<CandidatePoint>, SourceError> {
        let url = format!("{}/api/interpreter", self.config.base_url.trim_end_matches('/'));
        let query = build_query(bbox, category, self.config.timeout_secs);
        debug!(%category, %query, "querying overpass");

        let response = self.client.post(url).form(&[("data", query)]).send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        parse_elements(&body, category)
    }
}

/// Overpass bounding boxes are `south,west,north,east`, latitude first.
pub fn overpass_bbox(bbox: &BoundingBox) -> String {
    format!(
        "{:.6},{:.6},{:.6},{:.6}",
        bbox.min_lat, bbox.min_lon, bbox.max_lat, bbox.max_lon
    )
}

/// Nodes, ways and relations carrying the category tag, with way and
/// relation centers.
pub fn build_query(bbox: &BoundingBox, category: Category, timeout_secs: u64) -> String {
    let (key, value) = category.osm_tag();
    let area = overpass_bbox(bbox);
    format!(
        "[out:json][timeout:{timeout_secs}];\
         (\
         node[\"{key}\"=\"{value}\"]({area});\
         way[\"{key}\"=\"{value}\"]({area});\
         relation[\"{key}\"=\"{value}\"]({area});\
         );\
         out center;"
    )
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    kind: String,
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: Option<f64>,
    lon: Option<f64>,
}

impl OverpassElement {
    fn into_candidate(self, category: Category) -> CandidatePoint {
        CandidatePoint {
            id: format!("{}/{}", self.kind, self.id),
            category,
            position: self.lon.zip(self.lat).map(|(lon, lat)| Coordinate::new(lon, lat)),
            center: self
                .center
                .and_then(|c| c.lon.zip(c.lat))
                .map(|(lon, lat)| Coordinate::new(lon, lat)),
            tags: self.tags,
        }
    }
}

/// Maps an Overpass JSON document to candidates of `category`.
///
/// Only an undecodable document is an error. Elements that are missing
/// coordinates or fail to decode become candidates without a coordinate,
/// and the proximity filter reports them as malformed.
pub fn parse_elements(body: &str, category: Category) -> Result<Vec<CandidatePoint>, SourceError> {
    let response: OverpassResponse = serde_json::from_str(body)?;
    Ok(response
        .elements
        .into_iter()
        .enumerate()
        .map(|(index, value)| parse_element(index, value, category))
        .collect())
}

fn parse_element(index: usize, value: serde_json::Value, category: Category) -> CandidatePoint {
    match OverpassElement::deserialize(&value) {
        Ok(element) => element.into_candidate(category),
        Err(error) => {
            let id = element_id(&value).unwrap_or_else(|| format!("element/{index}"));
            warn!(%id, %error, "malformed overpass element");
            CandidatePoint::new(id, category)
        }
    }
}

fn element_id(value: &serde_json::Value) -> Option<String> {
    let kind = value.get("type")?.as_str()?;
    let id = value.get("id")?.as_i64()?;
    Some(format!("{kind}/{id}"))
}
