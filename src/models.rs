//! Domain types shared by the filter, the aggregator and the adapters.
//!
//! Every coordinate in this crate is (longitude, latitude). Adapters that
//! talk latitude-first (Overpass bounding boxes, Leaflet, Nominatim) convert
//! at their own boundary.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CandidateError;

/// A geographic position in decimal degrees, longitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

impl From<Coordinate> for geo::Coord<f64> {
    fn from(coord: Coordinate) -> Self {
        geo::Coord {
            x: coord.lon,
            y: coord.lat,
        }
    }
}

impl From<Coordinate> for geo::Point<f64> {
    fn from(coord: Coordinate) -> Self {
        geo::Point::new(coord.lon, coord.lat)
    }
}

impl From<geo::Coord<f64>> for Coordinate {
    fn from(coord: geo::Coord<f64>) -> Self {
        Self::new(coord.x, coord.y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lon, self.lat)
    }
}

/// Parses `"lon,lat"`.
impl FromStr for Coordinate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lon, lat) = s
            .split_once(',')
            .ok_or_else(|| format!("expected \"lon,lat\", got {s:?}"))?;
        let lon: f64 = lon.trim().parse().map_err(|_| format!("bad longitude in {s:?}"))?;
        let lat: f64 = lat.trim().parse().map_err(|_| format!("bad latitude in {s:?}"))?;
        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            return Err(format!("coordinate out of range: {s:?}"));
        }
        Ok(Self::new(lon, lat))
    }
}

/// Axis-aligned box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Degenerate box covering a single coordinate.
    pub fn around(coord: Coordinate) -> Self {
        Self {
            min_lon: coord.lon,
            min_lat: coord.lat,
            max_lon: coord.lon,
            max_lat: coord.lat,
        }
    }

    pub fn include(self, coord: Coordinate) -> Self {
        Self {
            min_lon: self.min_lon.min(coord.lon),
            min_lat: self.min_lat.min(coord.lat),
            max_lon: self.max_lon.max(coord.lon),
            max_lat: self.max_lat.max(coord.lat),
        }
    }

    /// Grows the box by `margin` degrees on every side, clamped to valid ranges.
    pub fn expand(&self, margin: f64) -> Self {
        Self {
            min_lon: (self.min_lon - margin).max(-180.0),
            min_lat: (self.min_lat - margin).max(-90.0),
            max_lon: (self.max_lon + margin).min(180.0),
            max_lat: (self.max_lat + margin).min(90.0),
        }
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        (self.min_lon..=self.max_lon).contains(&coord.lon)
            && (self.min_lat..=self.max_lat).contains(&coord.lat)
    }
}

/// Point-of-interest categories the planner knows how to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Fuel,
    Restaurant,
    Cafe,
    Hotel,
    Motel,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Fuel,
        Category::Restaurant,
        Category::Cafe,
        Category::Hotel,
        Category::Motel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fuel => "fuel",
            Category::Restaurant => "restaurant",
            Category::Cafe => "cafe",
            Category::Hotel => "hotel",
            Category::Motel => "motel",
        }
    }

    /// OpenStreetMap tag (key, value) identifying this category.
    pub fn osm_tag(&self) -> (&'static str, &'static str) {
        match self {
            Category::Fuel => ("amenity", "fuel"),
            Category::Restaurant => ("amenity", "restaurant"),
            Category::Cafe => ("amenity", "cafe"),
            Category::Hotel => ("tourism", "hotel"),
            Category::Motel => ("tourism", "motel"),
        }
    }

    /// Drops repeated categories, keeping the first occurrence of each.
    pub fn unique(categories: &[Category]) -> Vec<Category> {
        let mut unique = Vec::with_capacity(categories.len());
        for &category in categories {
            if !unique.contains(&category) {
                unique.push(category);
            }
        }
        unique
    }

    /// Fallback display name for points without a `name` tag.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Fuel => "Fuel station",
            Category::Restaurant => "Restaurant",
            Category::Cafe => "Cafe",
            Category::Hotel => "Hotel",
            Category::Motel => "Motel",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// A raw point of interest as reported by a [`crate::traits::PointSource`].
///
/// Node-shaped records carry their own position; way and relation records
/// carry a representative center instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePoint {
    pub id: String,
    pub category: Category,
    pub position: Option<Coordinate>,
    pub center: Option<Coordinate>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl CandidatePoint {
    pub fn new(id: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            category,
            position: None,
            center: None,
            tags: BTreeMap::new(),
        }
    }

    pub fn at(mut self, coord: Coordinate) -> Self {
        self.position = Some(coord);
        self
    }

    pub fn centered(mut self, coord: Coordinate) -> Self {
        self.center = Some(coord);
        self
    }

    pub fn tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }

    /// Own position if present, otherwise the center.
    pub fn resolve_coordinate(&self) -> Result<Coordinate, CandidateError> {
        let coord = self
            .position
            .or(self.center)
            .ok_or_else(|| CandidateError::MissingCoordinate {
                id: self.id.clone(),
            })?;

        if !coord.is_finite() {
            return Err(CandidateError::NonFiniteCoordinate {
                id: self.id.clone(),
            });
        }

        Ok(coord)
    }

    pub fn name(&self) -> Option<&str> {
        self.tags.get("name").map(String::as_str)
    }

    pub fn brand(&self) -> Option<&str> {
        self.tags.get("brand").map(String::as_str)
    }
}

/// A candidate that passed the proximity filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedPoint {
    pub id: String,
    pub category: Category,
    pub coordinate: Coordinate,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub tags: BTreeMap<String, String>,
    /// Distance to the simplified route, rounded to 2 decimals.
    pub distance_km: f64,
}

impl AcceptedPoint {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.category.label())
    }
}

/// Vehicle class understood by the routing provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleProfile {
    #[serde(rename = "driving-hgv")]
    DrivingHgv,
    #[serde(rename = "driving-car")]
    DrivingCar,
}

impl VehicleProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleProfile::DrivingHgv => "driving-hgv",
            VehicleProfile::DrivingCar => "driving-car",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Hgv,
    Bus,
    Agricultural,
    Delivery,
    Forestry,
    Goods,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvoidFeature {
    Tollways,
    Ferries,
    Unpaved,
    Tunnels,
}

impl FromStr for AvoidFeature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tollways" => Ok(AvoidFeature::Tollways),
            "ferries" => Ok(AvoidFeature::Ferries),
            "unpaved" => Ok(AvoidFeature::Unpaved),
            "tunnels" => Ok(AvoidFeature::Tunnels),
            other => Err(format!("unknown avoid feature: {other}")),
        }
    }
}

/// Restrictions forwarded untouched to the routing provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleConstraints {
    pub profile: VehicleProfile,
    pub vehicle_type: VehicleType,
    pub weight_tonnes: f64,
    pub height_m: f64,
    pub width_m: f64,
    pub length_m: f64,
    pub avoid_features: Vec<AvoidFeature>,
}

impl Default for VehicleConstraints {
    fn default() -> Self {
        Self {
            profile: VehicleProfile::DrivingHgv,
            vehicle_type: VehicleType::Hgv,
            weight_tonnes: 120.0,
            height_m: 4.3,
            width_m: 5.0,
            length_m: 70.0,
            avoid_features: vec![
                AvoidFeature::Tollways,
                AvoidFeature::Ferries,
                AvoidFeature::Unpaved,
                AvoidFeature::Tunnels,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_parse_is_lon_first() {
        let coord: Coordinate = "-38.5267,-3.7172".parse().unwrap();
        assert_eq!(coord.lon, -38.5267);
        assert_eq!(coord.lat, -3.7172);
    }

    #[test]
    fn test_coordinate_parse_rejects_names() {
        assert!("Parauapebas, Pará, Brasil".parse::<Coordinate>().is_err());
        assert!("10,95".parse::<Coordinate>().is_err());
    }

    #[test]
    fn test_category_unique_keeps_first_occurrence() {
        let categories = [Category::Hotel, Category::Fuel, Category::Hotel, Category::Fuel, Category::Cafe];
        assert_eq!(
            Category::unique(&categories),
            vec![Category::Hotel, Category::Fuel, Category::Cafe]
        );
    }

    #[test]
    fn test_bounding_box_expand() {
        let bbox = BoundingBox {
            min_lon: 0.0,
            min_lat: 0.0,
            max_lon: 1.0,
            max_lat: 1.0,
        }
        .expand(0.5);
        assert!(bbox.contains(Coordinate::new(-0.5, 1.5)));
        assert!(!bbox.contains(Coordinate::new(-0.6, 0.0)));
    }

    #[test]
    fn test_resolve_prefers_own_position() {
        let point = CandidatePoint::new("node/1", Category::Fuel)
            .at(Coordinate::new(1.0, 2.0))
            .centered(Coordinate::new(3.0, 4.0));
        assert_eq!(point.resolve_coordinate().unwrap(), Coordinate::new(1.0, 2.0));
    }

    #[test]
    fn test_resolve_falls_back_to_center() {
        let point = CandidatePoint::new("way/7", Category::Hotel).centered(Coordinate::new(3.0, 4.0));
        assert_eq!(point.resolve_coordinate().unwrap(), Coordinate::new(3.0, 4.0));
    }

    #[test]
    fn test_resolve_missing_is_malformed() {
        let point = CandidatePoint::new("relation/9", Category::Fuel);
        assert_eq!(
            point.resolve_coordinate(),
            Err(CandidateError::MissingCoordinate {
                id: "relation/9".to_string()
            })
        );
    }

    #[test]
    fn test_resolve_non_finite_is_malformed() {
        let point = CandidatePoint::new("node/2", Category::Fuel).at(Coordinate::new(f64::NAN, 0.0));
        assert!(matches!(
            point.resolve_coordinate(),
            Err(CandidateError::NonFiniteCoordinate { .. })
        ));
    }

    #[test]
    fn test_category_round_trip_names() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("truckwash".parse::<Category>().is_err());
    }

    #[test]
    fn test_default_vehicle_matches_heavy_haul() {
        let vehicle = VehicleConstraints::default();
        assert_eq!(vehicle.profile.as_str(), "driving-hgv");
        assert_eq!(vehicle.weight_tonnes, 120.0);
        assert_eq!(vehicle.avoid_features.len(), 4);
    }
}
