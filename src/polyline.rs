//! Route polyline as returned by the routing provider.
//!
//! Points are stored longitude first. Conversion to latitude-first layouts
//! happens at the boundary (map rendering, Overpass queries).

use geo::{HaversineLength, LineString};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::models::{BoundingBox, Coordinate};

/// An immutable route geometry of at least two finite coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coordinate>", into = "Vec<Coordinate>")]
pub struct RoutePolyline {
    points: Vec<Coordinate>,
}

impl RoutePolyline {
    /// Creates a polyline, rejecting fewer than 2 points or non-finite values.
    pub fn new(points: Vec<Coordinate>) -> Result<Self, GeometryError> {
        if points.len() < 2 {
            return Err(GeometryError::TooFewPoints(points.len()));
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(GeometryError::NonFiniteCoordinate(index));
        }
        Ok(Self { points })
    }

    /// Builds a polyline from `[lon, lat]` pairs, the GeoJSON layout.
    pub fn from_lon_lat(pairs: &[[f64; 2]]) -> Result<Self, GeometryError> {
        Self::new(pairs.iter().map(|[lon, lat]| Coordinate::new(*lon, *lat)).collect())
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn start(&self) -> Coordinate {
        self.points[0]
    }

    pub fn end(&self) -> Coordinate {
        self.points[self.points.len() - 1]
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.points
            .iter()
            .fold(BoundingBox::around(self.points[0]), |bbox, c| bbox.include(*c))
    }

    /// Arithmetic mean of the vertices, used to center the map.
    pub fn mean_center(&self) -> Coordinate {
        let n = self.points.len() as f64;
        let (lon, lat) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(lon, lat), p| (lon + p.lon, lat + p.lat));
        Coordinate::new(lon / n, lat / n)
    }

    /// Great-circle length along the vertices in kilometers.
    pub fn length_km(&self) -> f64 {
        self.line_string().haversine_length() / 1000.0
    }

    pub fn line_string(&self) -> LineString<f64> {
        LineString::new(self.points.iter().copied().map(Into::into).collect())
    }
}

impl TryFrom<Vec<Coordinate>> for RoutePolyline {
    type Error = GeometryError;

    fn try_from(points: Vec<Coordinate>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<RoutePolyline> for Vec<Coordinate> {
    fn from(polyline: RoutePolyline) -> Self {
        polyline.points
    }
}
