//! Planar geometry in degree space.
//!
//! Distances are Euclidean over (lon, lat) degrees and converted with a
//! flat 111 km per degree. East-west error grows with latitude; that is the
//! accepted model for corridor filtering, not a geodesic one.

use std::fmt;

use geo::{EuclideanDistance, Line, LineString, Point, Simplify};
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::error::GeometryError;
use crate::models::Coordinate;

/// Kilometers per degree used for every degree/km conversion.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Relative slack on the corridor radius; keeps containment a superset of
/// the `<=` distance check under floating-point rounding.
const CONTAINMENT_SLACK: f64 = 1e-9;

pub fn degrees_to_km(degrees: f64) -> f64 {
    degrees * KM_PER_DEGREE
}

pub fn km_to_degrees(km: f64) -> f64 {
    km / KM_PER_DEGREE
}

fn validate_line(line: &LineString<f64>) -> Result<(), GeometryError> {
    if line.0.len() < 2 {
        return Err(GeometryError::TooFewPoints(line.0.len()));
    }
    if let Some(index) = line.0.iter().position(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(GeometryError::NonFiniteCoordinate(index));
    }
    Ok(())
}

/// Douglas-Peucker simplification with `tolerance` in degrees.
///
/// Endpoints are always kept, so the result has at least two points.
pub fn simplify(line: &LineString<f64>, tolerance: f64) -> Result<LineString<f64>, GeometryError> {
    validate_line(line)?;
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(GeometryError::InvalidTolerance(tolerance));
    }
    Ok(line.simplify(&tolerance))
}

/// Shortest planar distance in degrees from `point` to `line`.
pub fn distance_to_line(point: Coordinate, line: &LineString<f64>) -> f64 {
    Point::from(point).euclidean_distance(line)
}

/// One segment of the corridor spine, stored as `[lon, lat]` corners.
#[derive(Debug, Clone, PartialEq)]
struct CorridorSegment {
    start: [f64; 2],
    end: [f64; 2],
}

impl RTreeObject for CorridorSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.start, self.end)
    }
}

impl PointDistance for CorridorSegment {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let distance = Point::from(*point).euclidean_distance(&Line::new(self.start, self.end));
        distance * distance
    }
}

/// Region within `radius` degrees of a line (the line's Minkowski sum with a disc).
///
/// Stored as the union of one capsule per segment, indexed in an R-tree so a
/// containment query only touches segments whose envelope is within reach.
pub struct Corridor {
    radius: f64,
    segments: RTree<CorridorSegment>,
}

impl fmt::Debug for Corridor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Corridor")
            .field("radius", &self.radius)
            .field("segments", &self.segments.size())
            .finish()
    }
}

impl Corridor {
    /// Radius in degrees.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn segment_count(&self) -> usize {
        self.segments.size()
    }

    /// True when `coord` lies inside or on the boundary of the corridor.
    pub fn contains(&self, coord: Coordinate) -> bool {
        let reach = self.radius * (1.0 + CONTAINMENT_SLACK);
        self.segments
            .locate_within_distance([coord.lon, coord.lat], reach * reach)
            .next()
            .is_some()
    }
}

/// Builds the corridor of `radius_degrees` around `line`.
pub fn buffer(line: &LineString<f64>, radius_degrees: f64) -> Result<Corridor, GeometryError> {
    validate_line(line)?;
    if !radius_degrees.is_finite() || radius_degrees < 0.0 {
        return Err(GeometryError::InvalidRadius(radius_degrees));
    }

    let segments = line
        .lines()
        .map(|segment| CorridorSegment {
            start: [segment.start.x, segment.start.y],
            end: [segment.end.x, segment.end.y],
        })
        .collect();

    Ok(Corridor {
        radius: radius_degrees,
        segments: RTree::bulk_load(segments),
    })
}
