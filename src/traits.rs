//! Collaborator interfaces for the planning pipeline.
//!
//! These are intentionally minimal. The crate ships HTTP implementations
//! (Nominatim, OpenRouteService, Overpass) and a Leaflet renderer; tests and
//! other apps can plug in their own.

use crate::error::{GeocodeError, RenderError, RoutingError, SourceError};
use crate::models::{AcceptedPoint, BoundingBox, CandidatePoint, Category, Coordinate, VehicleConstraints};
use crate::polyline::RoutePolyline;

/// Resolves a place name to a coordinate.
pub trait Geocoder {
    fn resolve(&self, name: &str) -> Result<Coordinate, GeocodeError>;
}

impl<T: Geocoder + ?Sized> Geocoder for &T {
    fn resolve(&self, name: &str) -> Result<Coordinate, GeocodeError> {
        (**self).resolve(name)
    }
}

/// Provider summary of a computed route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSummary {
    pub distance_m: f64,
    pub duration_s: f64,
}

/// A route as returned by a [`RouteProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub polyline: RoutePolyline,
    pub summary: Option<RouteSummary>,
}

/// Computes a road route under vehicle constraints.
pub trait RouteProvider {
    fn route(
        &self,
        start: Coordinate,
        end: Coordinate,
        vehicle: &VehicleConstraints,
    ) -> Result<Route, RoutingError>;
}

impl<T: RouteProvider + ?Sized> RouteProvider for &T {
    fn route(
        &self,
        start: Coordinate,
        end: Coordinate,
        vehicle: &VehicleConstraints,
    ) -> Result<Route, RoutingError> {
        (**self).route(start, end, vehicle)
    }
}

/// Fetches raw points of interest for one category inside a bounding box.
///
/// Returned candidates carry the category they were queried under.
pub trait PointSource {
    fn query(&self, bbox: &BoundingBox, category: Category) -> Result<Vec<CandidatePoint>, SourceError>;
}

impl<T: PointSource + ?Sized> PointSource for &T {
    fn query(&self, bbox: &BoundingBox, category: Category) -> Result<Vec<CandidatePoint>, SourceError> {
        (**self).query(bbox, category)
    }
}

/// Everything a renderer needs to draw a planning run.
#[derive(Debug, Clone, Copy)]
pub struct RouteMap<'a> {
    pub route: &'a RoutePolyline,
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub points: &'a [AcceptedPoint],
    pub categories: &'a [Category],
    pub max_distance_km: f64,
}

/// Turns a planning run into a presentational artifact.
pub trait MapRenderer {
    type Artifact;

    fn render(&self, map: &RouteMap<'_>) -> Result<Self::Artifact, RenderError>;
}
