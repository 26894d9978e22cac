//! In-memory collaborators for pipeline tests.

use std::collections::HashMap;
use std::sync::Mutex;

use truckstop_planner::error::{GeocodeError, RoutingError, SourceError};
use truckstop_planner::models::{BoundingBox, CandidatePoint, Category, Coordinate, VehicleConstraints};
use truckstop_planner::polyline::RoutePolyline;
use truckstop_planner::traits::{Geocoder, PointSource, Route, RouteProvider};

/// Geocoder backed by a name → coordinate table.
#[derive(Debug, Default)]
pub struct TableGeocoder {
    places: HashMap<String, Coordinate>,
}

impl TableGeocoder {
    pub fn with(mut self, name: &str, coord: Coordinate) -> Self {
        self.places.insert(name.to_string(), coord);
        self
    }
}

impl Geocoder for TableGeocoder {
    fn resolve(&self, name: &str) -> Result<Coordinate, GeocodeError> {
        self.places
            .get(name)
            .copied()
            .ok_or_else(|| GeocodeError::NotFound(name.to_string()))
    }
}

/// Router that always answers with the same polyline, or a provider error.
#[derive(Debug)]
pub struct FixedRouter {
    pub answer: Result<RoutePolyline, String>,
    pub seen: Mutex<Vec<(Coordinate, Coordinate, VehicleConstraints)>>,
}

impl FixedRouter {
    pub fn returning(polyline: RoutePolyline) -> Self {
        Self {
            answer: Ok(polyline),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl RouteProvider for FixedRouter {
    fn route(&self, start: Coordinate, end: Coordinate, vehicle: &VehicleConstraints) -> Result<Route, RoutingError> {
        self.seen.lock().unwrap().push((start, end, vehicle.clone()));
        match &self.answer {
            Ok(polyline) => Ok(Route {
                polyline: polyline.clone(),
                summary: None,
            }),
            Err(message) => Err(RoutingError::Provider {
                code: Some(2009),
                message: message.clone(),
            }),
        }
    }
}

/// Point source with canned answers per category.
///
/// Categories without an entry return an empty list.
#[derive(Debug, Default)]
pub struct CannedSource {
    answers: HashMap<Category, Result<Vec<CandidatePoint>, String>>,
    pub queries: Mutex<Vec<(Category, BoundingBox)>>,
}

impl CannedSource {
    pub fn with(mut self, category: Category, points: Vec<CandidatePoint>) -> Self {
        self.answers.insert(category, Ok(points));
        self
    }

    pub fn failing(mut self, category: Category, message: &str) -> Self {
        self.answers.insert(category, Err(message.to_string()));
        self
    }
}

impl PointSource for CannedSource {
    fn query(&self, bbox: &BoundingBox, category: Category) -> Result<Vec<CandidatePoint>, SourceError> {
        self.queries.lock().unwrap().push((category, *bbox));
        match self.answers.get(&category) {
            Some(Ok(points)) => Ok(points.clone()),
            Some(Err(message)) => Err(SourceError::Other(message.clone())),
            None => Ok(Vec::new()),
        }
    }
}
