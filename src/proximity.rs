//! Route-proximity filter.
//!
//! The route is simplified once, a corridor is buffered around the
//! simplified line, and every candidate goes through a cheap containment
//! test before its exact distance is measured. Bad candidates are skipped
//! one by one; they never abort the batch.

use geo::LineString;
use tracing::{debug, warn};

use crate::error::{CandidateError, GeometryError};
use crate::geometry::{Corridor, buffer, degrees_to_km, distance_to_line, km_to_degrees, simplify};
use crate::models::{AcceptedPoint, CandidatePoint};
use crate::polyline::RoutePolyline;

/// Parameters of a proximity run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityOptions {
    /// Maximum lateral distance from the route, inclusive.
    pub max_distance_km: f64,
    /// Douglas-Peucker tolerance in degrees applied to the route first.
    pub simplify_tolerance: f64,
}

impl Default for ProximityOptions {
    fn default() -> Self {
        Self {
            max_distance_km: 5.0,
            simplify_tolerance: 0.01,
        }
    }
}

impl ProximityOptions {
    pub fn new(max_distance_km: f64, simplify_tolerance: f64) -> Self {
        Self {
            max_distance_km,
            simplify_tolerance,
        }
    }

    /// Corridor radius in degrees.
    pub fn radius_degrees(&self) -> f64 {
        km_to_degrees(self.max_distance_km)
    }
}

/// A candidate that could not be evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCandidate {
    pub id: String,
    pub error: CandidateError,
}

/// Accepted points in evaluation order plus counters for everything else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    pub accepted: Vec<AcceptedPoint>,
    pub skipped: Vec<SkippedCandidate>,
    /// Rejected by the corridor test.
    pub outside_corridor: usize,
    /// Inside the corridor but farther than the maximum distance.
    pub beyond_distance: usize,
}

impl FilterOutcome {
    pub fn evaluated(&self) -> usize {
        self.accepted.len() + self.skipped.len() + self.outside_corridor + self.beyond_distance
    }
}

/// Result of evaluating one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Accepted(AcceptedPoint),
    OutsideCorridor,
    BeyondDistance { distance_km: f64 },
}

/// Simplified route and its corridor, built once and reused for every
/// category of a planning run.
#[derive(Debug)]
pub struct RouteCorridor {
    simplified: LineString<f64>,
    corridor: Corridor,
    max_distance_km: f64,
}

impl RouteCorridor {
    pub fn new(route: &RoutePolyline, options: &ProximityOptions) -> Result<Self, GeometryError> {
        let simplified = simplify(&route.line_string(), options.simplify_tolerance)?;
        let corridor = buffer(&simplified, options.radius_degrees())?;

        debug!(
            route_points = route.points().len(),
            simplified_points = simplified.0.len(),
            segments = corridor.segment_count(),
            radius_degrees = corridor.radius(),
            "built route corridor"
        );

        Ok(Self {
            simplified,
            corridor,
            max_distance_km: options.max_distance_km,
        })
    }

    pub fn simplified(&self) -> &LineString<f64> {
        &self.simplified
    }

    pub fn corridor(&self) -> &Corridor {
        &self.corridor
    }

    pub fn max_distance_km(&self) -> f64 {
        self.max_distance_km
    }

    /// Distance from a candidate to the simplified route, corridor permitting.
    pub fn evaluate(&self, candidate: &CandidatePoint) -> Result<Evaluation, CandidateError> {
        let coordinate = candidate.resolve_coordinate()?;

        if !self.corridor.contains(coordinate) {
            return Ok(Evaluation::OutsideCorridor);
        }

        // A point at the limit can land one ulp past it in either unit.
        let distance_degrees = distance_to_line(coordinate, &self.simplified);
        let distance_km = degrees_to_km(distance_degrees);
        if distance_km > self.max_distance_km && distance_degrees > self.corridor.radius() {
            return Ok(Evaluation::BeyondDistance { distance_km });
        }

        Ok(Evaluation::Accepted(AcceptedPoint {
            id: candidate.id.clone(),
            category: candidate.category,
            coordinate,
            name: candidate.name().map(str::to_string),
            brand: candidate.brand().map(str::to_string),
            tags: candidate.tags.clone(),
            distance_km: round_km(distance_km, self.max_distance_km),
        }))
    }

    /// Filters `candidates`, keeping input order among the accepted ones.
    pub fn filter(&self, candidates: &[CandidatePoint]) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();

        for candidate in candidates {
            match self.evaluate(candidate) {
                Ok(Evaluation::Accepted(point)) => outcome.accepted.push(point),
                Ok(Evaluation::OutsideCorridor) => outcome.outside_corridor += 1,
                Ok(Evaluation::BeyondDistance { distance_km }) => {
                    debug!(id = %candidate.id, distance_km, "candidate inside corridor but too far");
                    outcome.beyond_distance += 1;
                }
                Err(error) => {
                    warn!(id = %candidate.id, %error, "skipping candidate");
                    outcome.skipped.push(SkippedCandidate {
                        id: candidate.id.clone(),
                        error,
                    });
                }
            }
        }

        outcome
    }
}

/// Keeps the candidates within `options.max_distance_km` of `route`.
///
/// Fails only when the route or options cannot produce a corridor.
pub fn filter_nearby(
    route: &RoutePolyline,
    candidates: &[CandidatePoint],
    options: &ProximityOptions,
) -> Result<FilterOutcome, GeometryError> {
    let corridor = RouteCorridor::new(route, options)?;
    Ok(corridor.filter(candidates))
}

/// Two-decimal rounding that never crosses the acceptance limit.
fn round_km(distance_km: f64, max_distance_km: f64) -> f64 {
    ((distance_km * 100.0).round() / 100.0).min(max_distance_km)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Coordinate};

    fn straight_route() -> RoutePolyline {
        RoutePolyline::new(vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 10.0)]).unwrap()
    }

    fn fuel(id: &str, lon: f64, lat: f64) -> CandidatePoint {
        CandidatePoint::new(id, Category::Fuel).at(Coordinate::new(lon, lat))
    }

    #[test]
    fn test_round_km() {
        assert_eq!(round_km(55.5, 111.0), 55.5);
        assert_eq!(round_km(1.23456, 5.0), 1.23);
        assert_eq!(round_km(4.9958, 4.996), 4.996);
    }

    #[test]
    fn test_evaluate_outside_corridor() {
        let corridor = RouteCorridor::new(&straight_route(), &ProximityOptions::new(111.0, 0.0)).unwrap();
        assert_eq!(corridor.evaluate(&fuel("node/1", 2.0, 5.0)), Ok(Evaluation::OutsideCorridor));
    }

    #[test]
    fn test_evaluate_accepts_with_distance() {
        let corridor = RouteCorridor::new(&straight_route(), &ProximityOptions::new(111.0, 0.0)).unwrap();
        match corridor.evaluate(&fuel("node/1", 0.5, 5.0).tag("name", "Posto Ipiranga")) {
            Ok(Evaluation::Accepted(point)) => {
                assert_eq!(point.distance_km, 55.5);
                assert_eq!(point.name.as_deref(), Some("Posto Ipiranga"));
                assert_eq!(point.category, Category::Fuel);
            }
            other => panic!("expected acceptance, got {:?}", other),
        }
    }

    #[test]
    fn test_filter_does_not_touch_candidates() {
        let candidates = vec![fuel("node/1", 0.5, 5.0)];
        let before = candidates.clone();
        let outcome = filter_nearby(&straight_route(), &candidates, &ProximityOptions::new(111.0, 0.0)).unwrap();
        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(candidates, before);
    }

    #[test]
    fn test_counters_cover_every_candidate() {
        let candidates = vec![
            fuel("node/1", 0.5, 5.0),
            fuel("node/2", 3.0, 5.0),
            CandidatePoint::new("way/3", Category::Fuel),
        ];
        let outcome = filter_nearby(&straight_route(), &candidates, &ProximityOptions::new(111.0, 0.0)).unwrap();
        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.outside_corridor, 1);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.evaluated(), 3);
    }

    #[test]
    fn test_negative_distance_is_invalid() {
        let result = RouteCorridor::new(&straight_route(), &ProximityOptions::new(-1.0, 0.0));
        assert!(matches!(result, Err(GeometryError::InvalidRadius(_))));
    }
}
