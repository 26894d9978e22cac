//! End-to-end planning run: endpoints, route, nearby stops.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use tracing::info;

use crate::aggregate::{AggregateOutcome, aggregate};
use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::models::Coordinate;
use crate::traits::{Geocoder, PointSource, Route, RouteMap, RouteProvider};

/// A route endpoint given either by name or by coordinate.
#[derive(Debug, Clone, PartialEq)]
pub enum Waypoint {
    Named(String),
    At(Coordinate),
}

/// `"lon,lat"` becomes a coordinate, anything else a place name.
impl FromStr for Waypoint {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<Coordinate>() {
            Ok(coord) => Waypoint::At(coord),
            Err(_) => Waypoint::Named(s.trim().to_string()),
        })
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Waypoint::Named(name) => f.write_str(name),
            Waypoint::At(coord) => write!(f, "{}", coord),
        }
    }
}

#[derive(Debug)]
pub struct PlanReport {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub route: Route,
    pub stops: AggregateOutcome,
}

impl PlanReport {
    pub fn route_map<'a>(&'a self, config: &'a PlannerConfig) -> RouteMap<'a> {
        RouteMap {
            route: &self.route.polyline,
            origin: self.origin,
            destination: self.destination,
            points: &self.stops.points,
            categories: &config.categories,
            max_distance_km: config.proximity.max_distance_km,
        }
    }
}

/// Wires the collaborators together for planning runs.
pub struct Planner<G, R, S> {
    geocoder: G,
    router: R,
    source: S,
    config: PlannerConfig,
}

impl<G, R, S> Planner<G, R, S>
where
    G: Geocoder,
    R: RouteProvider,
    S: PointSource + Sync,
{
    pub fn new(geocoder: G, router: R, source: S, config: PlannerConfig) -> Self {
        Self {
            geocoder,
            router,
            source,
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Runs the pipeline. Fails if an endpoint or the route cannot be
    /// obtained; partial stop results are reported in the outcome instead.
    pub fn plan(&self, origin: &Waypoint, destination: &Waypoint) -> Result<PlanReport, PlanError> {
        let origin = self.resolve(origin, "origin")?;
        let destination = self.resolve(destination, "destination")?;
        info!(%origin, %destination, "resolved endpoints");

        let route = self.router.route(origin, destination, &self.config.vehicle)?;
        info!(
            points = route.polyline.points().len(),
            length_km = route.polyline.length_km(),
            "route computed"
        );

        let stops = aggregate(
            &route.polyline,
            &self.config.categories,
            &self.source,
            &self.config.aggregate_options(),
        )?;
        info!(
            stops = stops.points.len(),
            skipped = stops.skipped.len(),
            failed_categories = stops.failures.len(),
            max_distance_km = self.config.proximity.max_distance_km,
            "stops located"
        );

        Ok(PlanReport {
            origin,
            destination,
            route,
            stops,
        })
    }

    fn resolve(&self, waypoint: &Waypoint, role: &'static str) -> Result<Coordinate, PlanError> {
        match waypoint {
            Waypoint::At(coord) => Ok(*coord),
            Waypoint::Named(name) => self
                .geocoder
                .resolve(name)
                .map_err(|source| PlanError::Geocode { role, source }),
        }
    }
}
