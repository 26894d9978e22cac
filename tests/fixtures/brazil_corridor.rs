//! Fortaleza (CE) → Parauapebas (PA) corridor along BR-222 / BR-316.
//!
//! Route vertices are town centers along the highway; stops are placed on
//! or just off those vertices, plus a few cities far from the road.

use truckstop_planner::models::{CandidatePoint, Category, Coordinate};
use truckstop_planner::polyline::RoutePolyline;

/// A named place with (lon, lat) coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Place {
    pub name: &'static str,
    pub lon: f64,
    pub lat: f64,
}

impl Place {
    pub const fn new(name: &'static str, lon: f64, lat: f64) -> Self {
        Self { name, lon, lat }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lon, self.lat)
    }

    /// Same place shifted north by `degrees`.
    pub fn north(&self, degrees: f64) -> Coordinate {
        Coordinate::new(self.lon, self.lat + degrees)
    }
}

// ============================================================================
// Route vertices
// ============================================================================

pub const FORTALEZA: Place = Place::new("Fortaleza", -38.5267, -3.7172);
pub const PARAUAPEBAS: Place = Place::new("Parauapebas", -49.9037, -6.0675);

pub const ROUTE_TOWNS: &[Place] = &[
    FORTALEZA,
    Place::new("Caucaia", -38.6531, -3.7361),
    Place::new("Itapajé", -39.5856, -3.6869),
    Place::new("Sobral", -40.3497, -3.6861),
    Place::new("Tianguá", -40.9919, -3.7322),
    Place::new("Piripiri", -41.7769, -4.2733),
    Place::new("Teresina", -42.8019, -5.0892),
    Place::new("Caxias", -43.3561, -4.8581),
    Place::new("Presidente Dutra", -44.4900, -5.2897),
    Place::new("Imperatriz", -47.4917, -5.5264),
    Place::new("Marabá", -49.1178, -5.3686),
    PARAUAPEBAS,
];

// ============================================================================
// Cities well away from the highway
// ============================================================================

pub const FAR_CITIES: &[Place] = &[
    Place::new("Belém", -48.5044, -1.4558),
    Place::new("Recife", -34.8770, -8.0476),
    Place::new("Brasília", -47.8825, -15.7942),
    Place::new("Palmas", -48.3336, -10.1844),
];

pub fn route() -> RoutePolyline {
    RoutePolyline::new(ROUTE_TOWNS.iter().map(Place::coordinate).collect()).expect("fixture route is valid")
}

fn town(name: &str) -> Place {
    *ROUTE_TOWNS
        .iter()
        .find(|place| place.name == name)
        .expect("town is on the fixture route")
}

// ============================================================================
// Stops
// ============================================================================

/// Fuel stations: three near the road, two far away, one malformed.
pub fn fuel_stations() -> Vec<CandidatePoint> {
    vec![
        CandidatePoint::new("node/101", Category::Fuel)
            .at(town("Sobral").coordinate())
            .tag("name", "Posto Sobral")
            .tag("brand", "Ipiranga"),
        CandidatePoint::new("node/102", Category::Fuel)
            .at(FAR_CITIES[0].coordinate())
            .tag("name", "Posto Belém"),
        CandidatePoint::new("way/103", Category::Fuel)
            .centered(town("Teresina").north(0.02))
            .tag("name", "Posto Teresina"),
        CandidatePoint::new("relation/104", Category::Fuel).tag("name", "Broken record"),
        CandidatePoint::new("node/105", Category::Fuel)
            .at(FAR_CITIES[1].coordinate())
            .tag("name", "Posto Recife"),
        CandidatePoint::new("node/106", Category::Fuel)
            .at(town("Marabá").north(-0.01))
            .tag("name", "Posto Marabá")
            .tag("brand", "Shell"),
    ]
}

pub const NEAR_FUEL_IDS: &[&str] = &["node/101", "way/103", "node/106"];

/// Lodging: one on the road, one far away, and a rest stop that is also a restaurant.
pub fn hotels() -> Vec<CandidatePoint> {
    vec![
        CandidatePoint::new("node/201", Category::Hotel)
            .at(town("Imperatriz").coordinate())
            .tag("name", "Hotel Imperatriz"),
        CandidatePoint::new("node/202", Category::Hotel)
            .at(FAR_CITIES[2].coordinate())
            .tag("name", "Hotel Brasília"),
        rest_stop(Category::Hotel),
    ]
}

pub fn restaurants() -> Vec<CandidatePoint> {
    vec![
        rest_stop(Category::Restaurant),
        CandidatePoint::new("node/302", Category::Restaurant)
            .at(FAR_CITIES[3].coordinate())
            .tag("name", "Churrascaria Palmas"),
    ]
}

/// The same physical point, tagged both as lodging and as a restaurant.
pub fn rest_stop(category: Category) -> CandidatePoint {
    CandidatePoint::new("node/900", category)
        .at(town("Caxias").north(0.01))
        .tag("name", "Parada Caxias")
}
