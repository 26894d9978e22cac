//! Error taxonomy for the planner.
//!
//! Geometry errors are fatal to the call that produced them. Candidate and
//! source errors are isolated per point and per category respectively.
//! Geocoding and routing errors halt a planning run.

use thiserror::Error;

/// Malformed line input or corridor parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("invalid geometry: polyline needs at least 2 points, got {0}")]
    TooFewPoints(usize),

    #[error("invalid geometry: non-finite coordinate at index {0}")]
    NonFiniteCoordinate(usize),

    #[error("invalid geometry: tolerance must be finite and >= 0, got {0}")]
    InvalidTolerance(f64),

    #[error("invalid geometry: radius must be finite and >= 0, got {0}")]
    InvalidRadius(f64),
}

/// A single candidate point that cannot be evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CandidateError {
    #[error("malformed candidate {id}: no coordinate and no center")]
    MissingCoordinate { id: String },

    #[error("malformed candidate {id}: non-finite coordinate")]
    NonFiniteCoordinate { id: String },
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("location not found: {0}")]
    NotFound(String),

    #[error("geocoder request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("geocoder returned an unusable coordinate for {query}: {value}")]
    InvalidCoordinate { query: String, value: String },
}

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("routing provider error: {message}")]
    Provider { code: Option<i64>, message: String },

    #[error("routing provider returned no route")]
    EmptyRoute,

    #[error("routing provider returned an invalid route: {0}")]
    Geometry(#[from] GeometryError),

    #[error("routing request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not decode routing response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure fetching candidates for one category.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("points-of-interest request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("points-of-interest source answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode points-of-interest response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("could not serialize map data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("could not write map: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that halt a whole planning run.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("could not resolve {role}: {source}")]
    Geocode {
        role: &'static str,
        #[source]
        source: GeocodeError,
    },

    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error(transparent)]
    InvalidGeometry(#[from] GeometryError),
}
