//! Planner and service configuration.

use std::env;

use crate::aggregate::AggregateOptions;
use crate::models::{Category, VehicleConstraints};
use crate::nominatim::NominatimConfig;
use crate::ors::OrsConfig;
use crate::overpass::OverpassConfig;
use crate::proximity::ProximityOptions;

/// Parameters of one planning run.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub proximity: ProximityOptions,
    pub categories: Vec<Category>,
    pub vehicle: VehicleConstraints,
    pub parallel_fetch: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            proximity: ProximityOptions::default(),
            categories: vec![Category::Fuel],
            vehicle: VehicleConstraints::default(),
            parallel_fetch: true,
        }
    }
}

impl PlannerConfig {
    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            proximity: self.proximity.clone(),
            parallel_fetch: self.parallel_fetch,
        }
    }
}

/// Endpoints and credentials for the HTTP collaborators.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub ors: OrsConfig,
    pub nominatim: NominatimConfig,
    pub overpass: OverpassConfig,
}

impl ServiceConfig {
    /// Reads `ORS_API_KEY`, `ORS_BASE_URL`, `NOMINATIM_URL`, `OVERPASS_URL`,
    /// `HTTP_TIMEOUT_SECS` and `PLANNER_USER_AGENT`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut ors = OrsConfig::default();
        let mut nominatim = NominatimConfig::default();
        let mut overpass = OverpassConfig::default();

        if let Some(key) = lookup("ORS_API_KEY") {
            ors.api_key = key;
        }
        if let Some(url) = lookup("ORS_BASE_URL") {
            ors.base_url = url;
        }
        if let Some(url) = lookup("NOMINATIM_URL") {
            nominatim.base_url = url;
        }
        if let Some(agent) = lookup("PLANNER_USER_AGENT") {
            nominatim.user_agent = agent;
        }
        if let Some(url) = lookup("OVERPASS_URL") {
            overpass.base_url = url;
        }
        if let Some(secs) = lookup("HTTP_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            ors.timeout_secs = secs;
            nominatim.timeout_secs = secs;
            overpass.timeout_secs = secs;
        }

        Self {
            ors,
            nominatim,
            overpass,
        }
    }
}
