//! truckstop-planner
//!
//! Finds fuel stations, restaurants and lodging within a lateral distance
//! of a heavy-vehicle route.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod geometry;
pub mod models;
pub mod nominatim;
pub mod ors;
pub mod overpass;
pub mod planner;
pub mod polyline;
pub mod proximity;
pub mod render;
pub mod traits;
