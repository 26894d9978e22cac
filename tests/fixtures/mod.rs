//! Test fixtures for truckstop-planner.
//!
//! Provides:
//! - A Fortaleza → Parauapebas corridor with stops on and off the route
//! - In-memory geocoder, router and point source

#![allow(dead_code)]

pub mod brazil_corridor;
pub mod collaborators;

pub use brazil_corridor::*;
pub use collaborators::*;
