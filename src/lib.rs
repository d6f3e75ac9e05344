//! route-planner core
//!
//! Picks a depot and a visiting order for a single-vehicle open route, and
//! measures it against the unoptimized baseline.

pub mod traits;
pub mod model;
pub mod error;
pub mod config;
pub mod osrm;
pub mod traffic;
pub mod geo;
pub mod haversine;
pub mod polyline;
pub mod sequencing;
pub mod depot;
pub mod blend;
pub mod planner;
pub mod report;
pub mod store;
