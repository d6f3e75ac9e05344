//! Route geometry as decoded coordinate sequences.
//!
//! Routing services answer in GeoJSON order (lon, lat); the planner stores
//! (lat, lng) like every other coordinate in the crate.

use serde::{Deserialize, Serialize};

/// Geometry of a realized route.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    /// Creates a polyline from (lat, lng) points.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Creates a polyline from GeoJSON `[lon, lat]` positions.
    ///
    /// Positions with fewer than two components are skipped.
    pub fn from_geojson(coordinates: &[Vec<f64>]) -> Self {
        let points = coordinates
            .iter()
            .filter_map(|position| match position.as_slice() {
                [lon, lat, ..] => Some((*lat, *lon)),
                _ => None,
            })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }
}
