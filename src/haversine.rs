//! Offline metrics provider (fallback when no routing service is reachable).
//!
//! Uses great-circle distance to estimate travel time.
//! Less accurate than OSRM (ignores roads) but always available. Live traffic
//! is never available offline.

use crate::error::GeoError;
use crate::model::{DurationMatrix, RouteMetrics, TrafficEstimate};
use crate::polyline::Polyline;
use crate::traits::GeoMetricsProvider;

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle metrics provider.
#[derive(Debug, Clone)]
pub struct HaversineMetrics {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineMetrics {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineMetrics {
    /// Non-positive or non-finite speeds fall back to the default.
    pub fn new(speed_kmh: f64) -> Self {
        Self {
            speed_kmh: usable_speed(speed_kmh),
        }
    }

    /// Great-circle distance between two (lat, lng) points in meters.
    pub fn distance_m(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lng1) = from;
        let (lat2, lng2) = to;

        let lat1_rad = lat1.to_radians();
        let lat2_rad = lat2.to_radians();
        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lng = (lng2 - lng1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c * 1000.0
    }

    fn seconds_for(&self, meters: f64) -> f64 {
        meters / 1000.0 / usable_speed(self.speed_kmh) * 3600.0
    }
}

fn usable_speed(speed_kmh: f64) -> f64 {
    if speed_kmh.is_finite() && speed_kmh > 0.0 {
        speed_kmh
    } else {
        DEFAULT_SPEED_KMH
    }
}

impl GeoMetricsProvider for HaversineMetrics {
    fn route_metrics(&self, points: &[(f64, f64)]) -> Result<RouteMetrics, GeoError> {
        if points.len() < 2 {
            return Ok(RouteMetrics::default());
        }

        let distance: f64 = points
            .windows(2)
            .map(|leg| Self::distance_m(leg[0], leg[1]))
            .sum();

        Ok(RouteMetrics::new(distance, self.seconds_for(distance))
            .with_geometry(Polyline::new(points.to_vec())))
    }

    fn duration_matrix(&self, points: &[(f64, f64)]) -> Result<DurationMatrix, GeoError> {
        let rows = points
            .iter()
            .map(|from| {
                points
                    .iter()
                    .map(|to| self.seconds_for(Self::distance_m(*from, *to)))
                    .collect()
            })
            .collect();

        DurationMatrix::from_seconds(rows)
    }

    fn traffic_estimate(&self, _points: &[(f64, f64)]) -> TrafficEstimate {
        TrafficEstimate::unavailable("traffic service not available offline")
    }
}
