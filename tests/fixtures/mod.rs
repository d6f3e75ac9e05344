//! Test fixtures for route-planner.
//!
//! Provides:
//! - Approximate Riga locations
//! - A scripted in-process metrics provider that records every call

#![allow(dead_code)]

pub mod riga_locations;

use std::collections::HashMap;
use std::sync::Mutex;

use route_planner::error::GeoError;
use route_planner::model::{DeliveryStop, Depot, DurationMatrix, RouteMetrics, TrafficEstimate};
use route_planner::traits::GeoMetricsProvider;

/// Seconds per degree of Manhattan distance in the scripted geometry.
pub const SECONDS_PER_DEGREE: f64 = 100.0;

/// Meters per degree of Manhattan distance in the scripted geometry.
pub const METERS_PER_DEGREE: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Matrix(Vec<(f64, f64)>),
    Metrics(Vec<(f64, f64)>),
    Traffic(Vec<(f64, f64)>),
}

/// Provider on a flat plane: durations and distances are Manhattan distance
/// scaled by [`SECONDS_PER_DEGREE`] and [`METERS_PER_DEGREE`].
///
/// Failures are scripted per depot, keyed by the first point of a request.
pub struct ScriptedGeo {
    matrix: Option<DurationMatrix>,
    matrix_failures: HashMap<String, GeoError>,
    metrics_failures: HashMap<String, GeoError>,
    traffic: TrafficEstimate,
    calls: Mutex<Vec<Call>>,
}

impl Default for ScriptedGeo {
    fn default() -> Self {
        Self {
            matrix: None,
            matrix_failures: HashMap::new(),
            metrics_failures: HashMap::new(),
            traffic: TrafficEstimate::unavailable("traffic not scripted"),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedGeo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer matrix requests with `matrix`.
    pub fn with_matrix(mut self, matrix: DurationMatrix) -> Self {
        self.matrix = Some(matrix);
        self
    }

    pub fn with_traffic(mut self, traffic: TrafficEstimate) -> Self {
        self.traffic = traffic;
        self
    }

    pub fn fail_matrix_from(mut self, origin: (f64, f64), error: GeoError) -> Self {
        self.matrix_failures.insert(location_key(origin), error);
        self
    }

    pub fn fail_metrics_from(mut self, origin: (f64, f64), error: GeoError) -> Self {
        self.metrics_failures.insert(location_key(origin), error);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn metrics_calls(&self) -> Vec<Vec<(f64, f64)>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Metrics(points) => Some(points),
                _ => None,
            })
            .collect()
    }

    pub fn traffic_calls(&self) -> Vec<Vec<(f64, f64)>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Traffic(points) => Some(points),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn scripted_failure(
        failures: &HashMap<String, GeoError>,
        points: &[(f64, f64)],
    ) -> Option<GeoError> {
        points
            .first()
            .and_then(|origin| failures.get(&location_key(*origin)))
            .cloned()
    }
}

impl GeoMetricsProvider for ScriptedGeo {
    fn route_metrics(&self, points: &[(f64, f64)]) -> Result<RouteMetrics, GeoError> {
        self.record(Call::Metrics(points.to_vec()));
        if let Some(err) = Self::scripted_failure(&self.metrics_failures, points) {
            return Err(err);
        }

        let degrees: f64 = points.windows(2).map(|leg| manhattan(leg[0], leg[1])).sum();
        Ok(RouteMetrics::new(
            degrees * METERS_PER_DEGREE,
            degrees * SECONDS_PER_DEGREE,
        ))
    }

    fn duration_matrix(&self, points: &[(f64, f64)]) -> Result<DurationMatrix, GeoError> {
        self.record(Call::Matrix(points.to_vec()));
        if let Some(err) = Self::scripted_failure(&self.matrix_failures, points) {
            return Err(err);
        }
        if let Some(matrix) = &self.matrix {
            return Ok(matrix.clone());
        }

        let rows = points
            .iter()
            .map(|from| {
                points
                    .iter()
                    .map(|to| manhattan(*from, *to) * SECONDS_PER_DEGREE)
                    .collect()
            })
            .collect();
        DurationMatrix::from_seconds(rows)
    }

    fn traffic_estimate(&self, points: &[(f64, f64)]) -> TrafficEstimate {
        self.record(Call::Traffic(points.to_vec()));
        self.traffic.clone()
    }
}

pub fn manhattan(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).abs() + (a.1 - b.1).abs()
}

fn location_key(location: (f64, f64)) -> String {
    format!("{:.6},{:.6}", location.0, location.1)
}

pub fn stop(id: u64, lat: f64, lon: f64) -> DeliveryStop<u64> {
    DeliveryStop::new(id, lat, lon)
}

pub fn depot(id: u32, lat: f64, lng: f64) -> Depot {
    Depot::new(id, format!("Depot {}", id), lat, lng)
}
