//! Networked [`GeoMetricsProvider`] backed by OSRM and the traffic service.

use crate::config::PlannerConfig;
use crate::error::GeoError;
use crate::model::{DurationMatrix, RouteMetrics, TrafficEstimate};
use crate::osrm::OsrmClient;
use crate::traffic::TrafficClient;
use crate::traits::GeoMetricsProvider;

#[derive(Debug, Clone)]
pub struct HttpGeoMetrics {
    routing: OsrmClient,
    traffic: TrafficClient,
}

impl HttpGeoMetrics {
    pub fn new(routing: OsrmClient, traffic: TrafficClient) -> Self {
        Self { routing, traffic }
    }

    pub fn from_config(config: &PlannerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            routing: OsrmClient::new(config.osrm.clone())?,
            traffic: TrafficClient::new(config.traffic.clone())?,
        })
    }
}

impl GeoMetricsProvider for HttpGeoMetrics {
    fn route_metrics(&self, points: &[(f64, f64)]) -> Result<RouteMetrics, GeoError> {
        self.routing.route(points)
    }

    fn duration_matrix(&self, points: &[(f64, f64)]) -> Result<DurationMatrix, GeoError> {
        self.routing.table(points)
    }

    fn traffic_estimate(&self, points: &[(f64, f64)]) -> TrafficEstimate {
        self.traffic.estimate(points)
    }
}
