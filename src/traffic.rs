//! Traffic-aware ETA client.
//!
//! Talks to a directions endpoint that takes an origin, a destination, and
//! ordered intermediate waypoints, and reports per-leg free-flow and
//! in-traffic durations. Every failure is folded into
//! [`TrafficEstimate::Unavailable`]; callers never see an error from here.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::TrafficConfig;
use crate::model::TrafficEstimate;

#[derive(Debug, Clone)]
pub struct TrafficClient {
    config: TrafficConfig,
    client: reqwest::blocking::Client,
}

impl TrafficClient {
    pub fn new(config: TrafficConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn estimate(&self, points: &[(f64, f64)]) -> TrafficEstimate {
        if points.len() < 2 {
            return TrafficEstimate::unavailable("at least two points are required");
        }

        let Some(key) = self.config.api_key.as_deref() else {
            return TrafficEstimate::unavailable("traffic API key not configured");
        };

        match self.fetch(points, key) {
            Ok(response) => parse_directions(response),
            Err(reason) => {
                warn!(%reason, "traffic request failed");
                TrafficEstimate::unavailable(reason)
            }
        }
    }

    fn fetch(&self, points: &[(f64, f64)], key: &str) -> Result<DirectionsResponse, String> {
        let started = Instant::now();
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&directions_query(points, key))
            .send()
            .map_err(|err| {
                if err.is_timeout() {
                    format!("traffic request timed out: {}", err.without_url())
                } else {
                    format!("traffic request failed: {}", err.without_url())
                }
            })?;

        let status = response.status();
        debug!(
            points = points.len(),
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "traffic response"
        );
        if !status.is_success() {
            return Err(format!("traffic service returned {}", status));
        }

        response
            .json::<DirectionsResponse>()
            .map_err(|err| format!("malformed traffic response: {}", err.without_url()))
    }
}

/// Query parameters for the directions endpoint.
fn directions_query(points: &[(f64, f64)], key: &str) -> Vec<(&'static str, String)> {
    let (first, rest) = match points.split_first() {
        Some(split) => split,
        None => return Vec::new(),
    };
    let (last, middle) = rest.split_last().unwrap_or((first, &[]));

    let mut query = vec![
        ("origin", lat_lng(*first)),
        ("destination", lat_lng(*last)),
    ];
    if !middle.is_empty() {
        let waypoints = middle
            .iter()
            .map(|point| lat_lng(*point))
            .collect::<Vec<_>>()
            .join("|");
        query.push(("waypoints", waypoints));
    }
    query.push(("departure_time", "now".to_string()));
    query.push(("key", key.to_string()));
    query
}

fn lat_lng((lat, lng): (f64, f64)) -> String {
    format!("{:.6},{:.6}", lat, lng)
}

/// Sum the legs of the first route.
///
/// Upstream sometimes leaves out traffic figures without flagging an error,
/// so a leg without a positive in-traffic duration counts at its free-flow
/// duration. A route without free-flow figures is reported as unavailable.
pub(crate) fn parse_directions(response: DirectionsResponse) -> TrafficEstimate {
    if response.status != "OK" {
        let detail = response.error_message.unwrap_or_default();
        return TrafficEstimate::unavailable(
            format!("traffic service returned {} {}", response.status, detail)
                .trim_end()
                .to_string(),
        );
    }

    let Some(route) = response.routes.into_iter().next() else {
        return TrafficEstimate::unavailable("traffic service returned no routes");
    };
    if route.legs.is_empty() {
        return TrafficEstimate::unavailable("traffic service returned no legs");
    }

    let mut traffic = 0.0;
    let mut free_flow = 0.0;
    let mut distance = 0.0;
    for leg in &route.legs {
        let leg_free_flow = leg.duration.as_ref().map_or(0.0, |v| v.value);
        let leg_traffic = leg
            .duration_in_traffic
            .as_ref()
            .map(|v| v.value)
            .filter(|secs| *secs > 0.0)
            .unwrap_or(leg_free_flow);

        traffic += leg_traffic;
        free_flow += leg_free_flow;
        distance += leg.distance.as_ref().map_or(0.0, |v| v.value);
    }

    if free_flow <= 0.0 {
        return TrafficEstimate::unavailable("traffic service returned no leg durations");
    }

    TrafficEstimate::Available {
        traffic_duration: traffic,
        free_flow_duration: free_flow,
        distance,
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    distance: Option<TextValue>,
    duration: Option<TextValue>,
    duration_in_traffic: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: f64,
}
