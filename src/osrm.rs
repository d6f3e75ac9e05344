//! OSRM HTTP adapter for route metrics and duration tables.

use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::OsrmConfig;
use crate::error::GeoError;
use crate::model::{DurationMatrix, RouteMetrics};
use crate::polyline::Polyline;

/// OSRM codes meaning the request was understood but nothing is routable.
const NO_ROUTE_CODES: &[&str] = &["NoRoute", "NoTable", "NoSegment", "NoMatch", "NoTrips"];

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Metrics of the open path through `points`, in the given order.
    ///
    /// Fewer than two points yields zero metrics without a request.
    pub fn route(&self, points: &[(f64, f64)]) -> Result<RouteMetrics, GeoError> {
        if points.len() < 2 {
            return Ok(RouteMetrics::default());
        }

        let response: RouteResponse = self.fetch(&self.route_url(points), points.len())?;
        parse_route(response)
    }

    /// All-pairs durations aligned with `points`.
    pub fn table(&self, points: &[(f64, f64)]) -> Result<DurationMatrix, GeoError> {
        match points.len() {
            0 => return DurationMatrix::from_rows(Vec::new()),
            1 => return DurationMatrix::from_seconds(vec![vec![0.0]]),
            _ => {}
        }

        let response: TableResponse = self.fetch(&self.table_url(points), points.len())?;
        parse_table(response, points.len())
    }

    pub fn route_url(&self, points: &[(f64, f64)]) -> String {
        format!(
            "{}/route/v1/{}/{}?overview=full&geometries=geojson&steps=false",
            self.base_url(),
            self.config.profile,
            coordinate_path(points)
        )
    }

    pub fn table_url(&self, points: &[(f64, f64)]) -> String {
        format!(
            "{}/table/v1/{}/{}?annotations=duration",
            self.base_url(),
            self.config.profile,
            coordinate_path(points)
        )
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn fetch<T: DeserializeOwned>(&self, url: &str, point_count: usize) -> Result<T, GeoError> {
        let started = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| request_error(&err))?;

        let status = response.status();
        let body = response.text().map_err(|err| request_error(&err))?;
        debug!(
            points = point_count,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "osrm response"
        );

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|err| {
            warn!(error = %err, "osrm response did not parse");
            GeoError::UpstreamUnavailable(format!("malformed OSRM response: {}", err))
        })
    }
}

/// `lng,lat;lng,lat;...` as OSRM expects.
fn coordinate_path(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(lat, lng)| format!("{:.6},{:.6}", lng, lat))
        .collect::<Vec<_>>()
        .join(";")
}

fn request_error(err: &reqwest::Error) -> GeoError {
    if err.is_timeout() {
        GeoError::UpstreamUnavailable(format!("OSRM request timed out: {}", err))
    } else {
        GeoError::UpstreamUnavailable(format!("OSRM request failed: {}", err))
    }
}

/// OSRM reports unroutable input as HTTP 400 with a `NoRoute`-style code.
fn status_error(status: StatusCode, body: &str) -> GeoError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) if is_no_route(&err.code) => {
            GeoError::NoRouteFound(err.message.unwrap_or(err.code))
        }
        Ok(err) => GeoError::UpstreamUnavailable(format!(
            "OSRM returned {}: {} {}",
            status,
            err.code,
            err.message.unwrap_or_default()
        )),
        Err(_) => GeoError::UpstreamUnavailable(format!("OSRM returned {}", status)),
    }
}

fn is_no_route(code: &str) -> bool {
    NO_ROUTE_CODES.contains(&code)
}

fn check_code(code: &str, message: Option<String>) -> Result<(), GeoError> {
    if code == "Ok" {
        return Ok(());
    }
    let message = message.unwrap_or_else(|| code.to_string());
    if is_no_route(code) {
        Err(GeoError::NoRouteFound(message))
    } else {
        Err(GeoError::UpstreamUnavailable(message))
    }
}

pub(crate) fn parse_route(response: RouteResponse) -> Result<RouteMetrics, GeoError> {
    check_code(&response.code, response.message)?;

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| GeoError::NoRouteFound("OSRM returned no routes".to_string()))?;

    let geometry = route
        .geometry
        .map(|geometry| Polyline::from_geojson(&geometry.coordinates))
        .unwrap_or_default();

    Ok(RouteMetrics::new(route.distance.max(0.0), route.duration.max(0.0)).with_geometry(geometry))
}

pub(crate) fn parse_table(
    response: TableResponse,
    expected: usize,
) -> Result<DurationMatrix, GeoError> {
    check_code(&response.code, response.message)?;

    let rows = response
        .durations
        .ok_or_else(|| GeoError::NoRouteFound("OSRM returned no duration matrix".to_string()))?;

    if rows.len() != expected {
        return Err(GeoError::NoRouteFound(format!(
            "OSRM returned {} matrix rows for {} points",
            rows.len(),
            expected
        )));
    }

    DurationMatrix::from_rows(rows)
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
    geometry: Option<GeoJsonLine>,
}

#[derive(Debug, Deserialize)]
struct GeoJsonLine {
    coordinates: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TableResponse {
    code: String,
    message: Option<String>,
    durations: Option<Vec<Vec<Option<f64>>>>,
}
