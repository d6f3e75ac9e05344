//! Planner data model: depots, stops, matrices, and the plan result handed to
//! persistence.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::GeoError;
use crate::polyline::Polyline;
use crate::traits::{Id, Stop};

pub type DepotId = u32;

/// Fixed origin a route departs from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depot {
    pub id: DepotId,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl Depot {
    pub fn new(id: DepotId, name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id,
            name: name.into(),
            lat,
            lng,
        }
    }

    pub fn location(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

/// A stop as stored by the client registry.
///
/// Demand and time window are carried for display only; the sequencing
/// engine ignores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryStop<I = u64> {
    pub id: I,
    #[serde(default)]
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub demand: Option<f64>,
    #[serde(default)]
    pub time_window_from: Option<String>,
    #[serde(default)]
    pub time_window_to: Option<String>,
}

impl<I> DeliveryStop<I> {
    pub fn new(id: I, lat: f64, lon: f64) -> Self {
        Self {
            id,
            name: String::new(),
            lat,
            lon,
            demand: None,
            time_window_from: None,
            time_window_to: None,
        }
    }
}

impl<I: Id> Stop for DeliveryStop<I> {
    type Id = I;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn location(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }

    fn demand(&self) -> Option<f64> {
        self.demand
    }

    fn time_window(&self) -> Option<(&str, &str)> {
        match (&self.time_window_from, &self.time_window_to) {
            (Some(from), Some(to)) => Some((from.as_str(), to.as_str())),
            _ => None,
        }
    }
}

/// Square matrix of travel durations in seconds.
///
/// `None` marks an unreachable pair and costs `f64::INFINITY`.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationMatrix {
    rows: Vec<Vec<Option<f64>>>,
}

impl DurationMatrix {
    /// Build a matrix from raw rows.
    ///
    /// Negative and non-finite entries are stored as unreachable. Fails with
    /// [`GeoError::NoRouteFound`] when the rows do not form a square.
    pub fn from_rows(rows: Vec<Vec<Option<f64>>>) -> Result<Self, GeoError> {
        let n = rows.len();
        if let Some(bad) = rows.iter().position(|row| row.len() != n) {
            return Err(GeoError::NoRouteFound(format!(
                "duration matrix row {} has {} entries, expected {}",
                bad,
                rows[bad].len(),
                n
            )));
        }

        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| cell.filter(|v| v.is_finite() && *v >= 0.0))
                    .collect()
            })
            .collect();

        Ok(Self { rows })
    }

    /// Build a fully reachable matrix.
    pub fn from_seconds(rows: Vec<Vec<f64>>) -> Result<Self, GeoError> {
        Self::from_rows(
            rows.into_iter()
                .map(|row| row.into_iter().map(Some).collect())
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw entry; `None` when unreachable.
    pub fn get(&self, from: usize, to: usize) -> Option<f64> {
        self.rows[from][to]
    }

    /// Travel cost between two nodes, `f64::INFINITY` when unreachable.
    pub fn cost(&self, from: usize, to: usize) -> f64 {
        self.get(from, to).unwrap_or(f64::INFINITY)
    }

    /// Sum of consecutive entries along `order`.
    pub fn path_cost(&self, order: &[usize]) -> f64 {
        order
            .windows(2)
            .map(|pair| self.cost(pair[0], pair[1]))
            .sum()
    }
}

/// Metrics for a concrete path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteMetrics {
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Polyline::is_empty")]
    pub geometry: Polyline,
}

impl RouteMetrics {
    pub fn new(distance: f64, duration: f64) -> Self {
        Self {
            distance,
            duration,
            geometry: Polyline::default(),
        }
    }

    pub fn with_geometry(mut self, geometry: Polyline) -> Self {
        self.geometry = geometry;
        self
    }
}

/// Live traffic reading or the reason one could not be obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrafficEstimate {
    Available {
        /// Seconds, including congestion.
        traffic_duration: f64,
        /// Seconds, ignoring congestion.
        free_flow_duration: f64,
        /// Meters.
        distance: f64,
    },
    Unavailable {
        reason: String,
    },
}

impl TrafficEstimate {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    pub fn traffic_duration(&self) -> Option<f64> {
        match self {
            Self::Available {
                traffic_duration, ..
            } => Some(*traffic_duration),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Available { .. } => None,
            Self::Unavailable { reason } => Some(reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    Baseline,
    Optimized,
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanKind::Baseline => f.write_str("baseline"),
            PlanKind::Optimized => f.write_str("optimized"),
        }
    }
}

/// The unit handed to persistence for a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResult<StopId> {
    pub kind: PlanKind,
    pub depot: Depot,
    /// Stop identities in visiting order, depot excluded.
    pub order: Vec<StopId>,
    pub metrics: RouteMetrics,
    pub traffic: TrafficEstimate,
    pub computed_at: Timestamp,
}

impl<StopId> PlanResult<StopId> {
    /// Traffic-adjusted duration when usable, otherwise free-flow.
    pub fn authoritative_time(&self) -> Option<f64> {
        crate::blend::authoritative_time(&self.traffic, self.metrics.duration)
    }
}
