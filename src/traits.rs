//! Core seams for the route planner.
//!
//! Stops are owned by the caller, so the planner only sees them through the
//! [`Stop`] trait. External services sit behind [`GeoMetricsProvider`] and
//! persistence behind [`PlanStore`].

use std::error::Error;
use std::hash::Hash;

use crate::error::GeoError;
use crate::model::{DurationMatrix, PlanResult, RouteMetrics, TrafficEstimate};

/// Unique identifier for planner entities.
pub trait Id: Clone + Eq + Hash {}

impl<T> Id for T where T: Clone + Eq + Hash {}

/// A delivery location to be visited on a route.
pub trait Stop {
    type Id: Id;

    fn id(&self) -> &Self::Id;

    /// Location coordinates (lat, lng).
    fn location(&self) -> (f64, f64);

    /// Demand carried through to results; never enforced.
    fn demand(&self) -> Option<f64> {
        None
    }

    /// Time window (from, to) as stored; never enforced.
    fn time_window(&self) -> Option<(&str, &str)> {
        None
    }
}

/// Routing and traffic metrics for ordered coordinate lists.
///
/// Every method takes points as (lat, lng) in visiting order. Matrices are
/// indexed by the provided point order.
pub trait GeoMetricsProvider {
    /// Distance and duration of the open path through `points`, in order.
    fn route_metrics(&self, points: &[(f64, f64)]) -> Result<RouteMetrics, GeoError>;

    /// All-pairs travel durations in seconds.
    fn duration_matrix(&self, points: &[(f64, f64)]) -> Result<DurationMatrix, GeoError>;

    /// Live traffic estimate for the path. Failures are reported inside the
    /// returned value, never as an error.
    fn traffic_estimate(&self, points: &[(f64, f64)]) -> TrafficEstimate;
}

impl<P: GeoMetricsProvider + ?Sized> GeoMetricsProvider for &P {
    fn route_metrics(&self, points: &[(f64, f64)]) -> Result<RouteMetrics, GeoError> {
        (**self).route_metrics(points)
    }

    fn duration_matrix(&self, points: &[(f64, f64)]) -> Result<DurationMatrix, GeoError> {
        (**self).duration_matrix(points)
    }

    fn traffic_estimate(&self, points: &[(f64, f64)]) -> TrafficEstimate {
        (**self).traffic_estimate(points)
    }
}

/// Receives finished plans keyed by route identity.
pub trait PlanStore<RouteId, StopId> {
    fn store(
        &self,
        route_id: &RouteId,
        result: &PlanResult<StopId>,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}
