//! Traffic blending: attach a live-traffic reading to a plan and decide which
//! duration counts.

use tracing::{debug, warn};

use crate::model::TrafficEstimate;
use crate::traits::GeoMetricsProvider;

/// Ask for a traffic reading over the realized path.
///
/// A failed reading is returned as-is for the plan to carry; the plan keeps
/// its free-flow duration either way.
pub fn traffic_for<P>(provider: &P, points: &[(f64, f64)]) -> TrafficEstimate
where
    P: GeoMetricsProvider + ?Sized,
{
    let estimate = provider.traffic_estimate(points);
    match &estimate {
        TrafficEstimate::Available {
            traffic_duration,
            free_flow_duration,
            ..
        } => debug!(traffic_duration, free_flow_duration, "traffic estimate"),
        TrafficEstimate::Unavailable { reason } => {
            warn!(%reason, "traffic unavailable, keeping free-flow duration")
        }
    }
    estimate
}

/// The duration a plan is judged by.
///
/// Traffic-adjusted duration if present and positive, else the free-flow
/// duration if positive, else unknown.
pub fn authoritative_time(traffic: &TrafficEstimate, free_flow: f64) -> Option<f64> {
    traffic
        .traffic_duration()
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .or_else(|| Some(free_flow).filter(|secs| secs.is_finite() && *secs > 0.0))
}
