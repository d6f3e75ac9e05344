//! Savings of an optimized plan over its baseline.

use serde::Serialize;

use crate::model::PlanResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanComparison {
    pub baseline_distance_m: f64,
    pub optimized_distance_m: f64,
    pub distance_saved_m: f64,
    pub distance_saved_pct: Option<f64>,
    pub baseline_time_s: Option<f64>,
    pub optimized_time_s: Option<f64>,
    pub time_saved_s: Option<f64>,
    pub time_saved_pct: Option<f64>,
}

impl PlanComparison {
    /// Compare two plans for the same stops. Times use each plan's
    /// authoritative duration; unknown times leave the time savings unset.
    pub fn between<A, B>(baseline: &PlanResult<A>, optimized: &PlanResult<B>) -> Self {
        let baseline_distance_m = baseline.metrics.distance;
        let optimized_distance_m = optimized.metrics.distance;
        let baseline_time_s = baseline.authoritative_time();
        let optimized_time_s = optimized.authoritative_time();

        let time_saved_s = match (baseline_time_s, optimized_time_s) {
            (Some(base), Some(opt)) => Some(base - opt),
            _ => None,
        };
        let time_saved_pct = match (baseline_time_s, optimized_time_s) {
            (Some(base), Some(opt)) => saved_pct(base, opt),
            _ => None,
        };

        Self {
            baseline_distance_m,
            optimized_distance_m,
            distance_saved_m: baseline_distance_m - optimized_distance_m,
            distance_saved_pct: saved_pct(baseline_distance_m, optimized_distance_m),
            baseline_time_s,
            optimized_time_s,
            time_saved_s,
            time_saved_pct,
        }
    }
}

/// `(base - value) / base * 100`, undefined for a non-positive base.
fn saved_pct(base: f64, value: f64) -> Option<f64> {
    if base > 0.0 && base.is_finite() && value.is_finite() {
        Some((base - value) / base * 100.0)
    } else {
        None
    }
}
