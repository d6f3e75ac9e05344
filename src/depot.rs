//! Depot selection: sequence the stops from every candidate depot and keep the
//! fastest realized route.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::{PlannerConfig, SequencingOptions, UnreachablePolicy};
use crate::error::{GeoError, PlanError, PlanStage};
use crate::model::{Depot, RouteMetrics};
use crate::sequencing::sequence;
use crate::traits::{GeoMetricsProvider, Stop};

/// One depot's best ordering and its authoritative metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct DepotCandidate<StopId> {
    pub depot: Depot,
    /// Stop identities in visiting order.
    pub order: Vec<StopId>,
    /// Stop coordinates in visiting order, depot first.
    pub points: Vec<(f64, f64)>,
    pub metrics: RouteMetrics,
    /// Cost of the ordering under the duration matrix.
    pub matrix_cost: f64,
}

#[derive(Debug, Clone, Default)]
pub struct DepotSelector {
    pub sequencing: SequencingOptions,
    pub unreachable: UnreachablePolicy,
    pub parallel: bool,
}

impl DepotSelector {
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            sequencing: config.sequencing.clone(),
            unreachable: config.unreachable,
            parallel: config.parallel_depots,
        }
    }

    /// Evaluate every depot and return the one with the shortest duration.
    ///
    /// Ties keep the earliest depot in `depots`. Any failed evaluation aborts
    /// the whole selection.
    pub fn select<S, P>(
        &self,
        depots: &[Depot],
        stops: &[S],
        provider: &P,
    ) -> Result<DepotCandidate<S::Id>, PlanError>
    where
        S: Stop + Sync,
        S::Id: Send,
        P: GeoMetricsProvider + Sync,
    {
        let candidates = self.evaluate_all(depots, stops, provider)?;
        let winner = pick_fastest(candidates)
            .ok_or_else(|| PlanError::InvalidInput("no candidate depots configured".to_string()))?;

        info!(
            depot = winner.depot.id,
            duration = winner.metrics.duration,
            distance = winner.metrics.distance,
            "selected depot"
        );
        Ok(winner)
    }

    /// Candidates for every depot, in the order of `depots`.
    pub fn evaluate_all<S, P>(
        &self,
        depots: &[Depot],
        stops: &[S],
        provider: &P,
    ) -> Result<Vec<DepotCandidate<S::Id>>, PlanError>
    where
        S: Stop + Sync,
        S::Id: Send,
        P: GeoMetricsProvider + Sync,
    {
        if self.parallel {
            depots
                .par_iter()
                .map(|depot| self.evaluate(depot, stops, provider))
                .collect()
        } else {
            depots
                .iter()
                .map(|depot| self.evaluate(depot, stops, provider))
                .collect()
        }
    }

    /// Sequence `stops` from `depot` and fetch metrics for the resulting path.
    pub fn evaluate<S, P>(
        &self,
        depot: &Depot,
        stops: &[S],
        provider: &P,
    ) -> Result<DepotCandidate<S::Id>, PlanError>
    where
        S: Stop,
        P: GeoMetricsProvider,
    {
        let points = anchored_points(depot, stops.iter().map(Stop::location));

        let matrix = provider
            .duration_matrix(&points)
            .map_err(|err| PlanError::geo(PlanStage::Matrix, Some(depot.id), err))?;
        if matrix.len() != points.len() {
            return Err(PlanError::geo(
                PlanStage::Matrix,
                Some(depot.id),
                GeoError::NoRouteFound(format!(
                    "matrix has {} rows for {} points",
                    matrix.len(),
                    points.len()
                )),
            ));
        }

        let sequenced = sequence(&matrix, &self.sequencing);
        let order = sequenced.order;
        if !order.is_reachable() {
            match self.unreachable {
                UnreachablePolicy::Reject => {
                    return Err(PlanError::UnreachableRoute { depot: depot.id });
                }
                UnreachablePolicy::Allow => {
                    warn!(depot = depot.id, "best ordering crosses an unreachable leg");
                }
            }
        }

        // Node i maps to stops[i - 1]; node 0 is the depot.
        let stop_ids = order
            .stops()
            .iter()
            .map(|&node| stops[node - 1].id().clone())
            .collect();
        let ordered_points: Vec<(f64, f64)> = order.nodes().iter().map(|&node| points[node]).collect();

        let metrics = provider
            .route_metrics(&ordered_points)
            .map_err(|err| PlanError::geo(PlanStage::Metrics, Some(depot.id), err))?;

        debug!(
            depot = depot.id,
            matrix_cost = order.cost(),
            duration = metrics.duration,
            distance = metrics.distance,
            "evaluated depot"
        );

        Ok(DepotCandidate {
            depot: depot.clone(),
            order: stop_ids,
            points: ordered_points,
            metrics,
            matrix_cost: order.cost(),
        })
    }
}

/// `[depot, stop_1, stop_2, ...]`.
pub(crate) fn anchored_points(
    depot: &Depot,
    stops: impl Iterator<Item = (f64, f64)>,
) -> Vec<(f64, f64)> {
    std::iter::once(depot.location()).chain(stops).collect()
}

/// Strictly smallest duration wins; the first one seen keeps ties.
///
/// A NaN duration ranks after every number.
pub fn pick_fastest<StopId>(
    candidates: Vec<DepotCandidate<StopId>>,
) -> Option<DepotCandidate<StopId>> {
    candidates.into_iter().fold(None, |best, candidate| match best {
        Some(current) if !faster(candidate.metrics.duration, current.metrics.duration) => {
            Some(current)
        }
        _ => Some(candidate),
    })
}

fn faster(duration: f64, than: f64) -> bool {
    duration < than || (than.is_nan() && !duration.is_nan())
}
