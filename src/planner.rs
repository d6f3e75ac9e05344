//! Route planner: the baseline and optimized plans for one route.

use jiff::Timestamp;
use tracing::{info, info_span};

use crate::blend::traffic_for;
use crate::config::PlannerConfig;
use crate::depot::{DepotSelector, anchored_points};
use crate::error::{PlanError, PlanStage};
use crate::model::{Depot, PlanKind, PlanResult};
use crate::traits::{GeoMetricsProvider, PlanStore, Stop};

pub struct RoutePlanner<P> {
    config: PlannerConfig,
    provider: P,
}

impl<P> RoutePlanner<P>
where
    P: GeoMetricsProvider + Sync,
{
    pub fn new(config: PlannerConfig, provider: P) -> Self {
        Self { config, provider }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Route from the baseline depot through the stops in the given order.
    pub fn compute_baseline<S>(&self, stops: &[S]) -> Result<PlanResult<S::Id>, PlanError>
    where
        S: Stop,
    {
        let _span = info_span!("baseline", stops = stops.len()).entered();
        validate_stops(stops)?;
        let depot = self.baseline_depot()?;
        validate_depot(depot)?;

        let points = anchored_points(depot, stops.iter().map(Stop::location));
        let metrics = self
            .provider
            .route_metrics(&points)
            .map_err(|err| PlanError::geo(PlanStage::Metrics, Some(depot.id), err))?;
        let traffic = traffic_for(&self.provider, &points);

        info!(
            depot = depot.id,
            duration = metrics.duration,
            distance = metrics.distance,
            traffic = traffic.is_available(),
            "computed baseline"
        );

        Ok(PlanResult {
            kind: PlanKind::Baseline,
            depot: depot.clone(),
            order: stops.iter().map(|stop| stop.id().clone()).collect(),
            metrics,
            traffic,
            computed_at: Timestamp::now(),
        })
    }

    /// Best depot and visiting order over every configured depot.
    pub fn compute_optimized<S>(&self, stops: &[S]) -> Result<PlanResult<S::Id>, PlanError>
    where
        S: Stop + Sync,
        S::Id: Send,
    {
        let _span = info_span!("optimize", stops = stops.len()).entered();
        validate_stops(stops)?;
        if self.config.depots.is_empty() {
            return Err(PlanError::InvalidInput(
                "no candidate depots configured".to_string(),
            ));
        }
        for depot in &self.config.depots {
            validate_depot(depot)?;
        }

        let selector = DepotSelector::from_config(&self.config);
        let winner = selector.select(&self.config.depots, stops, &self.provider)?;
        let traffic = traffic_for(&self.provider, &winner.points);

        info!(
            depot = winner.depot.id,
            duration = winner.metrics.duration,
            traffic = traffic.is_available(),
            "computed optimized plan"
        );

        Ok(PlanResult {
            kind: PlanKind::Optimized,
            depot: winner.depot,
            order: winner.order,
            metrics: winner.metrics,
            traffic,
            computed_at: Timestamp::now(),
        })
    }

    /// Compute a plan of `kind` and hand it to `store` under `route_id`.
    ///
    /// Nothing is stored when planning fails.
    pub fn plan_and_store<S, R, T>(
        &self,
        route_id: &R,
        kind: PlanKind,
        stops: &[S],
        store: &T,
    ) -> Result<PlanResult<S::Id>, PlanError>
    where
        S: Stop + Sync,
        S::Id: Send,
        T: PlanStore<R, S::Id> + ?Sized,
    {
        let result = match kind {
            PlanKind::Baseline => self.compute_baseline(stops)?,
            PlanKind::Optimized => self.compute_optimized(stops)?,
        };

        store
            .store(route_id, &result)
            .map_err(|err| PlanError::Store(err.to_string()))?;

        Ok(result)
    }

    fn baseline_depot(&self) -> Result<&Depot, PlanError> {
        self.config.baseline().ok_or_else(|| {
            PlanError::InvalidInput(format!(
                "baseline depot {} is not configured",
                self.config.baseline_depot
            ))
        })
    }
}

fn validate_stops<S: Stop>(stops: &[S]) -> Result<(), PlanError> {
    if stops.is_empty() {
        return Err(PlanError::InvalidInput(
            "at least one stop is required".to_string(),
        ));
    }

    for (index, stop) in stops.iter().enumerate() {
        if let Err(problem) = check_coordinate(stop.location()) {
            return Err(PlanError::InvalidInput(format!("stop {}: {}", index, problem)));
        }
    }
    Ok(())
}

fn validate_depot(depot: &Depot) -> Result<(), PlanError> {
    check_coordinate(depot.location())
        .map_err(|problem| PlanError::InvalidInput(format!("depot {}: {}", depot.id, problem)))
}

fn check_coordinate((lat, lng): (f64, f64)) -> Result<(), String> {
    if !lat.is_finite() || !lng.is_finite() {
        return Err(format!("coordinate ({}, {}) is not numeric", lat, lng));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {} is out of range", lat));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(format!("longitude {} is out of range", lng));
    }
    Ok(())
}
