//! In-memory [`PlanStore`].

use std::collections::HashMap;
use std::error::Error;
use std::sync::Mutex;

use crate::model::{PlanKind, PlanResult};
use crate::traits::{Id, PlanStore};

/// Keeps the latest baseline and optimized plan per route.
#[derive(Debug)]
pub struct MemoryPlanStore<RouteId, StopId> {
    plans: Mutex<HashMap<(RouteId, PlanKind), PlanResult<StopId>>>,
}

impl<RouteId, StopId> Default for MemoryPlanStore<RouteId, StopId> {
    fn default() -> Self {
        Self {
            plans: Mutex::new(HashMap::new()),
        }
    }
}

impl<RouteId: Id, StopId: Clone> MemoryPlanStore<RouteId, StopId> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, route_id: &RouteId, kind: PlanKind) -> Option<PlanResult<StopId>> {
        let plans = self.plans.lock().ok()?;
        plans.get(&(route_id.clone(), kind)).cloned()
    }

    pub fn len(&self) -> usize {
        self.plans.lock().map(|plans| plans.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<RouteId: Id, StopId: Clone> PlanStore<RouteId, StopId> for MemoryPlanStore<RouteId, StopId> {
    fn store(
        &self,
        route_id: &RouteId,
        result: &PlanResult<StopId>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut plans = self
            .plans
            .lock()
            .map_err(|_| "plan store lock poisoned")?;
        plans.insert((route_id.clone(), result.kind), result.clone());
        Ok(())
    }
}
