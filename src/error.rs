//! Error types for external metrics calls and planning runs.

use std::fmt;

use thiserror::Error;

use crate::model::DepotId;

/// Failure of a routing or matrix call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Network failure, timeout, or non-2xx status.
    #[error("upstream routing service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Upstream answered but had no usable route or matrix.
    #[error("no route found: {0}")]
    NoRouteFound(String),
}

/// Stage of a planning run that called out to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStage {
    Matrix,
    Metrics,
}

impl fmt::Display for PlanStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanStage::Matrix => f.write_str("duration matrix"),
            PlanStage::Metrics => f.write_str("route metrics"),
        }
    }
}

/// Coarse classification used to choose a user-facing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    UpstreamUnavailable,
    NoRouteFound,
    Store,
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{stage} request failed{}: {source}", depot_suffix(.depot))]
    Geo {
        stage: PlanStage,
        depot: Option<DepotId>,
        #[source]
        source: GeoError,
    },

    #[error("every ordering from depot {depot} crosses an unreachable leg")]
    UnreachableRoute { depot: DepotId },

    #[error("failed to store plan: {0}")]
    Store(String),
}

impl PlanError {
    pub(crate) fn geo(stage: PlanStage, depot: Option<DepotId>, source: GeoError) -> Self {
        Self::Geo {
            stage,
            depot,
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PlanError::InvalidInput(_) => ErrorKind::InvalidInput,
            PlanError::Geo { source, .. } => match source {
                GeoError::UpstreamUnavailable(_) => ErrorKind::UpstreamUnavailable,
                GeoError::NoRouteFound(_) => ErrorKind::NoRouteFound,
            },
            PlanError::UnreachableRoute { .. } => ErrorKind::NoRouteFound,
            PlanError::Store(_) => ErrorKind::Store,
        }
    }

    /// The provider error behind this failure, if any.
    pub fn geo_source(&self) -> Option<&GeoError> {
        match self {
            PlanError::Geo { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn depot_suffix(depot: &Option<DepotId>) -> String {
    depot
        .map(|id| format!(" for depot {}", id))
        .unwrap_or_default()
}
