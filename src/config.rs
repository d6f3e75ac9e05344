//! Planner configuration.
//!
//! Every section has a `Default`; [`PlannerConfig::from_env`] overlays the
//! process environment on top of the defaults.

use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::model::{Depot, DepotId};

/// Timeout applied to every external call, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 12;

/// Cap on 2-opt scan rounds.
pub const DEFAULT_MAX_ROUNDS: usize = 50;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("environment variable {name} has invalid value {value:?}")]
    InvalidVar { name: &'static str, value: String },

    #[error("no depots configured")]
    NoDepots,

    #[error("baseline depot {0} is not in the depot list")]
    UnknownBaselineDepot(DepotId),

    #[error("{0} timeout must be at least one second")]
    ZeroTimeout(&'static str),
}

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrafficConfig {
    /// Directions endpoint accepting origin, destination, and waypoints.
    pub base_url: String,
    /// Missing key is a soft failure reported per call.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com/maps/api/directions/json".to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SequencingOptions {
    /// Maximum number of 2-opt scans before giving up on further improvement.
    pub max_rounds: usize,
}

impl Default for SequencingOptions {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

/// What to do when the best ordering still crosses an unreachable leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnreachablePolicy {
    /// Keep the ordering; the metrics call decides whether the path exists.
    #[default]
    Allow,
    /// Abort with [`crate::error::PlanError::UnreachableRoute`].
    Reject,
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub osrm: OsrmConfig,
    pub traffic: TrafficConfig,
    /// Candidate depots in evaluation order.
    pub depots: Vec<Depot>,
    /// Depot used for the unoptimized baseline.
    pub baseline_depot: DepotId,
    pub sequencing: SequencingOptions,
    /// Evaluate depots on the rayon pool instead of one after another.
    pub parallel_depots: bool,
    pub unreachable: UnreachablePolicy,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        let depots = default_depots();
        let baseline_depot = depots[0].id;
        Self {
            osrm: OsrmConfig::default(),
            traffic: TrafficConfig::default(),
            depots,
            baseline_depot,
            sequencing: SequencingOptions::default(),
            parallel_depots: true,
            unreachable: UnreachablePolicy::default(),
        }
    }
}

impl PlannerConfig {
    /// Defaults overlaid with `OSRM_BASE_URL`, `OSRM_PROFILE`,
    /// `ROUTING_TIMEOUT_SECS`, `TRAFFIC_BASE_URL`, `TRAFFIC_API_KEY`, and
    /// `TWO_OPT_MAX_ROUNDS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("OSRM_BASE_URL") {
            config.osrm.base_url = url;
        }
        if let Some(profile) = lookup("OSRM_PROFILE") {
            config.osrm.profile = profile;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "ROUTING_TIMEOUT_SECS")? {
            if secs == 0 {
                return Err(ConfigError::InvalidVar {
                    name: "ROUTING_TIMEOUT_SECS",
                    value: "0".to_string(),
                });
            }
            config.osrm.timeout_secs = secs;
            config.traffic.timeout_secs = secs;
        }
        if let Some(url) = lookup("TRAFFIC_BASE_URL") {
            config.traffic.base_url = url;
        }
        config.traffic.api_key = lookup("TRAFFIC_API_KEY").filter(|key| !key.trim().is_empty());
        if let Some(rounds) = parse_var::<usize, _>(&lookup, "TWO_OPT_MAX_ROUNDS")? {
            config.sequencing.max_rounds = rounds;
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depots.is_empty() {
            return Err(ConfigError::NoDepots);
        }
        if self.baseline().is_none() {
            return Err(ConfigError::UnknownBaselineDepot(self.baseline_depot));
        }
        if self.osrm.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout("routing"));
        }
        if self.traffic.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout("traffic"));
        }
        Ok(())
    }

    pub fn baseline(&self) -> Option<&Depot> {
        self.depots
            .iter()
            .find(|depot| depot.id == self.baseline_depot)
    }
}

/// The three Riga warehouses.
pub fn default_depots() -> Vec<Depot> {
    vec![
        Depot::new(1, "Warehouse 1", 56.969109, 24.112366),
        Depot::new(2, "Warehouse 2", 56.939166, 24.055983),
        Depot::new(3, "Warehouse 3", 56.952044, 24.158705),
    ]
}

fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVar { name, value }),
    }
}
