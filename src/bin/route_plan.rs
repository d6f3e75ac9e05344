//! Compute baseline and optimized plans for a list of stops.
//!
//! ```text
//! route-plan --stops stops.json [--offline] [--sequential]
//! ```

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::error;
use tracing_subscriber::EnvFilter;

use route_planner::config::PlannerConfig;
use route_planner::geo::HttpGeoMetrics;
use route_planner::haversine::HaversineMetrics;
use route_planner::model::{DeliveryStop, PlanKind, PlanResult};
use route_planner::planner::RoutePlanner;
use route_planner::report::PlanComparison;
use route_planner::store::MemoryPlanStore;
use route_planner::traits::GeoMetricsProvider;

#[derive(Debug, Parser)]
#[command(name = "route-plan", about = "Plan a delivery route and compare it with the baseline")]
struct Cli {
    /// JSON array of stops: {id, name, lat, lon, demand?, time_window_from?, time_window_to?}.
    #[arg(long)]
    stops: PathBuf,

    /// Use great-circle estimates instead of the routing service.
    #[arg(long)]
    offline: bool,

    /// Evaluate depots one after another.
    #[arg(long)]
    sequential: bool,
}

#[derive(Serialize)]
struct Output {
    baseline: PlanResult<u64>,
    optimized: PlanResult<u64>,
    savings: PlanComparison,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "planning failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = PlannerConfig::from_env()?;
    config.parallel_depots = !cli.sequential;
    config.validate()?;

    let stops: Vec<DeliveryStop<u64>> = serde_json::from_str(&fs::read_to_string(&cli.stops)?)?;

    let output = if cli.offline {
        plan(config, HaversineMetrics::default(), &stops)?
    } else {
        let provider = HttpGeoMetrics::from_config(&config)?;
        plan(config, provider, &stops)?
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn plan<P>(
    config: PlannerConfig,
    provider: P,
    stops: &[DeliveryStop<u64>],
) -> Result<Output, Box<dyn std::error::Error>>
where
    P: GeoMetricsProvider + Sync,
{
    let planner = RoutePlanner::new(config, provider);
    let store = MemoryPlanStore::new();
    let route_id = "cli".to_string();

    let baseline = planner.plan_and_store(&route_id, PlanKind::Baseline, stops, &store)?;
    let optimized = planner.plan_and_store(&route_id, PlanKind::Optimized, stops, &store)?;
    let savings = PlanComparison::between(&baseline, &optimized);

    Ok(Output {
        baseline,
        optimized,
        savings,
    })
}
