//! Parallel parameter sweeps.

use crate::config::{SimulatorConfig, SweepConfig};
use crate::metrics::{Failure, MetricsCollector, SweepSummary};
use hdrhistogram::CreationError;
use rayon::prelude::*;
use ringscout_simulation::{SimulationError, SimulationReport, SimulationRunner};
use tracing::{debug, info};

/// Run one scenario to completion.
pub fn run_scenario(config: &SimulatorConfig) -> Result<SimulationReport, SimulationError> {
    let mut runner = SimulationRunner::new(config.to_simulation_config())?;
    runner.run()
}

/// Run every scenario of `sweep` in parallel and aggregate the results.
///
/// Runs are independent and seeded, so the summary does not depend on how
/// rayon schedules them; results are folded in scenario order.
pub fn run_sweep(sweep: &SweepConfig) -> Result<SweepSummary, CreationError> {
    let scenarios = sweep.scenarios();
    info!(
        scenarios = scenarios.len(),
        min_size = sweep.min_size,
        max_size = sweep.max_size,
        seeds = sweep.seeds,
        "Starting sweep"
    );

    let results: Vec<_> = scenarios
        .par_iter()
        .map(|scenario| (scenario, run_scenario(scenario)))
        .collect();

    let mut metrics = MetricsCollector::new()?;
    for (scenario, result) in results {
        match result {
            Ok(report) => {
                let verdict = metrics.record(&report);
                debug!(
                    ring_size = scenario.ring_size,
                    black_hole = ?scenario.black_hole,
                    seed = scenario.seed,
                    ?verdict,
                    "Scenario finished"
                );
            }
            Err(e) => metrics.record_error(Failure {
                ring_size: scenario.ring_size,
                black_hole: scenario.black_hole,
                seed: scenario.seed,
                reason: e.to_string(),
            }),
        }
    }

    let summary = metrics.summary();
    info!(
        runs = summary.runs,
        failed = summary.failed,
        "Sweep finished"
    );
    Ok(summary)
}
