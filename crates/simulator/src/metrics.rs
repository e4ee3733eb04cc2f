//! Metrics collection across many runs.

use hdrhistogram::{CreationError, Histogram};
use ringscout_simulation::SimulationReport;
use ringscout_types::Outcome;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// How one run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The black hole was found and every check passed.
    Located,
    /// No black hole; both agents finished.
    Clear,
    /// The run violated a correctness check.
    Failed,
}

/// One failed scenario, kept for the final report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub ring_size: u32,
    pub black_hole: Option<u32>,
    pub seed: u64,
    pub reason: String,
}

/// Collects per-run results into histograms.
pub struct MetricsCollector {
    located: u64,
    clear: u64,
    spurious_declarations: u64,
    failures: Vec<Failure>,
    moves: Histogram<u64>,
    events: Histogram<u64>,
    /// Detection time in microseconds of simulated time.
    detection_us: Histogram<u64>,
}

impl MetricsCollector {
    pub fn new() -> Result<Self, CreationError> {
        Ok(Self {
            located: 0,
            clear: 0,
            spurious_declarations: 0,
            failures: Vec::new(),
            moves: histogram()?,
            events: histogram()?,
            detection_us: histogram()?,
        })
    }

    /// Record a finished run, returning its verdict.
    pub fn record(&mut self, report: &SimulationReport) -> Verdict {
        if let Err(e) = report.verify() {
            self.failures.push(Failure {
                ring_size: report.ring_size,
                black_hole: report.black_hole.map(|n| n.0),
                seed: report.seed,
                reason: e.to_string(),
            });
            return Verdict::Failed;
        }

        self.moves.saturating_record(report.total_moves());
        self.events.saturating_record(report.events_processed);

        if report.black_hole.is_some() {
            self.located += 1;
            if let Some(t) = report.detection_time() {
                self.detection_us.saturating_record(t.as_micros() as u64);
            }
            Verdict::Located
        } else {
            self.clear += 1;
            let declared = report
                .agents
                .iter()
                .any(|a| matches!(a.outcome, Some(Outcome::BlackHoleLocated { .. })));
            if declared {
                self.spurious_declarations += 1;
            }
            Verdict::Clear
        }
    }

    /// Record a scenario that could not be run at all.
    pub fn record_error(&mut self, failure: Failure) {
        self.failures.push(failure);
    }

    /// Summarise everything recorded so far.
    pub fn summary(&self) -> SweepSummary {
        SweepSummary {
            runs: self.located + self.clear + self.failures.len() as u64,
            located: self.located,
            clear: self.clear,
            spurious_declarations: self.spurious_declarations,
            failed: self.failures.len() as u64,
            moves: Percentiles::of(&self.moves),
            events: Percentiles::of(&self.events),
            detection_time: DurationPercentiles::of(&self.detection_us),
            failures: self.failures.clone(),
        }
    }
}

/// Three significant figures over every value a run can produce.
///
/// `saturating_record` clamps to the highest trackable value and never
/// resizes, so the bounds are fixed up front.
fn histogram() -> Result<Histogram<u64>, CreationError> {
    Histogram::new_with_bounds(1, u64::MAX >> 1, 3)
}

/// Distribution of a counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Percentiles {
    pub min: u64,
    pub p50: u64,
    pub p99: u64,
    pub max: u64,
}

impl Percentiles {
    fn of(histogram: &Histogram<u64>) -> Self {
        if histogram.len() == 0 {
            return Self::default();
        }
        Self {
            min: histogram.min(),
            p50: histogram.value_at_quantile(0.5),
            p99: histogram.value_at_quantile(0.99),
            max: histogram.max(),
        }
    }
}

/// Distribution of a simulated duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DurationPercentiles {
    pub p50: Duration,
    pub p99: Duration,
    pub max: Duration,
}

impl DurationPercentiles {
    fn of(histogram: &Histogram<u64>) -> Self {
        let p = Percentiles::of(histogram);
        Self {
            p50: Duration::from_micros(p.p50),
            p99: Duration::from_micros(p.p99),
            max: Duration::from_micros(p.max),
        }
    }
}

/// Aggregated results of a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepSummary {
    pub runs: u64,
    pub located: u64,
    pub clear: u64,
    /// Rings without a hole where an agent still declared one.
    pub spurious_declarations: u64,
    pub failed: u64,
    pub moves: Percentiles,
    pub events: Percentiles,
    pub detection_time: DurationPercentiles,
    pub failures: Vec<Failure>,
}

impl SweepSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for SweepSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "runs:            {}", self.runs)?;
        writeln!(f, "  located:       {}", self.located)?;
        writeln!(
            f,
            "  clear:         {} ({} with a spurious declaration)",
            self.clear, self.spurious_declarations
        )?;
        writeln!(f, "  failed:        {}", self.failed)?;
        writeln!(
            f,
            "moves:           min {} / p50 {} / p99 {} / max {}",
            self.moves.min, self.moves.p50, self.moves.p99, self.moves.max
        )?;
        writeln!(
            f,
            "events:          min {} / p50 {} / p99 {} / max {}",
            self.events.min, self.events.p50, self.events.p99, self.events.max
        )?;
        writeln!(
            f,
            "detection time:  p50 {:?} / p99 {:?} / max {:?}",
            self.detection_time.p50, self.detection_time.p99, self.detection_time.max
        )?;
        for failure in &self.failures {
            writeln!(
                f,
                "FAILED n={} hole={:?} seed={}: {}",
                failure.ring_size, failure.black_hole, failure.seed, failure.reason
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringscout_simulation::{SimulationConfig, SimulationRunner};
    use ringscout_types::NodeId;

    fn run(config: SimulationConfig) -> SimulationReport {
        SimulationRunner::new(config).unwrap().run().unwrap()
    }

    #[test]
    fn test_records_verdicts() {
        let mut metrics = MetricsCollector::new().unwrap();

        let located = run(SimulationConfig::new(5).with_black_hole(NodeId(3)));
        assert_eq!(metrics.record(&located), Verdict::Located);

        let clear = run(SimulationConfig::new(5));
        assert_eq!(metrics.record(&clear), Verdict::Clear);

        let stalled = run(
            SimulationConfig::new(9)
                .with_black_hole(NodeId(4))
                .with_max_events(3),
        );
        assert_eq!(metrics.record(&stalled), Verdict::Failed);

        let summary = metrics.summary();
        assert_eq!(summary.runs, 3);
        assert_eq!(summary.located, 1);
        assert_eq!(summary.clear, 1);
        assert_eq!(summary.failed, 1);
        assert!(!summary.is_success());
        assert_eq!(summary.failures[0].reason, "run stalled after 3 events");
        assert!(summary.detection_time.max >= located.detection_time().unwrap());
    }

    #[test]
    fn test_large_values_are_not_clamped() {
        let mut metrics = MetricsCollector::new().unwrap();
        let report = run(SimulationConfig::new(5).with_black_hole(NodeId(3)));
        let detected = report.detection_time().unwrap();
        assert!(detected > Duration::from_millis(100));

        assert_eq!(metrics.record(&report), Verdict::Located);
        for value in [2_048, 50_000, 3_000_000] {
            metrics.moves.saturating_record(value);
        }

        let summary = metrics.summary();
        let p50 = summary.detection_time.p50;
        assert!(p50 >= detected && p50 <= detected + detected / 500);
        assert!(summary.moves.max >= 3_000_000);
        assert!(summary.moves.max <= 3_003_000);
    }

    #[test]
    fn test_empty_summary() {
        let summary = MetricsCollector::new().unwrap().summary();
        assert_eq!(summary.runs, 0);
        assert_eq!(summary.moves, Percentiles::default());
        assert!(summary.is_success());
    }
}
