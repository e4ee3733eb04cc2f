//! Ringscout Simulator
//!
//! Scenario runner built on top of the simulation harness.
//!
//! # Architecture
//!
//! The simulator builds on `ringscout-simulation` to provide:
//!
//! - **Configuration**: single runs and sweeps, from flags or TOML files
//! - **Sweeps**: every hole position over a range of ring sizes and seeds,
//!   run in parallel
//! - **Metrics Collection**: verdict counts plus move, event and detection
//!   time percentiles
//!
//! # Example
//!
//! ```ignore
//! use ringscout_simulator::{run_sweep, SweepConfig};
//!
//! let sweep = SweepConfig::default().with_sizes(3, 16).with_seeds(8);
//! let summary = run_sweep(&sweep)?;
//!
//! println!("{}", summary);
//! assert!(summary.is_success());
//! ```

pub mod config;
pub mod metrics;
pub mod sweep;

pub use config::{ConfigError, SimulatorConfig, SweepConfig};
pub use metrics::{Failure, MetricsCollector, SweepSummary, Verdict};
pub use sweep::{run_scenario, run_sweep};
