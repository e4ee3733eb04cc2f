//! Configuration types for the simulator.

use ringscout_simulation::{NetworkConfig, SimulationConfig};
use ringscout_types::NodeId;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Errors loading or checking a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for a single run.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Number of nodes in the ring.
    pub ring_size: u32,

    /// Node both agents start on.
    pub home: u32,

    /// Black hole position; `None` for a ring without one.
    pub black_hole: Option<u32>,

    /// Base hop latency in milliseconds.
    pub move_latency_ms: u64,

    /// Maximum extra hop latency in milliseconds.
    pub latency_jitter_ms: u64,

    /// Random seed for deterministic simulation.
    pub seed: u64,

    /// Give up after this many events.
    pub max_events: u64,
}

impl SimulatorConfig {
    /// Create a new configuration for a ring of `ring_size` nodes.
    pub fn new(ring_size: u32) -> Self {
        Self {
            ring_size,
            home: 0,
            black_hole: None,
            move_latency_ms: 10,
            latency_jitter_ms: 0,
            seed: 12345,
            max_events: 1_000_000,
        }
    }

    /// Set the home node.
    pub fn with_home(mut self, home: u32) -> Self {
        self.home = home;
        self
    }

    /// Place the black hole.
    pub fn with_black_hole(mut self, node: Option<u32>) -> Self {
        self.black_hole = node;
        self
    }

    /// Set hop latency and jitter.
    pub fn with_latency(mut self, move_latency_ms: u64, latency_jitter_ms: u64) -> Self {
        self.move_latency_ms = move_latency_ms;
        self.latency_jitter_ms = latency_jitter_ms;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the event limit.
    pub fn with_max_events(mut self, max_events: u64) -> Self {
        self.max_events = max_events;
        self
    }

    /// Convert to a NetworkConfig for the underlying simulation.
    pub fn to_network_config(&self) -> NetworkConfig {
        NetworkConfig::default()
            .with_move_latency(Duration::from_millis(self.move_latency_ms))
            .with_latency_jitter(Duration::from_millis(self.latency_jitter_ms))
    }

    /// Convert to the scenario run by the harness.
    pub fn to_simulation_config(&self) -> SimulationConfig {
        let config = SimulationConfig::new(self.ring_size)
            .with_home(NodeId(self.home))
            .with_network(self.to_network_config())
            .with_seed(self.seed)
            .with_max_events(self.max_events);
        match self.black_hole {
            Some(node) => config.with_black_hole(NodeId(node)),
            None => config,
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::new(5).with_black_hole(Some(3))
    }
}

/// Every hole position over a range of ring sizes and seeds.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Smallest ring size, inclusive.
    pub min_size: u32,

    /// Largest ring size, inclusive.
    pub max_size: u32,

    /// Number of seeds per (size, hole) pair.
    pub seeds: u64,

    /// First seed.
    pub first_seed: u64,

    /// Also run each size without a black hole.
    pub include_clear_ring: bool,

    /// Base hop latency in milliseconds.
    pub move_latency_ms: u64,

    /// Maximum extra hop latency in milliseconds.
    pub latency_jitter_ms: u64,

    /// Event limit per run.
    pub max_events: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min_size: 3,
            max_size: 32,
            seeds: 4,
            first_seed: 0,
            include_clear_ring: true,
            move_latency_ms: 10,
            latency_jitter_ms: 5,
            max_events: 1_000_000,
        }
    }
}

impl SweepConfig {
    /// Load a sweep from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse a sweep from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the size range.
    pub fn with_sizes(mut self, min_size: u32, max_size: u32) -> Self {
        self.min_size = min_size;
        self.max_size = max_size;
        self
    }

    /// Set the number of seeds per scenario.
    pub fn with_seeds(mut self, seeds: u64) -> Self {
        self.seeds = seeds;
        self
    }

    /// Set hop latency and jitter.
    pub fn with_latency(mut self, move_latency_ms: u64, latency_jitter_ms: u64) -> Self {
        self.move_latency_ms = move_latency_ms;
        self.latency_jitter_ms = latency_jitter_ms;
        self
    }

    /// Run rings without a black hole too.
    pub fn with_clear_rings(mut self, include: bool) -> Self {
        self.include_clear_ring = include;
        self
    }

    /// Check the ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_size < ringscout_types::MIN_RING_SIZE {
            return Err(ConfigError::Invalid(format!(
                "min_size {} is below {}",
                self.min_size,
                ringscout_types::MIN_RING_SIZE
            )));
        }
        if self.max_size < self.min_size {
            return Err(ConfigError::Invalid(format!(
                "max_size {} is below min_size {}",
                self.max_size, self.min_size
            )));
        }
        if self.seeds == 0 {
            return Err(ConfigError::Invalid("seeds must be at least 1".into()));
        }
        Ok(())
    }

    /// All scenarios of the sweep, agents always starting on node 0.
    pub fn scenarios(&self) -> Vec<SimulatorConfig> {
        let mut scenarios = Vec::new();
        for size in self.min_size..=self.max_size {
            let holes = (1..size)
                .map(Some)
                .chain(self.include_clear_ring.then_some(None));
            for hole in holes {
                for seed in self.first_seed..self.first_seed + self.seeds {
                    scenarios.push(
                        SimulatorConfig::new(size)
                            .with_black_hole(hole)
                            .with_latency(self.move_latency_ms, self.latency_jitter_ms)
                            .with_seed(seed)
                            .with_max_events(self.max_events),
                    );
                }
            }
        }
        scenarios
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_simulation_config() {
        let config = SimulatorConfig::new(7)
            .with_home(2)
            .with_black_hole(Some(4))
            .with_latency(20, 3)
            .with_seed(9)
            .to_simulation_config();

        assert_eq!(config.ring_size, 7);
        assert_eq!(config.home, NodeId(2));
        assert_eq!(config.black_hole, Some(NodeId(4)));
        assert_eq!(config.network.move_latency, Duration::from_millis(20));
        assert_eq!(config.network.latency_jitter, Duration::from_millis(3));
        assert_eq!(config.seed, 9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sweep_from_partial_toml() {
        let config = SweepConfig::from_toml_str(
            r#"
            min_size = 4
            max_size = 6
            seeds = 2
            include_clear_ring = false
            "#,
        )
        .unwrap();

        assert_eq!(config.latency_jitter_ms, 5);
        // (3 + 4 + 5) holes, 2 seeds each
        assert_eq!(config.scenarios().len(), 24);
    }

    #[test]
    fn test_sweep_counts_clear_rings() {
        let config = SweepConfig::default().with_sizes(3, 4).with_seeds(1);
        // holes: 2 + 3, plus one clear ring per size
        assert_eq!(config.scenarios().len(), 7);
    }

    #[test]
    fn test_sweep_rejects_bad_ranges() {
        assert!(matches!(
            SweepConfig::from_toml_str("min_size = 2"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SweepConfig::from_toml_str("min_size = 8\nmax_size = 5"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SweepConfig::from_toml_str("seeds = \"many\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
