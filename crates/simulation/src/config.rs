//! Simulation configuration.

use crate::{NetworkConfig, SimulationError};
use ringscout_types::{NodeId, StaticRing};

/// One black-hole search scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Number of nodes in the ring.
    pub ring_size: u32,

    /// Node both agents start on.
    pub home: NodeId,

    /// The black hole, or `None` for a ring without one.
    pub black_hole: Option<NodeId>,

    /// Hop timing.
    pub network: NetworkConfig,

    /// Random seed for deterministic simulation.
    pub seed: u64,

    /// Give up after this many events.
    pub max_events: u64,

    /// Keep a per-event trace.
    pub record_trace: bool,
}

impl SimulationConfig {
    /// A ring of `ring_size` nodes without a black hole, agents on node 0.
    pub fn new(ring_size: u32) -> Self {
        Self {
            ring_size,
            home: NodeId(0),
            black_hole: None,
            network: NetworkConfig::default(),
            seed: 12345,
            max_events: 1_000_000,
            record_trace: false,
        }
    }

    /// Set the home node.
    pub fn with_home(mut self, home: NodeId) -> Self {
        self.home = home;
        self
    }

    /// Place the black hole.
    pub fn with_black_hole(mut self, node: NodeId) -> Self {
        self.black_hole = Some(node);
        self
    }

    /// Remove the black hole.
    pub fn without_black_hole(mut self) -> Self {
        self.black_hole = None;
        self
    }

    /// Set the network configuration.
    pub fn with_network(mut self, network: NetworkConfig) -> Self {
        self.network = network;
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

    /// Turn the per-event trace on or off.
    pub fn with_trace(mut self, record_trace: bool) -> Self {
        self.record_trace = record_trace;
        self
    }

    /// Check the scenario and build its ring.
    pub fn validate(&self) -> Result<StaticRing, SimulationError> {
        let ring = StaticRing::new(self.ring_size)?;
        if self.home.0 >= self.ring_size {
            return Err(SimulationError::HomeOutOfRange {
                home: self.home,
                size: self.ring_size,
            });
        }
        if let Some(node) = self.black_hole {
            if node.0 >= self.ring_size {
                return Err(SimulationError::BlackHoleOutOfRange {
                    node,
                    size: self.ring_size,
                });
            }
            if node == self.home {
                return Err(SimulationError::HomeIsBlackHole(node));
            }
        }
        Ok(ring)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(5).with_black_hole(NodeId(3))
    }
}
