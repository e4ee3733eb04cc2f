//! Simulated links between ring nodes.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use ringscout_types::{NodeId, PortId, StaticRing, Topology, TopologyError};
use std::time::Duration;

/// Configuration for agent movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Base time for one hop.
    pub move_latency: Duration,

    /// Maximum extra time added to a hop, sampled uniformly.
    pub latency_jitter: Duration,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            move_latency: Duration::from_millis(10),
            latency_jitter: Duration::ZERO,
        }
    }
}

impl NetworkConfig {
    /// Set the base hop latency.
    pub fn with_move_latency(mut self, latency: Duration) -> Self {
        self.move_latency = latency;
        self
    }

    /// Set the maximum jitter.
    pub fn with_latency_jitter(mut self, jitter: Duration) -> Self {
        self.latency_jitter = jitter;
        self
    }
}

/// The ring plus hop timing.
///
/// Links are reliable: every move arrives. Moves of one agent are FIFO
/// because an agent never has more than one move in flight.
#[derive(Debug, Clone)]
pub struct SimulatedNetwork {
    config: NetworkConfig,
    ring: StaticRing,
}

impl SimulatedNetwork {
    /// Create a network over `ring`.
    pub fn new(config: NetworkConfig, ring: StaticRing) -> Self {
        Self { config, ring }
    }

    /// Get the network configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Get the ring.
    pub fn ring(&self) -> &StaticRing {
        &self.ring
    }

    /// Sample the duration of one hop.
    pub fn sample_latency(&self, rng: &mut ChaCha8Rng) -> Duration {
        let jitter = if self.config.latency_jitter.is_zero() {
            Duration::ZERO
        } else {
            rng.gen_range(Duration::ZERO..=self.config.latency_jitter)
        };
        self.config.move_latency + jitter
    }

    /// Where a move out of `from` through `port` lands.
    pub fn route(&self, from: NodeId, port: PortId) -> Result<NodeId, TopologyError> {
        self.ring.across(from, port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn network(config: NetworkConfig) -> SimulatedNetwork {
        SimulatedNetwork::new(config, StaticRing::new(5).unwrap())
    }

    #[test]
    fn test_fixed_latency_without_jitter() {
        let net = network(NetworkConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..10 {
            assert_eq!(net.sample_latency(&mut rng), Duration::from_millis(10));
        }
    }

    #[test]
    fn test_jitter_is_bounded_and_seeded() {
        let config = NetworkConfig::default().with_latency_jitter(Duration::from_millis(5));
        let net = network(config);

        let sample = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..50).map(|_| net.sample_latency(&mut rng)).collect::<Vec<_>>()
        };

        let first = sample(42);
        assert_eq!(first, sample(42));
        for latency in first {
            assert!(latency >= Duration::from_millis(10));
            assert!(latency <= Duration::from_millis(15));
        }
    }

    #[test]
    fn test_route_follows_ring() {
        let net = network(NetworkConfig::default());

        assert_eq!(net.route(NodeId(4), PortId(4)), Ok(NodeId(0)));
        assert_eq!(net.route(NodeId(0), PortId(4)), Ok(NodeId(4)));
        assert!(net.route(NodeId(0), PortId(2)).is_err());
    }
}
