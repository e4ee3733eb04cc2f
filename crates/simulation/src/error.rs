//! Simulation errors.

use ringscout_types::{AgentId, NodeId, PortId, TopologyError};

/// Errors raised while setting up or running a simulation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("invalid topology: {0}")]
    Topology(#[from] TopologyError),

    #[error("home {home} is outside a ring of {size} nodes")]
    HomeOutOfRange { home: NodeId, size: u32 },

    #[error("black hole {node} is outside a ring of {size} nodes")]
    BlackHoleOutOfRange { node: NodeId, size: u32 },

    #[error("agents cannot start on the black hole ({0})")]
    HomeIsBlackHole(NodeId),

    #[error("{agent} moved through {port}, which {node} does not have")]
    InvalidMove {
        agent: AgentId,
        node: NodeId,
        port: PortId,
    },

    #[error("world invariant broken: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// A world state that no correct run can produce.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("{node} holds both an active claim and a safe mark on {port}")]
    ActiveAndSafe { node: NodeId, port: PortId },

    #[error("{node} holds two safe marks for {port}")]
    DuplicateSafe { node: NodeId, port: PortId },

    #[error("black hole {0} was written to")]
    BlackHoleTouched(NodeId),
}
