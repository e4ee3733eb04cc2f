//! Core types for black-hole search on a ring.
//!
//! Everything here is plain data shared by the agent state machine and the
//! simulation harness:
//!
//! - [`NodeId`], [`PortId`], [`AgentId`]: identifiers
//! - [`Record`] and [`Whiteboard`]: the per-node shared log
//! - [`NodeState`], [`AgentState`]: markers written by agents
//! - [`Topology`] and [`StaticRing`]: the ring the agents move on

mod identifiers;
mod record;
mod state;
mod topology;
mod whiteboard;

pub use identifiers::{AgentId, NodeId, PortId};
pub use record::Record;
pub use state::{AgentState, NodeState, Outcome};
pub use topology::{StaticRing, Topology, TopologyError, MIN_RING_SIZE};
pub use whiteboard::{SafeMark, Whiteboard, WhiteboardError};
