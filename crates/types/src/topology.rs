//! Topology trait and static ring implementation.

use crate::{NodeId, PortId};

/// Smallest ring the protocol is defined on.
pub const MIN_RING_SIZE: u32 = 3;

/// Errors that can occur when querying or building a topology.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// Fewer nodes than the protocol needs.
    #[error("ring of {0} nodes is too small (need at least 3)")]
    RingTooSmall(u32),

    /// Node index outside `0..size`.
    #[error("{0} is not on the ring")]
    UnknownNode(NodeId),

    /// Port does not belong to the node.
    #[error("{port} is not a port of {node}")]
    ForeignPort { node: NodeId, port: PortId },
}

/// Network topology seen by the harness.
///
/// Every node has exactly two ports. Agents never hold a topology; they only
/// learn the ports of the node they stand on.
pub trait Topology {
    /// Number of nodes.
    fn size(&self) -> u32;

    /// The two ports of a node, in a fixed order.
    fn ports(&self, node: NodeId) -> [PortId; 2];

    /// The node reached by leaving `node` through `port`.
    fn across(&self, node: NodeId, port: PortId) -> Result<NodeId, TopologyError>;

    // Derived methods

    /// Check whether a node belongs to the ring.
    fn contains(&self, node: NodeId) -> bool {
        node.0 < self.size()
    }

    /// Check whether `port` is one of `node`'s ports.
    fn has_port(&self, node: NodeId, port: PortId) -> bool {
        self.ports(node).contains(&port)
    }

    /// The port of `node` that is not `port`.
    fn opposite_port(&self, node: NodeId, port: PortId) -> Result<PortId, TopologyError> {
        let [first, second] = self.ports(node);
        if port == first {
            Ok(second)
        } else if port == second {
            Ok(first)
        } else {
            Err(TopologyError::ForeignPort { node, port })
        }
    }

    /// Both neighbours of a node, in port order.
    fn neighbours(&self, node: NodeId) -> Result<[NodeId; 2], TopologyError> {
        let [first, second] = self.ports(node);
        Ok([self.across(node, first)?, self.across(node, second)?])
    }
}

/// A static ring of `size` nodes.
///
/// Edge `i` joins node `i` and node `i + 1 (mod size)`; a port is labelled
/// with the edge it leaves through, so both endpoints of an edge use the same
/// label. Port order at node `v` is `[edge v, edge v-1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRing {
    size: u32,
}

impl StaticRing {
    /// Create a new ring.
    pub fn new(size: u32) -> Result<Self, TopologyError> {
        if size < MIN_RING_SIZE {
            return Err(TopologyError::RingTooSmall(size));
        }
        Ok(Self { size })
    }

    fn predecessor(&self, node: NodeId) -> u32 {
        (node.0 + self.size - 1) % self.size
    }
}

impl Topology for StaticRing {
    fn size(&self) -> u32 {
        self.size
    }

    fn ports(&self, node: NodeId) -> [PortId; 2] {
        let node = NodeId(node.0 % self.size);
        [PortId(node.0), PortId(self.predecessor(node))]
    }

    fn across(&self, node: NodeId, port: PortId) -> Result<NodeId, TopologyError> {
        if !self.contains(node) {
            return Err(TopologyError::UnknownNode(node));
        }
        if port.0 == node.0 {
            Ok(NodeId((node.0 + 1) % self.size))
        } else if port.0 == self.predecessor(node) {
            Ok(NodeId(port.0))
        } else {
            Err(TopologyError::ForeignPort { node, port })
        }
    }
}
