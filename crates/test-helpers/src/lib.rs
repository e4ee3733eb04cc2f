//! Test fixtures for driving state machines by hand.
//!
//! [`TestNode`] owns a whiteboard and a state marker and lends them out as a
//! [`Site`], so a test can deliver events to an agent node by node without
//! spinning up the simulation runner.

use ringscout_core::Site;
use ringscout_types::{NodeId, NodeState, PortId, Record, StaticRing, Topology, Whiteboard};

/// A single ring node owned by a test.
#[derive(Debug, Clone)]
pub struct TestNode {
    pub id: NodeId,
    pub ports: [PortId; 2],
    pub network_size: u32,
    pub board: Whiteboard,
    pub state: NodeState,
}

impl TestNode {
    /// Node `id` of a ring of `network_size` nodes, labelled like [`StaticRing`].
    ///
    /// # Panics
    ///
    /// Panics if `network_size` is below the minimum ring size.
    pub fn on_ring(id: u32, network_size: u32) -> Self {
        let ring = StaticRing::new(network_size).expect("valid ring size");
        Self {
            id: NodeId(id),
            ports: ring.ports(NodeId(id)),
            network_size,
            board: Whiteboard::new(),
            state: NodeState::Unknown,
        }
    }

    /// Pre-load records through the regular append path.
    ///
    /// # Panics
    ///
    /// Panics if a record violates the whiteboard invariants.
    pub fn with_records(mut self, records: &[Record]) -> Self {
        for record in records {
            self.board.append(*record).expect("fixture record is valid");
        }
        self
    }

    /// Set the state marker.
    pub fn with_state(mut self, state: NodeState) -> Self {
        self.state = state;
        self
    }

    /// Lend the node out for one event.
    pub fn site(&mut self) -> Site<'_> {
        Site::new(
            self.id,
            self.ports,
            self.network_size,
            &mut self.board,
            &mut self.state,
        )
    }

    /// The node's two ports.
    pub fn port(&self, index: usize) -> PortId {
        self.ports[index]
    }

    /// Records currently on the board.
    pub fn records(&self) -> Vec<Record> {
        self.board.to_vec()
    }
}

/// Shorthand for `Record::Active`.
pub fn active(port: PortId) -> Record {
    Record::Active { port }
}

/// Shorthand for `Record::Safe`.
pub fn safe(port: PortId) -> Record {
    Record::Safe { port }
}
