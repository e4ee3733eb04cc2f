//! The node an agent currently stands on.

use ringscout_types::{NodeId, NodeState, PortId, Whiteboard};

/// Mutable view of the occupied node, lent to an agent for one event.
///
/// Holding a `Site` is what "being at a node" means: the borrow gives the
/// agent exclusive access to the node's whiteboard and state marker for the
/// duration of the event, and nothing else about the network except its size.
pub struct Site<'a> {
    node: NodeId,
    ports: [PortId; 2],
    network_size: u32,
    board: &'a mut Whiteboard,
    state: &'a mut NodeState,
}

impl<'a> Site<'a> {
    /// Create a site view.
    pub fn new(
        node: NodeId,
        ports: [PortId; 2],
        network_size: u32,
        board: &'a mut Whiteboard,
        state: &'a mut NodeState,
    ) -> Self {
        Self {
            node,
            ports,
            network_size,
            board,
            state,
        }
    }

    /// Identifier of this node. Only used for diagnostics.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Number of nodes in the ring (known to every agent).
    pub fn network_size(&self) -> u32 {
        self.network_size
    }

    /// The node's two ports.
    pub fn out_ports(&self) -> [PortId; 2] {
        self.ports
    }

    /// The port that is not `port`.
    pub fn other_port(&self, port: PortId) -> PortId {
        let [first, second] = self.ports;
        if port == first {
            second
        } else {
            first
        }
    }

    /// Read access to the whiteboard.
    pub fn board(&self) -> &Whiteboard {
        self.board
    }

    /// Write access to the whiteboard.
    pub fn board_mut(&mut self) -> &mut Whiteboard {
        self.board
    }

    /// Current state marker of the node.
    pub fn node_state(&self) -> NodeState {
        *self.state
    }

    /// Overwrite the node's state marker.
    pub fn set_node_state(&mut self, state: NodeState) {
        *self.state = state;
    }
}

impl std::fmt::Debug for Site<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("node", &self.node)
            .field("ports", &self.ports)
            .field("state", &self.state)
            .field("board", &self.board.to_vec())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_port() {
        let mut board = Whiteboard::new();
        let mut state = NodeState::Unknown;
        let site = Site::new(
            NodeId(1),
            [PortId(1), PortId(0)],
            4,
            &mut board,
            &mut state,
        );

        assert_eq!(site.other_port(PortId(1)), PortId(0));
        assert_eq!(site.other_port(PortId(0)), PortId(1));
    }

    #[test]
    fn test_writes_reach_the_node() {
        let mut board = Whiteboard::new();
        let mut state = NodeState::Unknown;
        {
            let mut site = Site::new(
                NodeId(0),
                [PortId(0), PortId(2)],
                3,
                &mut board,
                &mut state,
            );
            site.set_node_state(NodeState::Clean);
            site.board_mut().mark_safe(PortId(2));
            assert_eq!(site.node_state(), NodeState::Clean);
        }

        assert_eq!(state, NodeState::Clean);
        assert!(board.is_safe(PortId(2)));
    }
}
