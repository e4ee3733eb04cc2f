//! Per-node state of the ring.

use crate::InvariantViolation;
use ringscout_core::Site;
use ringscout_types::{NodeId, NodeState, Record, StaticRing, Topology, TopologyError, Whiteboard};

#[derive(Debug, Clone, Default)]
struct NodeSlot {
    board: Whiteboard,
    state: NodeState,
}

/// Whiteboards and state markers of every node.
#[derive(Debug, Clone)]
pub struct RingWorld {
    ring: StaticRing,
    nodes: Vec<NodeSlot>,
    black_hole: Option<NodeId>,
}

impl RingWorld {
    /// A fresh ring: every node `Unknown` with an empty board.
    pub fn new(ring: StaticRing, black_hole: Option<NodeId>) -> Self {
        let nodes = vec![NodeSlot::default(); ring.size() as usize];
        Self {
            ring,
            nodes,
            black_hole,
        }
    }

    pub fn ring(&self) -> &StaticRing {
        &self.ring
    }

    pub fn size(&self) -> u32 {
        self.ring.size()
    }

    pub fn black_hole(&self) -> Option<NodeId> {
        self.black_hole
    }

    pub fn is_black_hole(&self, node: NodeId) -> bool {
        self.black_hole == Some(node)
    }

    /// The board of `node`, if it is on the ring.
    pub fn board(&self, node: NodeId) -> Option<&Whiteboard> {
        self.nodes.get(node.index()).map(|slot| &slot.board)
    }

    /// The state marker of `node`, if it is on the ring.
    pub fn node_state(&self, node: NodeId) -> Option<NodeState> {
        self.nodes.get(node.index()).map(|slot| slot.state)
    }

    /// Lend `node` to the agent standing on it.
    pub fn site(&mut self, node: NodeId) -> Result<Site<'_>, TopologyError> {
        let ports = self.ring.ports(node);
        let size = self.ring.size();
        let slot = self
            .nodes
            .get_mut(node.index())
            .ok_or(TopologyError::UnknownNode(node))?;
        Ok(Site::new(node, ports, size, &mut slot.board, &mut slot.state))
    }

    /// State markers in node order.
    pub fn node_states(&self) -> Vec<NodeState> {
        self.nodes.iter().map(|slot| slot.state).collect()
    }

    /// Board contents in node order.
    pub fn boards(&self) -> Vec<Vec<Record>> {
        self.nodes.iter().map(|slot| slot.board.to_vec()).collect()
    }

    /// Nodes still marked `Unknown`.
    pub fn unknown_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.state == NodeState::Unknown)
            .map(|(i, _)| NodeId(i as u32))
            .collect()
    }

    /// Check the whiteboard invariants on every node.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for (i, slot) in self.nodes.iter().enumerate() {
            let node = NodeId(i as u32);

            if self.is_black_hole(node)
                && (!slot.board.is_empty() || slot.state != NodeState::Unknown)
            {
                return Err(InvariantViolation::BlackHoleTouched(node));
            }

            if let Some(port) = slot.board.conflicting_port() {
                return Err(InvariantViolation::ActiveAndSafe { node, port });
            }

            for port in self.ring.ports(node) {
                let marks = slot
                    .board
                    .records()
                    .filter(|r| **r == Record::Safe { port })
                    .count();
                if marks > 1 {
                    return Err(InvariantViolation::DuplicateSafe { node, port });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringscout_types::PortId;

    fn world(size: u32, black_hole: Option<u32>) -> RingWorld {
        RingWorld::new(StaticRing::new(size).unwrap(), black_hole.map(NodeId))
    }

    #[test]
    fn test_fresh_world_is_unknown() {
        let world = world(4, Some(2));

        assert_eq!(world.unknown_nodes().len(), 4);
        assert!(world.is_black_hole(NodeId(2)));
        assert!(world.check_invariants().is_ok());
    }

    #[test]
    fn test_site_writes_land_on_node() {
        let mut world = world(4, None);
        {
            let mut site = world.site(NodeId(1)).unwrap();
            assert_eq!(site.out_ports(), [PortId(1), PortId(0)]);
            site.set_node_state(NodeState::Clean);
            site.board_mut().mark_safe(PortId(0));
        }

        assert_eq!(world.node_state(NodeId(1)), Some(NodeState::Clean));
        assert!(world.board(NodeId(1)).unwrap().is_safe(PortId(0)));
        assert_eq!(world.unknown_nodes(), vec![NodeId(0), NodeId(2), NodeId(3)]);
    }

    #[test]
    fn test_site_rejects_foreign_node() {
        let mut world = world(4, None);
        assert_eq!(
            world.site(NodeId(9)).unwrap_err(),
            TopologyError::UnknownNode(NodeId(9))
        );
    }

    #[test]
    fn test_writes_to_black_hole_are_flagged() {
        let mut world = world(4, Some(2));
        world
            .site(NodeId(2))
            .unwrap()
            .set_node_state(NodeState::Clean);

        assert_eq!(
            world.check_invariants(),
            Err(InvariantViolation::BlackHoleTouched(NodeId(2)))
        );
    }
}
