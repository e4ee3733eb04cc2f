//! Node and agent state markers.

use crate::{NodeId, PortId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker left on a node by the agent currently occupying it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    /// No agent has been here.
    #[default]
    Unknown,

    /// Visited and survived.
    Clean,

    /// One of this node's ports leads into the black hole.
    EdgeToBlackHole,
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeState::Unknown => "unknown",
            NodeState::Clean => "clean",
            NodeState::EdgeToBlackHole => "edge-to-black-hole",
        };
        f.write_str(name)
    }
}

/// Externally visible agent state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    /// Exploring, confirming, traversing or returning.
    #[default]
    Working,

    /// The black hole has been identified; walking back to the far side of it.
    FoundBlackHole,

    /// Terminal.
    Done,
}

impl AgentState {
    /// Whether the agent will not react to any further event.
    pub fn is_terminal(self) -> bool {
        matches!(self, AgentState::Done)
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgentState::Working => "working",
            AgentState::FoundBlackHole => "found-black-hole",
            AgentState::Done => "done",
        };
        f.write_str(name)
    }
}

/// How an agent finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The black hole sits between `declared_at` (across `entry_port`) and
    /// `resting_at`, the node on its other side where the agent stopped.
    BlackHoleLocated {
        declared_at: NodeId,
        entry_port: PortId,
        resting_at: NodeId,
    },

    /// Every edge the agent could reach is safe; the two frontiers met.
    ///
    /// Only reachable on an instance without a black hole.
    RingClear { at: NodeId },
}

impl Outcome {
    /// The two nodes adjacent to the black hole, if one was located.
    pub fn black_hole_neighbours(&self) -> Option<(NodeId, NodeId)> {
        match self {
            Outcome::BlackHoleLocated {
                declared_at,
                resting_at,
                ..
            } => Some((*declared_at, *resting_at)),
            Outcome::RingClear { .. } => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::BlackHoleLocated {
                declared_at,
                entry_port,
                resting_at,
            } => write!(
                f,
                "black hole behind {} of {} (other side {})",
                entry_port, declared_at, resting_at
            ),
            Outcome::RingClear { at } => write!(f, "ring clear (converged at {})", at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(NodeState::default(), NodeState::Unknown);
        assert_eq!(AgentState::default(), AgentState::Working);
    }

    #[test]
    fn test_only_done_is_terminal() {
        assert!(!AgentState::Working.is_terminal());
        assert!(!AgentState::FoundBlackHole.is_terminal());
        assert!(AgentState::Done.is_terminal());
    }

    #[test]
    fn test_black_hole_neighbours() {
        let located = Outcome::BlackHoleLocated {
            declared_at: NodeId(2),
            entry_port: PortId(2),
            resting_at: NodeId(4),
        };
        assert_eq!(
            located.black_hole_neighbours(),
            Some((NodeId(2), NodeId(4)))
        );
        assert_eq!(
            Outcome::RingClear { at: NodeId(1) }.black_hole_neighbours(),
            None
        );
    }
}
