//! Outbound actions for the harness to carry out.

use ringscout_types::{Outcome, PortId};

/// What an agent asks the harness to do after handling an event.
///
/// The harness performs the movement; the state machine itself never sees
/// the topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Leave the current node through `port`. The next event is an
    /// [`Event::Arrived`](crate::Event::Arrived) on the far node.
    Move { port: PortId },

    /// Stay on the current node until its whiteboard changes.
    AwaitBoardUpdate,

    /// Stop permanently.
    Halt { outcome: Outcome },
}

impl Action {
    /// Get a human-readable name for this action type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Action::Move { .. } => "Move",
            Action::AwaitBoardUpdate => "AwaitBoardUpdate",
            Action::Halt { .. } => "Halt",
        }
    }

    /// Check if this action relocates the agent.
    pub fn is_move(&self) -> bool {
        matches!(self, Action::Move { .. })
    }

    /// Check if this action ends the agent.
    pub fn is_halt(&self) -> bool {
        matches!(self, Action::Halt { .. })
    }
}
