//! Inbound events delivered by the harness.

use ringscout_types::PortId;

/// Events an agent reacts to.
///
/// Each event is delivered while the agent stands on a node; the node is
/// passed alongside as a [`Site`](crate::Site).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Algorithm start. Delivered exactly once, on the home node.
    Init,

    /// The agent crossed an edge and reached a node through `port`.
    Arrived { port: PortId },

    /// The whiteboard of the node the agent is waiting on has changed.
    BoardUpdated,
}

impl Event {
    /// Get a human-readable name for this event type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Event::Init => "Init",
            Event::Arrived { .. } => "Arrived",
            Event::BoardUpdated => "BoardUpdated",
        }
    }
}
