//! Sub-phases of a working agent.

use ringscout_types::PortId;
use serde::Serialize;
use std::fmt;

/// What the agent is in the middle of.
///
/// Exactly one phase holds at a time, which replaces a set of independent
/// flags whose combinations had to be checked in priority order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Created, `Init` not yet delivered.
    #[default]
    Idle,

    /// Heading to a node this agent has not visited.
    Exploring,

    /// Stepped back to the previous node to confirm the edge just crossed.
    Confirming,

    /// Back on the newly confirmed node, about to push the frontier.
    Advancing,

    /// Another agent holds the frontier here; parked until the board changes.
    Waiting { arrived_on: PortId },

    /// Partition done; walking backwards over safe edges looking for the
    /// partner's frontier.
    TraversingBack,

    /// Walking back over safe edges to this agent's own frontier.
    ReturningToBoundary,

    /// Terminal.
    Halted,
}

impl Phase {
    /// Get a human-readable name for this phase.
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Exploring => "exploring",
            Phase::Confirming => "confirming",
            Phase::Advancing => "advancing",
            Phase::Waiting { .. } => "waiting",
            Phase::TraversingBack => "traversing-back",
            Phase::ReturningToBoundary => "returning-to-boundary",
            Phase::Halted => "halted",
        }
    }

    /// Phases in which the agent is in transit and expects an arrival.
    pub fn expects_arrival(&self) -> bool {
        matches!(
            self,
            Phase::Exploring
                | Phase::Confirming
                | Phase::Advancing
                | Phase::TraversingBack
                | Phase::ReturningToBoundary
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
