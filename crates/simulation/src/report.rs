//! Run reports and correctness checks.

use ringscout_agent::Phase;
use ringscout_types::{
    AgentId, AgentState, NodeId, NodeState, Outcome, Record, StaticRing, Topology,
};
use serde::Serialize;
use std::time::Duration;

/// Final state of one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentReport {
    pub id: AgentId,
    pub state: AgentState,
    pub phase: Phase,
    pub outcome: Option<Outcome>,
    pub round: u64,
    pub moves: u64,
    /// Set if the agent moved into the black hole.
    pub destroyed_at: Option<NodeId>,
    /// When the agent halted.
    pub finished_at: Option<Duration>,
}

impl AgentReport {
    pub fn is_destroyed(&self) -> bool {
        self.destroyed_at.is_some()
    }
}

/// Everything a finished (or stalled) run leaves behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub ring_size: u32,
    pub home: NodeId,
    pub black_hole: Option<NodeId>,
    pub seed: u64,
    pub agents: Vec<AgentReport>,
    pub node_states: Vec<NodeState>,
    pub boards: Vec<Vec<Record>>,
    pub events_processed: u64,
    pub final_time: Duration,
    /// Events were still pending when the run stopped.
    pub stalled: bool,
}

/// Ways a run can fail to solve its instance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("run stalled after {0} events")]
    Stalled(u64),

    #[error("expected {expected} destroyed agents, found {found}")]
    WrongCasualties { expected: usize, found: usize },

    #[error("{0} did not finish")]
    NotFinished(AgentId),

    #[error("no agent located the black hole")]
    NotLocated,

    #[error("black hole reported at {reported}, actually at {actual}")]
    WrongLocation { reported: NodeId, actual: NodeId },

    #[error("{node} is {found}, expected {expected}")]
    WrongMarker {
        node: NodeId,
        found: NodeState,
        expected: NodeState,
    },

    #[error("{0} was never explored")]
    Unexplored(NodeId),
}

impl SimulationReport {
    /// Agents that moved into the black hole.
    pub fn destroyed(&self) -> impl Iterator<Item = &AgentReport> + '_ {
        self.agents.iter().filter(|a| a.is_destroyed())
    }

    /// The only agent left alive, if exactly one is.
    pub fn survivor(&self) -> Option<&AgentReport> {
        let mut alive = self.agents.iter().filter(|a| !a.is_destroyed());
        match (alive.next(), alive.next()) {
            (Some(agent), None) => Some(agent),
            _ => None,
        }
    }

    /// Nodes nobody marked.
    pub fn unknown_nodes(&self) -> Vec<NodeId> {
        self.node_states
            .iter()
            .enumerate()
            .filter(|(_, state)| **state == NodeState::Unknown)
            .map(|(i, _)| NodeId(i as u32))
            .collect()
    }

    /// The node some agent declared to be the black hole.
    pub fn located_black_hole(&self) -> Option<NodeId> {
        let ring = StaticRing::new(self.ring_size).ok()?;
        self.agents.iter().find_map(|a| match a.outcome {
            Some(Outcome::BlackHoleLocated {
                declared_at,
                entry_port,
                ..
            }) => ring.across(declared_at, entry_port).ok(),
            _ => None,
        })
    }

    /// When the black hole was located.
    pub fn detection_time(&self) -> Option<Duration> {
        self.agents
            .iter()
            .filter(|a| matches!(a.outcome, Some(Outcome::BlackHoleLocated { .. })))
            .filter_map(|a| a.finished_at)
            .min()
    }

    /// Moves made by both agents together.
    pub fn total_moves(&self) -> u64 {
        self.agents.iter().map(|a| a.moves).sum()
    }

    /// Check the run against what a correct search must produce.
    ///
    /// With a black hole: one agent destroyed, the other done and pointing
    /// at the hole, both neighbours of the hole marked, every other node
    /// clean. Without one: nobody destroyed, both agents done, no node left
    /// unexplored.
    pub fn verify(&self) -> Result<(), VerificationError> {
        if self.stalled {
            return Err(VerificationError::Stalled(self.events_processed));
        }

        let found = self.destroyed().count();
        let expected = usize::from(self.black_hole.is_some());
        if found != expected {
            return Err(VerificationError::WrongCasualties { expected, found });
        }

        for agent in self.agents.iter().filter(|a| !a.is_destroyed()) {
            if agent.state != AgentState::Done {
                return Err(VerificationError::NotFinished(agent.id));
            }
        }

        let Some(hole) = self.black_hole else {
            return match self.unknown_nodes().first() {
                Some(node) => Err(VerificationError::Unexplored(*node)),
                None => Ok(()),
            };
        };

        match self.located_black_hole() {
            None => return Err(VerificationError::NotLocated),
            Some(reported) if reported != hole => {
                return Err(VerificationError::WrongLocation {
                    reported,
                    actual: hole,
                })
            }
            Some(_) => {}
        }

        let ring = StaticRing::new(self.ring_size).ok();
        let neighbours = ring
            .and_then(|r| r.neighbours(hole).ok())
            .unwrap_or([hole, hole]);
        for (i, found) in self.node_states.iter().enumerate() {
            let node = NodeId(i as u32);
            let expected = if node == hole {
                NodeState::Unknown
            } else if neighbours.contains(&node) {
                NodeState::EdgeToBlackHole
            } else {
                NodeState::Clean
            };
            if *found != expected {
                return Err(VerificationError::WrongMarker {
                    node,
                    found: *found,
                    expected,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringscout_types::PortId;

    fn agent(id: u64) -> AgentReport {
        AgentReport {
            id: AgentId(id),
            state: AgentState::Done,
            phase: Phase::Halted,
            outcome: None,
            round: 1,
            moves: 0,
            destroyed_at: None,
            finished_at: None,
        }
    }

    fn located_report() -> SimulationReport {
        let mut survivor = agent(0);
        survivor.outcome = Some(Outcome::BlackHoleLocated {
            declared_at: NodeId(4),
            entry_port: PortId(3),
            resting_at: NodeId(2),
        });
        survivor.finished_at = Some(Duration::from_millis(160));
        survivor.moves = 12;
        let mut victim = agent(1);
        victim.state = AgentState::Working;
        victim.phase = Phase::Exploring;
        victim.destroyed_at = Some(NodeId(3));
        victim.moves = 4;

        SimulationReport {
            ring_size: 5,
            home: NodeId(0),
            black_hole: Some(NodeId(3)),
            seed: 1,
            agents: vec![survivor, victim],
            node_states: vec![
                NodeState::Clean,
                NodeState::Clean,
                NodeState::EdgeToBlackHole,
                NodeState::Unknown,
                NodeState::EdgeToBlackHole,
            ],
            boards: vec![vec![]; 5],
            events_processed: 18,
            final_time: Duration::from_millis(160),
            stalled: false,
        }
    }

    #[test]
    fn test_helpers() {
        let report = located_report();

        assert_eq!(report.survivor().map(|a| a.id), Some(AgentId(0)));
        assert_eq!(report.located_black_hole(), Some(NodeId(3)));
        assert_eq!(report.unknown_nodes(), vec![NodeId(3)]);
        assert_eq!(report.detection_time(), Some(Duration::from_millis(160)));
        assert_eq!(report.total_moves(), 16);
        assert_eq!(report.verify(), Ok(()));
    }

    #[test]
    fn test_verify_catches_wrong_marker() {
        let mut report = located_report();
        report.node_states[1] = NodeState::Unknown;

        assert_eq!(
            report.verify(),
            Err(VerificationError::WrongMarker {
                node: NodeId(1),
                found: NodeState::Unknown,
                expected: NodeState::Clean,
            })
        );
    }

    #[test]
    fn test_verify_catches_stall_and_missing_casualty() {
        let mut report = located_report();
        report.stalled = true;
        assert_eq!(report.verify(), Err(VerificationError::Stalled(18)));

        let mut report = located_report();
        report.agents[1].destroyed_at = None;
        assert_eq!(
            report.verify(),
            Err(VerificationError::WrongCasualties {
                expected: 1,
                found: 0
            })
        );
    }

    #[test]
    fn test_verify_clear_ring() {
        let mut report = located_report();
        report.black_hole = None;
        report.agents[1] = agent(1);
        report.agents[0].outcome = Some(Outcome::RingClear { at: NodeId(2) });
        report.node_states = vec![NodeState::Clean; 5];

        assert_eq!(report.verify(), Ok(()));

        report.node_states[3] = NodeState::Unknown;
        assert_eq!(report.verify(), Err(VerificationError::Unexplored(NodeId(3))));
    }
}
