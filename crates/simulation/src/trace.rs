//! Structured run trace.

use im::Vector;
use ringscout_agent::Phase;
use ringscout_types::{AgentId, NodeId, PortId, Record};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// What happened to an agent at one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceKind {
    Init,
    Arrived { port: PortId },
    BoardUpdated,
    /// Moved into the black hole.
    Destroyed,
}

impl fmt::Display for TraceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceKind::Init => f.write_str("init"),
            TraceKind::Arrived { port } => write!(f, "arrived via {}", port),
            TraceKind::BoardUpdated => f.write_str("board updated"),
            TraceKind::Destroyed => f.write_str("destroyed"),
        }
    }
}

/// One processed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    pub time: Duration,
    pub agent: AgentId,
    pub node: NodeId,
    /// Phase after the event was handled.
    pub phase: Phase,
    pub kind: TraceKind,
    /// The node's board after the event.
    pub board: Vector<Record>,
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>8.3}ms {} @ {}: {} -> {} [",
            self.time.as_secs_f64() * 1000.0,
            self.agent,
            self.node,
            self.kind,
            self.phase
        )?;
        for (i, record) in self.board.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", record)?;
        }
        f.write_str("]")
    }
}
