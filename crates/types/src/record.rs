//! Whiteboard record variants.

use crate::PortId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single entry on a node's whiteboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    /// An agent left through this port and has not come back to confirm it.
    Active { port: PortId },

    /// The edge behind this port has been crossed and confirmed.
    Safe { port: PortId },

    /// Work reallocation marker left at a stalled frontier.
    ///
    /// The partner that later confirms this frontier subtracts `share` from
    /// its own remaining work and adopts `round`.
    Round { round: u64, share: u64 },
}

impl Record {
    /// Port this record refers to, if any.
    pub fn port(&self) -> Option<PortId> {
        match self {
            Record::Active { port } | Record::Safe { port } => Some(*port),
            Record::Round { .. } => None,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Active { port } => write!(f, "active:{}", port.0),
            Record::Safe { port } => write!(f, "safe:{}", port.0),
            Record::Round { round, share } => write!(f, "round:{}:{}", round, share),
        }
    }
}
