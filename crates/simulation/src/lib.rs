//! Deterministic simulation harness.
//!
//! Runs two black-hole search agents on a ring. Given the same seed it
//! produces identical results every run.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  SimulationRunner                       │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Event Queue (BTreeMap<EventKey, Delivery>)     │ │
//! │  │     Ordered by: time, priority, sequence           │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     agents: IndexMap<AgentId, BlackHoleSearchAgent>│ │
//! │  │     Each event lends the agent one node (Site)     │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Actions → moves, board-update waits, halts     │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! An agent that moves into the black hole is dropped without ever seeing
//! the node. Because the queue hands out one event at a time, at most one
//! agent executes at any node at any instant.

mod config;
mod error;
mod event_queue;
mod network;
mod report;
mod runner;
mod trace;
mod world;

pub use config::SimulationConfig;
pub use error::{InvariantViolation, SimulationError};
pub use event_queue::{Delivery, EventKey, EventPriority, EventQueue};
pub use network::{NetworkConfig, SimulatedNetwork};
pub use report::{AgentReport, SimulationReport, VerificationError};
pub use runner::{SimulationRunner, SimulationStats};
pub use trace::{TraceEntry, TraceKind};
pub use world::RingWorld;
