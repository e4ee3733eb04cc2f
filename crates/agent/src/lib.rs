//! Black-hole search agent.
//!
//! Two identical agents start on the same node of a ring whose size they
//! know. One node is a black hole that destroys whatever enters it. The
//! agents split the ring between them and explore it with cautious steps,
//! leaving records on each node's whiteboard, until one of them can prove
//! where the hole is.
//!
//! # Architecture
//!
//! The agent is a synchronous [`StateMachine`](ringscout_core::StateMachine):
//!
//! - `Event::Init` → claim a partition and a direction, move out
//! - `Event::Arrived` → dispatch on the current [`Phase`]
//! - `Event::BoardUpdated` → re-evaluate a deferred frontier
//!
//! Movement, waiting and termination are returned as `Action`s.

mod partition;
mod phase;
mod state;

pub use partition::{initial_shares, rebalanced_share};
pub use phase::Phase;
pub use state::BlackHoleSearchAgent;
