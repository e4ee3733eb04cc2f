//! Event-driven core shared by agents and the harness.
//!
//! An agent is a [`StateMachine`]: the harness hands it an [`Event`] together
//! with the [`Site`] it currently stands on, and gets back a list of
//! [`Action`]s (moves, waits, termination) to carry out.

mod action;
mod event;
mod site;
mod traits;

pub use action::Action;
pub use event::Event;
pub use site::Site;
pub use traits::StateMachine;
