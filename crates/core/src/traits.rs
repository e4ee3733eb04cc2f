//! Core traits for state machines.

use crate::{Action, Event, Site};
use std::time::Duration;

/// A state machine that processes events.
///
/// Every protocol participant is implemented as a state machine that is:
///
/// - **Synchronous**: No async, no `.await`
/// - **Deterministic**: Same state + site + event = same actions
/// - **Local**: Touches nothing but itself and the [`Site`] it is handed
///
/// # Example
///
/// ```ignore
/// impl StateMachine for BlackHoleSearchAgent {
///     fn handle(&mut self, event: Event, site: &mut Site<'_>) -> Vec<Action> {
///         match event {
///             Event::Init => self.on_init(site),
///             Event::Arrived { port } => self.on_arrived(site, port),
///             Event::BoardUpdated => self.on_board_updated(site),
///         }
///     }
///
///     fn set_time(&mut self, now: Duration) {
///         self.now = now;
///     }
///
///     fn now(&self) -> Duration {
///         self.now
///     }
/// }
/// ```
pub trait StateMachine {
    /// Process an event at the node described by `site`, returning actions
    /// to perform.
    ///
    /// # Guarantees
    ///
    /// - **Synchronous**: This method never blocks or awaits
    /// - **Exclusive**: No other participant touches `site` during the call
    /// - **No movement**: Relocation happens only through returned actions
    ///
    /// # Arguments
    ///
    /// * `event` - The event to process
    /// * `site` - The node the participant currently occupies
    ///
    /// # Returns
    ///
    /// A list of actions for the runner to execute. Actions may include:
    /// - Moving across a port
    /// - Waiting for the local whiteboard to change
    /// - Halting with an outcome
    fn handle(&mut self, event: Event, site: &mut Site<'_>) -> Vec<Action>;

    /// Set the current time.
    ///
    /// Called by the runner before each `handle()` call to provide the
    /// current simulation time.
    fn set_time(&mut self, now: Duration);

    /// Get the current time.
    ///
    /// Returns the time that was last set via `set_time()`.
    fn now(&self) -> Duration;
}
