//! Event queue ordering.

use ringscout_core::Event;
use ringscout_types::{AgentId, NodeId};
use std::collections::BTreeMap;
use std::time::Duration;

/// Delivery priority within one instant. Lower values run first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventPriority {
    /// Agent placement. Both agents initialise before anything moves.
    Init = 0,
    /// Arrivals and board-update wake-ups.
    Delivery = 1,
}

impl EventPriority {
    /// Priority of an event kind.
    pub fn of(event: &Event) -> Self {
        match event {
            Event::Init => EventPriority::Init,
            Event::Arrived { .. } | Event::BoardUpdated => EventPriority::Delivery,
        }
    }
}

/// Key for ordering events in the simulation queue.
///
/// Events are ordered by:
/// 1. Time (earlier first)
/// 2. Priority (placement before deliveries at the same instant)
/// 3. Sequence (insertion order, for determinism)
///
/// The agent is carried along so the runner knows who the event is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EventKey {
    /// When the event is delivered.
    pub time: Duration,
    /// Ordering within one instant.
    pub priority: EventPriority,
    /// Insertion counter.
    pub sequence: u64,
    /// Recipient.
    pub agent: AgentId,
}

/// What to hand the agent, and where it is standing when it gets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub node: NodeId,
    pub event: Event,
}

/// Time-ordered queue of pending deliveries.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: BTreeMap<EventKey, Delivery>,
    sequence: u64,
}

impl EventQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` for `agent` at `node`, delivered at `time`.
    pub fn schedule(&mut self, time: Duration, agent: AgentId, node: NodeId, event: Event) -> EventKey {
        let key = EventKey {
            time,
            priority: EventPriority::of(&event),
            sequence: self.sequence,
            agent,
        };
        self.sequence += 1;
        self.events.insert(key, Delivery { node, event });
        key
    }

    /// Remove and return the earliest event.
    pub fn pop(&mut self) -> Option<(EventKey, Delivery)> {
        self.events.pop_first()
    }

    /// Time of the earliest event.
    pub fn peek_time(&self) -> Option<Duration> {
        self.events.keys().next().map(|key| key.time)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Pending events addressed to `agent`.
    pub fn pending_for(&self, agent: AgentId) -> usize {
        self.events.keys().filter(|key| key.agent == agent).count()
    }
}
