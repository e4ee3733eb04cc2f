//! Simulation runner.

use crate::{
    AgentReport, EventQueue, RingWorld, SimulatedNetwork, SimulationConfig, SimulationError,
    SimulationReport, TraceEntry, TraceKind,
};
use indexmap::IndexMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ringscout_agent::BlackHoleSearchAgent;
use ringscout_core::{Action, Event, StateMachine};
use ringscout_types::{AgentId, NodeId, Outcome};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Where an agent is between events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location {
    At(NodeId),
    InTransit { to: NodeId },
    Destroyed { at: NodeId },
}

#[derive(Debug)]
struct AgentSlot {
    agent: BlackHoleSearchAgent,
    location: Location,
    finished_at: Option<Duration>,
}

/// Counters collected during a run.
#[derive(Debug, Clone, Default)]
pub struct SimulationStats {
    /// Total events processed, including deliveries to destroyed agents.
    pub events_processed: u64,
    /// Events processed by type.
    pub events_by_type: HashMap<&'static str, u64>,
    /// Total actions returned by agents.
    pub actions_generated: u64,
    /// Agents that registered for a board update.
    pub waits: u64,
    /// Board-update notifications delivered.
    pub wakeups: u64,
}

/// Deterministic runner for one black-hole search scenario.
///
/// Owns the world, both agents and the event queue. Each call to
/// [`step`](Self::step) delivers exactly one event to exactly one agent.
pub struct SimulationRunner {
    config: SimulationConfig,
    world: RingWorld,
    network: SimulatedNetwork,
    rng: ChaCha8Rng,
    queue: EventQueue,
    agents: IndexMap<AgentId, AgentSlot>,
    /// At most one agent waits on a node.
    waiters: HashMap<NodeId, AgentId>,
    now: Duration,
    stats: SimulationStats,
    trace: Vec<TraceEntry>,
}

impl SimulationRunner {
    /// Place two agents on the home node and schedule their initialisation.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        let ring = config.validate()?;
        let world = RingWorld::new(ring.clone(), config.black_hole);
        let network = SimulatedNetwork::new(config.network, ring);
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        let mut queue = EventQueue::new();
        let mut agents = IndexMap::new();
        for id in [AgentId(0), AgentId(1)] {
            agents.insert(
                id,
                AgentSlot {
                    agent: BlackHoleSearchAgent::new(id),
                    location: Location::At(config.home),
                    finished_at: None,
                },
            );
            queue.schedule(Duration::ZERO, id, config.home, Event::Init);
        }

        info!(
            ring_size = config.ring_size,
            home = %config.home,
            black_hole = ?config.black_hole,
            seed = config.seed,
            "Created simulation"
        );

        Ok(Self {
            config,
            world,
            network,
            rng,
            queue,
            agents,
            waiters: HashMap::new(),
            now: Duration::ZERO,
            stats: SimulationStats::default(),
            trace: Vec::new(),
        })
    }

    /// Get the scenario.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Get the world.
    pub fn world(&self) -> &RingWorld {
        &self.world
    }

    /// Get the current simulation time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Get the run statistics.
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// Get the trace recorded so far (empty unless enabled).
    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    /// Get an agent.
    pub fn agent(&self, id: AgentId) -> Option<&BlackHoleSearchAgent> {
        self.agents.get(&id).map(|slot| &slot.agent)
    }

    /// Whether `id` moved into the black hole.
    pub fn is_destroyed(&self, id: AgentId) -> bool {
        matches!(
            self.agents.get(&id).map(|slot| slot.location),
            Some(Location::Destroyed { .. })
        )
    }

    /// Whether any event is still pending.
    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Execution
    // ═══════════════════════════════════════════════════════════════════════════

    /// Deliver the next event. Returns `false` once the queue is empty.
    pub fn step(&mut self) -> Result<bool, SimulationError> {
        let Some((key, delivery)) = self.queue.pop() else {
            return Ok(false);
        };
        self.now = key.time;
        self.stats.events_processed += 1;
        *self
            .stats
            .events_by_type
            .entry(delivery.event.type_name())
            .or_insert(0) += 1;

        let agent_id = key.agent;
        let node = delivery.node;

        if self.world.is_black_hole(node) {
            if let Some(slot) = self.agents.get_mut(&agent_id) {
                slot.location = Location::Destroyed { at: node };
            }
            info!(agent = %agent_id, node = %node, time = ?self.now, "Agent entered the black hole");
            self.record(agent_id, node, TraceKind::Destroyed);
            return Ok(true);
        }

        let Some(slot) = self.agents.get_mut(&agent_id) else {
            warn!(agent = %agent_id, "Event for unknown agent");
            return Ok(true);
        };
        if matches!(slot.location, Location::Destroyed { .. }) {
            warn!(agent = %agent_id, "Event for destroyed agent");
            return Ok(true);
        }
        slot.location = Location::At(node);

        let version_before = self.world.board(node).map(|b| b.version());
        let actions = {
            let mut site = self.world.site(node)?;
            slot.agent.set_time(self.now);
            slot.agent.handle(delivery.event, &mut site)
        };
        self.stats.actions_generated += actions.len() as u64;

        trace!(
            agent = %agent_id,
            node = %node,
            event = delivery.event.type_name(),
            actions = actions.len(),
            "Handled event"
        );

        let kind = match delivery.event {
            Event::Init => TraceKind::Init,
            Event::Arrived { port } => TraceKind::Arrived { port },
            Event::BoardUpdated => TraceKind::BoardUpdated,
        };
        self.record(agent_id, node, kind);

        for action in actions {
            self.process_action(agent_id, node, action)?;
        }

        let version_after = self.world.board(node).map(|b| b.version());
        if version_after != version_before {
            self.notify_waiter(node, agent_id);
        }

        Ok(true)
    }

    /// Run until the queue drains or the event limit is hit.
    pub fn run(&mut self) -> Result<SimulationReport, SimulationError> {
        while self.stats.events_processed < self.config.max_events {
            if !self.step()? {
                break;
            }
        }

        if self.has_pending() {
            warn!(
                events = self.stats.events_processed,
                pending = self.queue.len(),
                "Event limit reached, run stalled"
            );
        }
        Ok(self.report())
    }

    /// Run, checking world invariants after every event.
    pub fn run_checked(&mut self) -> Result<SimulationReport, SimulationError> {
        while self.stats.events_processed < self.config.max_events {
            if !self.step()? {
                break;
            }
            self.world.check_invariants()?;
        }
        Ok(self.report())
    }

    /// Snapshot the current state as a report.
    pub fn report(&self) -> SimulationReport {
        let agents = self
            .agents
            .values()
            .map(|slot| AgentReport {
                id: slot.agent.id(),
                state: slot.agent.state(),
                phase: slot.agent.phase(),
                outcome: slot.agent.outcome(),
                round: slot.agent.round(),
                moves: slot.agent.moves(),
                destroyed_at: match slot.location {
                    Location::Destroyed { at } => Some(at),
                    _ => None,
                },
                finished_at: slot.finished_at,
            })
            .collect();

        SimulationReport {
            ring_size: self.config.ring_size,
            home: self.config.home,
            black_hole: self.config.black_hole,
            seed: self.config.seed,
            agents,
            node_states: self.world.node_states(),
            boards: self.world.boards(),
            events_processed: self.stats.events_processed,
            final_time: self.now,
            stalled: self.has_pending(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Action Processing
    // ═══════════════════════════════════════════════════════════════════════════

    fn process_action(
        &mut self,
        agent_id: AgentId,
        node: NodeId,
        action: Action,
    ) -> Result<(), SimulationError> {
        match action {
            Action::Move { port } => {
                let to = self
                    .network
                    .route(node, port)
                    .map_err(|_| SimulationError::InvalidMove {
                        agent: agent_id,
                        node,
                        port,
                    })?;
                let latency = self.network.sample_latency(&mut self.rng);
                if let Some(slot) = self.agents.get_mut(&agent_id) {
                    slot.location = Location::InTransit { to };
                }
                self.queue
                    .schedule(self.now + latency, agent_id, to, Event::Arrived { port });
                debug!(agent = %agent_id, from = %node, to = %to, port = %port, "Move scheduled");
            }

            Action::AwaitBoardUpdate => {
                self.stats.waits += 1;
                if let Some(previous) = self.waiters.insert(node, agent_id) {
                    if previous != agent_id {
                        warn!(
                            node = %node,
                            replaced = %previous,
                            agent = %agent_id,
                            "Second waiter on one node"
                        );
                    }
                }
                debug!(agent = %agent_id, node = %node, "Waiting for board update");
            }

            Action::Halt { outcome } => {
                if let Some(slot) = self.agents.get_mut(&agent_id) {
                    slot.finished_at = Some(self.now);
                }
                self.log_halt(agent_id, outcome);
            }
        }
        Ok(())
    }

    /// Wake whoever waits on `node`, unless it made the change itself.
    fn notify_waiter(&mut self, node: NodeId, writer: AgentId) {
        match self.waiters.get(&node) {
            Some(&waiter) if waiter != writer => {
                self.waiters.remove(&node);
                self.stats.wakeups += 1;
                self.queue
                    .schedule(self.now, waiter, node, Event::BoardUpdated);
                debug!(agent = %waiter, node = %node, writer = %writer, "Board changed, waking waiter");
            }
            _ => {}
        }
    }

    fn record(&mut self, agent_id: AgentId, node: NodeId, kind: TraceKind) {
        if !self.config.record_trace {
            return;
        }
        let Some(slot) = self.agents.get(&agent_id) else {
            return;
        };
        let board = self
            .world
            .board(node)
            .map(|b| b.snapshot())
            .unwrap_or_default();
        self.trace.push(TraceEntry {
            time: self.now,
            agent: agent_id,
            node,
            phase: slot.agent.phase(),
            kind,
            board,
        });
    }

    fn log_halt(&self, agent_id: AgentId, outcome: Outcome) {
        match outcome {
            Outcome::BlackHoleLocated { .. } => info!(
                agent = %agent_id,
                time = ?self.now,
                %outcome,
                "Black hole located"
            ),
            Outcome::RingClear { .. } => info!(
                agent = %agent_id,
                time = ?self.now,
                %outcome,
                "Ring reported clear"
            ),
        }
    }
}

impl std::fmt::Debug for SimulationRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationRunner")
            .field("config", &self.config)
            .field("now", &self.now)
            .field("pending", &self.queue.len())
            .field("stats", &self.stats)
            .finish()
    }
}
