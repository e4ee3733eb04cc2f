//! Agent state machine.
//!
//! # Whiteboard protocol
//!
//! - `Active(p)`: someone left through `p` and has not confirmed it yet.
//! - `Safe(p)`: the edge behind `p` was crossed and survived.
//! - `Round(n, share)`: left at a stalled frontier by the partner, who took
//!   `share` nodes of work off whoever owns that frontier.
//!
//! # Cautious walk
//!
//! An agent never pushes past a node it has not confirmed. On reaching a new
//! node it marks the arrival edge safe, steps back to turn the `Active`
//! claim on the previous node into `Safe`, and only then returns and claims
//! the next edge. If it dies in the black hole, the claim it left behind
//! stays `Active` forever, which is exactly what the partner looks for.

use crate::partition::{initial_shares, rebalanced_share};
use crate::Phase;
use ringscout_core::{Action, Event, Site, StateMachine};
use ringscout_types::{AgentId, AgentState, NodeId, NodeState, Outcome, PortId, Record, SafeMark};
use std::time::Duration;
use tracing::{debug, info, warn};

/// One of the two black-hole search agents.
#[derive(Debug, Clone)]
pub struct BlackHoleSearchAgent {
    /// Agent identifier (diagnostics only; the protocol is anonymous).
    id: AgentId,

    /// Externally visible state.
    state: AgentState,

    /// Current sub-phase.
    phase: Phase,

    /// Reallocation round, starting at 1.
    round: u64,

    /// Nodes still to confirm in the current partition.
    num_req: u64,

    /// Hops counted while traversing back or returning to the boundary.
    num_done: u64,

    /// Where the black hole was declared: node and the port leading into it.
    declaration: Option<(NodeId, PortId)>,

    /// Set once the agent halts.
    outcome: Option<Outcome>,

    /// Number of moves issued.
    moves: u64,

    /// Current simulation time.
    now: Duration,
}

impl BlackHoleSearchAgent {
    /// Create an agent waiting for `Event::Init`.
    pub fn new(id: AgentId) -> Self {
        Self {
            id,
            state: AgentState::Working,
            phase: Phase::Idle,
            round: 0,
            num_req: 0,
            num_done: 0,
            declaration: None,
            outcome: None,
            moves: 0,
            now: Duration::ZERO,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════════════

    /// Get the agent ID.
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Get the externally visible state.
    pub fn state(&self) -> AgentState {
        self.state
    }

    /// Get the current sub-phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Get the current reallocation round.
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Get the number of nodes still to confirm in this round.
    pub fn num_req(&self) -> u64 {
        self.num_req
    }

    /// Get the hop counter of the current walk.
    pub fn num_done(&self) -> u64 {
        self.num_done
    }

    /// Get how the agent finished, once halted.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Get the number of moves issued so far.
    pub fn moves(&self) -> u64 {
        self.moves
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Event Handlers
    // ═══════════════════════════════════════════════════════════════════════════

    /// Claim a partition and a direction on the home node.
    ///
    /// The first agent finds an empty board and takes the first port; the
    /// second reads the first agent's claim and takes the other one.
    fn on_init(&mut self, site: &mut Site<'_>) -> Vec<Action> {
        if self.phase != Phase::Idle {
            warn!(agent = %self.id, phase = %self.phase, "Init delivered twice, ignoring");
            return vec![];
        }

        self.state = AgentState::Working;
        self.round = 1;
        site.set_node_state(NodeState::Clean);

        let (odd, even) = initial_shares(site.network_size());
        let claimed = site.board().records().find_map(Record::port);
        let port = match claimed {
            None => {
                self.num_req = odd;
                let [first, _] = site.out_ports();
                first
            }
            Some(taken) => {
                self.num_req = even;
                site.other_port(taken)
            }
        };

        self.claim(site, port);
        info!(
            agent = %self.id,
            node = %site.node(),
            port = %port,
            num_req = self.num_req,
            "Claimed initial partition"
        );

        self.phase = Phase::Exploring;
        vec![Action::Move { port }]
    }

    fn on_arrived(&mut self, site: &mut Site<'_>, port: PortId) -> Vec<Action> {
        if !self.phase.expects_arrival() {
            warn!(
                agent = %self.id,
                node = %site.node(),
                phase = %self.phase,
                "Arrival while not in transit, ignoring"
            );
            return vec![];
        }

        match self.phase {
            Phase::TraversingBack => {
                let next = site.other_port(port);
                self.traverse_back(site, next)
            }
            Phase::ReturningToBoundary => {
                let next = site.other_port(port);
                self.return_to_boundary(site, next)
            }
            _ => self.explore(site, port),
        }
    }

    fn on_board_updated(&mut self, site: &mut Site<'_>) -> Vec<Action> {
        match self.phase {
            Phase::Waiting { arrived_on } => {
                debug!(agent = %self.id, node = %site.node(), "Board changed, re-evaluating frontier");
                self.phase = Phase::Advancing;
                self.advance(site, arrived_on)
            }
            _ => {
                debug!(agent = %self.id, phase = %self.phase, "Board update while not waiting");
                vec![]
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Frontier Exploration
    // ═══════════════════════════════════════════════════════════════════════════

    fn explore(&mut self, site: &mut Site<'_>, port: PortId) -> Vec<Action> {
        if site.board().is_empty() {
            return self.first_visit(site, port);
        }
        match self.phase {
            Phase::Confirming => self.confirm_edge(site, port),
            Phase::Advancing => self.advance(site, port),
            // The partner has been here from the other side.
            _ => self.first_visit(site, port),
        }
    }

    /// Mark the edge just crossed as safe and step back over it.
    fn first_visit(&mut self, site: &mut Site<'_>, port: PortId) -> Vec<Action> {
        if site.node_state() == NodeState::Unknown {
            site.set_node_state(NodeState::Clean);
        }
        site.board_mut().mark_safe(port);
        debug!(agent = %self.id, node = %site.node(), port = %port, "First visit, stepping back to confirm");

        self.phase = Phase::Confirming;
        vec![Action::Move { port }]
    }

    /// On the previous node: turn the claim on `port` into `Safe`, pick up
    /// any reallocation left by the partner, and go forward again.
    fn confirm_edge(&mut self, site: &mut Site<'_>, port: PortId) -> Vec<Action> {
        for (round, share) in site.board_mut().take_round_markers() {
            self.num_req = self.num_req.saturating_sub(share);
            self.round = round;
            info!(
                agent = %self.id,
                node = %site.node(),
                round,
                share,
                num_req = self.num_req,
                "Partner took over part of this partition"
            );
        }

        if site.board_mut().mark_safe(port) == SafeMark::AlreadySafe {
            debug!(agent = %self.id, node = %site.node(), port = %port, "Edge already confirmed");
        }
        self.num_req = self.num_req.saturating_sub(1);
        debug!(agent = %self.id, node = %site.node(), port = %port, num_req = self.num_req, "Edge confirmed");

        self.phase = Phase::Advancing;
        vec![Action::Move { port }]
    }

    /// Back on a confirmed node: finish, wait for the partner, or claim the
    /// next edge.
    fn advance(&mut self, site: &mut Site<'_>, port: PortId) -> Vec<Action> {
        if self.num_req == 0 {
            info!(
                agent = %self.id,
                node = %site.node(),
                round = self.round,
                "Partition exhausted, traversing back"
            );
            self.phase = Phase::TraversingBack;
            self.num_done = 0;
            return self.traverse_back(site, port);
        }

        let other = site.other_port(port);
        let board = site.board();
        if board.is_active(port) {
            warn!(
                agent = %self.id,
                node = %site.node(),
                port = %port,
                "Invariant violation: active claim on the port just confirmed"
            );
        }

        if board.is_active(other) {
            info!(
                agent = %self.id,
                node = %site.node(),
                port = %other,
                "Partner is exploring beyond this node, waiting"
            );
            self.phase = Phase::Waiting { arrived_on: port };
            return vec![Action::AwaitBoardUpdate];
        }

        if board.is_safe(other) {
            info!(agent = %self.id, node = %site.node(), "Frontiers met, ring is clear");
            let outcome = Outcome::RingClear { at: site.node() };
            return self.finish(outcome);
        }

        self.claim(site, other);
        self.phase = Phase::Exploring;
        vec![Action::Move { port: other }]
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Traversal
    // ═══════════════════════════════════════════════════════════════════════════

    /// Walk backwards over safe edges until the partner's frontier.
    ///
    /// `toward` is the port to leave through next.
    fn traverse_back(&mut self, site: &mut Site<'_>, toward: PortId) -> Vec<Action> {
        let n = u64::from(site.network_size());
        self.num_done += 1;

        if site.board().is_safe(toward) {
            if self.num_done >= n {
                info!(agent = %self.id, node = %site.node(), "Walked a full lap of safe edges");
                let outcome = Outcome::RingClear { at: site.node() };
                return self.finish(outcome);
            }
            return vec![Action::Move { port: toward }];
        }

        if self.num_done == n - 1 {
            // Every other node is safe: the only unexplored one is the hole.
            self.state = AgentState::FoundBlackHole;
            self.declaration = Some((site.node(), toward));
            site.set_node_state(NodeState::EdgeToBlackHole);
            info!(
                agent = %self.id,
                node = %site.node(),
                port = %toward,
                "Black hole located"
            );
        } else {
            let share = rebalanced_share(n, self.num_done);
            self.round += 1;
            self.num_req = share;
            let marker = Record::Round {
                round: self.round,
                share,
            };
            if let Err(e) = site.board_mut().append(marker) {
                warn!(agent = %self.id, node = %site.node(), error = %e, "Could not post round marker");
            }
            info!(
                agent = %self.id,
                node = %site.node(),
                round = self.round,
                share,
                remaining = n - self.num_done,
                "Found stalled frontier, taking over half of the remaining work"
            );
        }

        self.num_done = 0;
        self.phase = Phase::ReturningToBoundary;
        let back = site.other_port(toward);
        self.return_to_boundary(site, back)
    }

    /// Walk over safe edges to this agent's own frontier.
    ///
    /// `toward` is the port to leave through next.
    fn return_to_boundary(&mut self, site: &mut Site<'_>, toward: PortId) -> Vec<Action> {
        let n = u64::from(site.network_size());

        if site.board().is_safe(toward) {
            self.num_done += 1;
            if self.num_done >= n {
                info!(agent = %self.id, node = %site.node(), "Walked a full lap of safe edges");
                let outcome = Outcome::RingClear { at: site.node() };
                return self.finish(outcome);
            }
            return vec![Action::Move { port: toward }];
        }
        self.num_done = 0;

        if self.state == AgentState::FoundBlackHole {
            site.set_node_state(NodeState::EdgeToBlackHole);
            let (declared_at, entry_port) = self.declaration.unwrap_or((site.node(), toward));
            let outcome = Outcome::BlackHoleLocated {
                declared_at,
                entry_port,
                resting_at: site.node(),
            };
            return self.finish(outcome);
        }

        let pending = site.board().active_ports().next();
        let port = match pending {
            Some(port) => port,
            None => {
                self.claim(site, toward);
                toward
            }
        };
        info!(
            agent = %self.id,
            node = %site.node(),
            port = %port,
            num_req = self.num_req,
            "Back at own frontier, resuming exploration"
        );

        self.phase = Phase::Exploring;
        vec![Action::Move { port }]
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Helpers
    // ═══════════════════════════════════════════════════════════════════════════

    fn claim(&self, site: &mut Site<'_>, port: PortId) {
        if let Err(e) = site.board_mut().append(Record::Active { port }) {
            warn!(
                agent = %self.id,
                node = %site.node(),
                error = %e,
                "Invariant violation: could not claim port"
            );
        }
    }

    fn finish(&mut self, outcome: Outcome) -> Vec<Action> {
        self.state = AgentState::Done;
        self.phase = Phase::Halted;
        self.outcome = Some(outcome);
        info!(agent = %self.id, %outcome, "Agent halted");
        vec![Action::Halt { outcome }]
    }
}

impl StateMachine for BlackHoleSearchAgent {
    fn handle(&mut self, event: Event, site: &mut Site<'_>) -> Vec<Action> {
        if self.state.is_terminal() {
            debug!(agent = %self.id, event = event.type_name(), "Halted, ignoring event");
            return vec![];
        }

        let actions = match event {
            Event::Init => self.on_init(site),
            Event::Arrived { port } => self.on_arrived(site, port),
            Event::BoardUpdated => self.on_board_updated(site),
        };

        self.moves += actions.iter().filter(|a| a.is_move()).count() as u64;
        actions
    }

    fn set_time(&mut self, now: Duration) {
        self.now = now;
    }

    fn now(&self) -> Duration {
        self.now
    }
}
