//! Round coordinator.
//!
//! Each round runs the broadcast phase on every node, delivers every emitted
//! message through the [`MessageQueue`], then runs the apply phase on every
//! node. Phases are handed to a [`Dispatch`], which may parallelise inside a
//! phase but always returns only once the whole phase is done.

use crate::message_queue::MessageQueue;
use crate::report::RouteTable;
use stp_core::{Node, StateMachine, UpdateSummary};
use stp_dispatch::Dispatch;
use stp_dispatch_sync::SyncDispatch;
use stp_types::{NodeIndex, Topology};
use tracing::{debug, info, trace, warn};

/// Coordinator settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Maximum rounds per [`SimulationRunner::run`] call.
    ///
    /// Defaults to the node count plus one: in an N-node graph flooding needs
    /// at most N - 1 useful rounds, plus one quiet round to observe
    /// convergence.
    pub max_rounds: Option<u64>,
}

impl SimulationConfig {
    pub fn with_max_rounds(mut self, max_rounds: u64) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }
}

/// How a [`SimulationRunner::run`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A full round changed nothing.
    Converged { rounds: u64 },
    /// The round limit was hit while nodes were still changing.
    RoundLimitReached { rounds: u64 },
}

impl RunOutcome {
    /// Rounds executed by the run, including the final quiet round.
    pub fn rounds(&self) -> u64 {
        match self {
            RunOutcome::Converged { rounds } | RunOutcome::RoundLimitReached { rounds } => *rounds,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, RunOutcome::Converged { .. })
    }
}

/// Result of a single round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundReport {
    /// 1-based round number over the runner's lifetime.
    pub round: u64,
    /// Messages emitted in the broadcast phase.
    pub messages: u64,
    /// Nodes whose route changed in the apply phase.
    pub nodes_changed: u64,
    /// Rule counts across every node.
    pub summary: UpdateSummary,
}

impl RoundReport {
    /// The round-level `any_changed` flag.
    pub fn changed(&self) -> bool {
        self.nodes_changed > 0
    }
}

/// Statistics collected over the runner's lifetime.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SimulationStats {
    /// Rounds executed.
    pub rounds: u64,
    /// Messages emitted in broadcast phases.
    pub messages_sent: u64,
    /// Messages placed in an inbox.
    pub messages_delivered: u64,
    /// Messages addressed to a handle outside the arena.
    pub messages_dropped: u64,
    /// Node-rounds in which the node's route changed.
    pub route_changes: u64,
    /// Rule counts across all rounds.
    pub updates: UpdateSummary,
}

/// Deterministic round coordinator.
///
/// Owns every node for the whole run. Nodes never reach each other directly;
/// the runner collects phase-1 output and hands each node only its own inbox.
pub struct SimulationRunner<D: Dispatch = SyncDispatch> {
    /// All nodes, indexed by `NodeIndex`.
    nodes: Vec<Node>,

    /// Phase executor.
    dispatch: D,

    /// Messages between broadcast and delivery.
    queue: MessageQueue,

    config: SimulationConfig,

    stats: SimulationStats,
}

impl SimulationRunner<SyncDispatch> {
    /// Create a single-threaded runner with default settings.
    pub fn new(topology: &Topology) -> Self {
        Self::with_dispatch(topology, SyncDispatch::new(), SimulationConfig::default())
    }
}

impl<D: Dispatch> SimulationRunner<D> {
    /// Create a runner over `topology` using `dispatch` for both phases.
    ///
    /// Acts as the topology builder: every link is registered on both
    /// endpoints.
    pub fn with_dispatch(topology: &Topology, dispatch: D, config: SimulationConfig) -> Self {
        let mut nodes: Vec<Node> = topology
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, decl)| Node::new(NodeIndex::from(i), decl.id, decl.name.clone()))
            .collect();

        for link in topology.links() {
            let id_a = nodes[link.a.as_usize()].id();
            let id_b = nodes[link.b.as_usize()].id();
            nodes[link.a.as_usize()].add_neighbor(link.b, id_b, link.weight);
            nodes[link.b.as_usize()].add_neighbor(link.a, id_a, link.weight);
        }

        debug!(
            nodes = nodes.len(),
            links = topology.links().len(),
            parallelism = dispatch.parallelism(),
            "Simulation runner created"
        );

        Self {
            nodes,
            dispatch,
            queue: MessageQueue::new(),
            config,
            stats: SimulationStats::default(),
        }
    }

    /// Get statistics.
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// Get a reference to a node by index.
    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index.as_usize())
    }

    /// All nodes in input order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Maximum rounds a single `run` call may execute.
    pub fn round_limit(&self) -> u64 {
        self.config
            .max_rounds
            .unwrap_or(self.nodes.len() as u64 + 1)
    }

    /// Current per-node routes, in input order.
    pub fn routes(&self) -> RouteTable {
        RouteTable::from_nodes(&self.nodes)
    }

    /// Run rounds until one changes nothing or the round limit is reached.
    pub fn run(&mut self) -> RunOutcome {
        let limit = self.round_limit();
        let mut executed = 0;

        let outcome = loop {
            if executed >= limit {
                warn!(
                    rounds = executed,
                    limit, "Round limit reached before convergence"
                );
                break RunOutcome::RoundLimitReached { rounds: executed };
            }
            let report = self.step_round();
            executed += 1;
            if !report.changed() {
                break RunOutcome::Converged { rounds: executed };
            }
        };

        info!(
            ?outcome,
            total_rounds = self.stats.rounds,
            messages = self.stats.messages_sent,
            route_changes = self.stats.route_changes,
            "Simulation finished"
        );
        outcome
    }

    /// Execute exactly one broadcast / deliver / apply round.
    pub fn step_round(&mut self) -> RoundReport {
        let round = self.stats.rounds + 1;

        // Phase 1: every node reads only its own state from the previous round.
        let outbound = self.dispatch.map_nodes(&self.nodes, |node| node.send_message());

        let mut messages = 0u64;
        for batch in outbound {
            for message in batch {
                self.queue.push(message);
                messages += 1;
            }
        }

        // Delivery: each node gets only its own inbox.
        for (key, message) in self.queue.drain() {
            match self.nodes.get_mut(key.to.as_usize()) {
                Some(node) => {
                    node.receive_message(message.into_inbound());
                    self.stats.messages_delivered += 1;
                }
                None => {
                    warn!(to = %key.to, "Dropping message for unknown node");
                    self.stats.messages_dropped += 1;
                }
            }
        }

        // Phase 2: every node applies its inbox.
        let summaries = self
            .dispatch
            .map_nodes_mut(&mut self.nodes, |node| node.apply_messages());

        let mut report = RoundReport {
            round,
            messages,
            ..Default::default()
        };
        for (node, summary) in self.nodes.iter().zip(summaries) {
            if summary.changed() {
                report.nodes_changed += 1;
                trace!(
                    round,
                    node = %node.id(),
                    root = %node.root_id(),
                    cost = node.cost(),
                    "Node changed route"
                );
            }
            report.summary += summary;
        }

        self.stats.rounds = round;
        self.stats.messages_sent += messages;
        self.stats.route_changes += report.nodes_changed;
        self.stats.updates += report.summary;

        debug!(
            round,
            messages,
            nodes_changed = report.nodes_changed,
            better_root = report.summary.better_root,
            better_cost = report.summary.better_cost,
            tie_break = report.summary.tie_break,
            "Round complete"
        );
        report
    }
}
