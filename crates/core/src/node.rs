//! Per-node routing state and the update rule.

use crate::{InboundMessage, OutboundMessage, StateMachine};
use stp_types::{Cost, NextHop, NodeId, NodeIndex, RouteState, Weight};
use tracing::{trace, warn};

/// One entry of a node's neighbor list.
///
/// Holds the neighbor's arena handle and protocol id, never the neighbor
/// itself; the coordinator owns every node for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborLink {
    pub index: NodeIndex,
    pub id: NodeId,
    pub weight: Weight,
}

/// Which rule a buffered message triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateRule {
    /// Advertised root is smaller than ours.
    BetterRoot,
    /// Same root, strictly cheaper path.
    BetterCost,
    /// Same root, same cost, sender id smaller than the current next hop's.
    TieBreak,
    /// No effect.
    Discarded,
}

/// Per-rule counts from one `apply_messages` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub better_root: u64,
    pub better_cost: u64,
    pub tie_break: u64,
    pub discarded: u64,
}

impl UpdateSummary {
    /// Whether any rule other than discard fired.
    pub fn changed(&self) -> bool {
        self.better_root + self.better_cost + self.tie_break > 0
    }

    /// Number of messages that were applied or discarded.
    pub fn messages(&self) -> u64 {
        self.better_root + self.better_cost + self.tie_break + self.discarded
    }

    fn record(&mut self, rule: UpdateRule) {
        match rule {
            UpdateRule::BetterRoot => self.better_root += 1,
            UpdateRule::BetterCost => self.better_cost += 1,
            UpdateRule::TieBreak => self.tie_break += 1,
            UpdateRule::Discarded => self.discarded += 1,
        }
    }
}

impl std::ops::AddAssign for UpdateSummary {
    fn add_assign(&mut self, other: Self) {
        self.better_root += other.better_root;
        self.better_cost += other.better_cost;
        self.tie_break += other.tie_break;
        self.discarded += other.discarded;
    }
}

/// A bridge taking part in root selection.
#[derive(Debug, Clone)]
pub struct Node {
    index: NodeIndex,
    id: NodeId,
    name: Option<String>,
    state: RouteState,
    neighbors: Vec<NeighborLink>,
    inbox: Vec<InboundMessage>,
}

impl Node {
    /// Create a node that believes itself to be the root at cost zero.
    pub fn new(index: NodeIndex, id: NodeId, name: Option<String>) -> Self {
        Self {
            index,
            id,
            name,
            state: RouteState::initial(id),
            neighbors: Vec::new(),
            inbox: Vec::new(),
        }
    }

    pub fn index(&self) -> NodeIndex {
        self.index
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Display label: the name when present, the numeric id otherwise.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.id.to_string(),
        }
    }

    pub fn state(&self) -> &RouteState {
        &self.state
    }

    pub fn root_id(&self) -> NodeId {
        self.state.root_id
    }

    pub fn cost(&self) -> Cost {
        self.state.cost
    }

    pub fn next_hop(&self) -> NextHop {
        self.state.next_hop
    }

    pub fn neighbors(&self) -> &[NeighborLink] {
        &self.neighbors
    }

    /// Messages buffered since the last `apply_messages`.
    pub fn inbox(&self) -> &[InboundMessage] {
        &self.inbox
    }

    /// Append a neighbor link.
    ///
    /// Only one direction is recorded; whoever builds the graph calls this for
    /// both endpoints.
    pub fn add_neighbor(&mut self, other: NodeIndex, other_id: NodeId, weight: Weight) {
        self.neighbors.push(NeighborLink {
            index: other,
            id: other_id,
            weight,
        });
    }

    /// Apply buffered messages and report whether the route changed.
    pub fn update_state(&mut self) -> bool {
        self.apply_messages().changed()
    }

    /// Point `next_hop` at the neighbor whose id is `node_id`.
    ///
    /// Returns `false` and leaves `next_hop` untouched if no neighbor has that id.
    pub fn add_next_hop(&mut self, node_id: NodeId) -> bool {
        match self.neighbors.iter().find(|n| n.id == node_id) {
            Some(link) => {
                self.state.next_hop = NextHop::Via {
                    index: link.index,
                    id: link.id,
                };
                true
            }
            None => false,
        }
    }

    /// Evaluate one buffered message against the current state.
    fn classify(&self, message: &InboundMessage) -> UpdateRule {
        let total = message.total_cost();
        if message.root_id < self.state.root_id {
            return UpdateRule::BetterRoot;
        }
        if message.root_id != self.state.root_id {
            return UpdateRule::Discarded;
        }
        if total < self.state.cost {
            return UpdateRule::BetterCost;
        }
        match self.state.next_hop {
            NextHop::Via { id, .. } if total == self.state.cost && message.sender < id => {
                UpdateRule::TieBreak
            }
            _ => UpdateRule::Discarded,
        }
    }

    fn adopt_sender(&mut self, sender: NodeId) {
        if !self.add_next_hop(sender) {
            warn!(
                node = %self.id,
                sender = %sender,
                "Message sender is not a neighbor, next hop unchanged"
            );
            debug_assert!(false, "sender {sender} is not a neighbor of {}", self.id);
        }
    }
}

impl StateMachine for Node {
    fn send_message(&self) -> Vec<OutboundMessage> {
        self.neighbors
            .iter()
            .map(|link| OutboundMessage {
                to: link.index,
                root_id: self.state.root_id,
                cost: self.state.cost,
                link_weight: link.weight,
                sender: self.id,
            })
            .collect()
    }

    fn receive_message(&mut self, message: InboundMessage) {
        self.inbox.push(message);
    }

    fn apply_messages(&mut self) -> UpdateSummary {
        let mut summary = UpdateSummary::default();
        let inbox = std::mem::take(&mut self.inbox);

        for message in &inbox {
            let rule = self.classify(message);
            let before = self.state;
            match rule {
                UpdateRule::BetterRoot => {
                    self.state.root_id = message.root_id;
                    self.state.cost = message.total_cost();
                    self.adopt_sender(message.sender);
                }
                UpdateRule::BetterCost => {
                    self.state.cost = message.total_cost();
                    self.adopt_sender(message.sender);
                }
                UpdateRule::TieBreak => {
                    self.adopt_sender(message.sender);
                }
                UpdateRule::Discarded => {}
            }
            if rule != UpdateRule::Discarded {
                trace!(
                    node = %self.id,
                    ?rule,
                    sender = %message.sender,
                    old_root = %before.root_id,
                    new_root = %self.state.root_id,
                    old_cost = before.cost,
                    new_cost = self.state.cost,
                    "Route updated"
                );
            }
            summary.record(rule);
        }

        // Reuse the allocation for the next round.
        self.inbox = inbox;
        self.inbox.clear();
        summary
    }
}
