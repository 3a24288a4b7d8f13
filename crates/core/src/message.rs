//! Root advertisements exchanged between neighbors.

use stp_types::{Cost, NodeId, NodeIndex, Weight};

/// A (root, cost) advertisement addressed to one neighbor.
///
/// The link weight is attached at emission time, so the receiver computes
/// `total_cost = cost + link_weight` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Arena handle of the receiving neighbor.
    pub to: NodeIndex,
    /// Sender's believed root.
    pub root_id: NodeId,
    /// Sender's cost to that root.
    pub cost: Cost,
    /// Weight of the link the message travels over.
    pub link_weight: Weight,
    /// Sender's protocol id.
    pub sender: NodeId,
}

impl OutboundMessage {
    /// Strip the addressing, leaving what the receiver buffers.
    pub fn into_inbound(self) -> InboundMessage {
        InboundMessage {
            root_id: self.root_id,
            cost: self.cost,
            link_weight: self.link_weight,
            sender: self.sender,
        }
    }
}

/// A buffered advertisement: `(root_id, cost, link_weight, sender)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InboundMessage {
    pub root_id: NodeId,
    pub cost: Cost,
    pub link_weight: Weight,
    pub sender: NodeId,
}

impl InboundMessage {
    /// Cost of reaching the advertised root through the sender.
    pub fn total_cost(&self) -> Cost {
        self.cost.saturating_add(self.link_weight)
    }
}
