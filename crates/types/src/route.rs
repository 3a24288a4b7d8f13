//! Per-node routing state.

use crate::{Cost, NodeId, NodeIndex};

/// First hop of the believed best path towards the root.
///
/// A node that still believes it is the root has no next hop. The tie-break
/// rule compares against the current next hop's id, so it can only be
/// evaluated on the `Via` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NextHop {
    /// This node believes itself to be the root.
    #[default]
    Root,
    /// Path departs through the neighbor at `index`, whose protocol id is `id`.
    Via { index: NodeIndex, id: NodeId },
}

impl NextHop {
    /// Whether this node believes itself to be the root.
    pub fn is_root(&self) -> bool {
        matches!(self, NextHop::Root)
    }

    /// Arena handle of the next hop, if any.
    pub fn index(&self) -> Option<NodeIndex> {
        match self {
            NextHop::Root => None,
            NextHop::Via { index, .. } => Some(*index),
        }
    }

    /// Protocol id of the next hop, if any.
    pub fn id(&self) -> Option<NodeId> {
        match self {
            NextHop::Root => None,
            NextHop::Via { id, .. } => Some(*id),
        }
    }
}

/// The `(root_id, cost, next_hop)` triple a node currently believes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteState {
    /// Smallest root identifier learned so far. Never increases.
    pub root_id: NodeId,
    /// Cumulative link weight of the best known path to `root_id`.
    pub cost: Cost,
    /// First hop of that path.
    pub next_hop: NextHop,
}

impl RouteState {
    /// Initial state of a node: it is its own root at cost zero.
    pub fn initial(id: NodeId) -> Self {
        Self {
            root_id: id,
            cost: 0,
            next_hop: NextHop::Root,
        }
    }
}
