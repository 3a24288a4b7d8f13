//! Per-node route snapshot for reporting.

use serde::Serialize;
use std::fmt;
use stp_core::Node;
use stp_types::NextHop;

/// One node's final belief.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    /// Display label (name, or numeric id when unnamed).
    pub node: String,
    pub id: u64,
    pub root_id: u64,
    pub cost: u64,
    /// Label of the next hop, `None` when the node believes it is the root.
    pub next_hop: Option<String>,
    pub next_hop_id: Option<u64>,
}

impl RouteEntry {
    pub fn is_root(&self) -> bool {
        self.next_hop.is_none()
    }
}

/// Routes of every node, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub(crate) fn from_nodes(nodes: &[Node]) -> Self {
        let entries = nodes
            .iter()
            .map(|node| {
                let next_hop = match node.next_hop() {
                    NextHop::Root => None,
                    NextHop::Via { index, .. } => nodes.get(index.as_usize()),
                };
                RouteEntry {
                    node: node.label(),
                    id: node.id().0,
                    root_id: node.root_id().0,
                    cost: node.cost(),
                    next_hop: next_hop.map(Node::label),
                    next_hop_id: next_hop.map(|n| n.id().0),
                }
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find an entry by node label.
    pub fn get(&self, node: &str) -> Option<&RouteEntry> {
        self.entries.iter().find(|e| e.node == node)
    }

    /// One `<name>-><next hop>` line per node, `Root` for self-rooted nodes.
    ///
    /// With `show_costs`, each line also carries the believed root id and cost.
    pub fn render(&self, show_costs: bool) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let hop = entry.next_hop.as_deref().unwrap_or("Root");
            out.push_str(&entry.node);
            out.push_str("->");
            out.push_str(hop);
            if show_costs {
                out.push_str(&format!(" (root {}, cost {})", entry.root_id, entry.cost));
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}
