//! Topology arena.
//!
//! A [`Topology`] is the validated output of topology construction: an ordered
//! list of node declarations plus the undirected weighted links between them.
//! Every link is stored once in [`Topology::links`] and mirrored as a
//! [`Neighbor`] entry on both endpoints, so neighbor lists are always
//! symmetric.

use crate::{Cost, NodeId, NodeIndex, Weight};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Errors raised while assembling a topology.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// Two declarations share the same protocol id.
    #[error("node id {id} is already declared")]
    DuplicateId { id: NodeId },

    /// Two declarations share the same display name.
    #[error("node name '{name}' is already declared")]
    DuplicateName { name: String },

    /// A link endpoint does not exist in the arena.
    #[error("unknown node index {index}")]
    UnknownIndex { index: NodeIndex },

    /// A link connects a node with itself.
    #[error("link from node {id} to itself")]
    SelfLoop { id: NodeId },

    /// The same pair of nodes is linked twice.
    #[error("nodes {a} and {b} are already linked")]
    DuplicateLink { a: NodeId, b: NodeId },
}

/// One side of an undirected link, stored on the owning node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    /// Arena handle of the node on the other end.
    pub index: NodeIndex,
    /// Weight of the link.
    pub weight: Weight,
}

/// An undirected weighted link, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub a: NodeIndex,
    pub b: NodeIndex,
    pub weight: Weight,
}

/// A declared node and its neighbor list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDecl {
    pub id: NodeId,
    pub name: Option<String>,
    pub neighbors: Vec<Neighbor>,
}

impl NodeDecl {
    /// Display label: the name when present, the numeric id otherwise.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.id.to_string(),
        }
    }
}

/// Validated static network graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    nodes: Vec<NodeDecl>,
    links: Vec<Link>,
    by_id: HashMap<NodeId, NodeIndex>,
    by_name: HashMap<String, NodeIndex>,
}

impl Topology {
    /// Create an empty topology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a node. Handles are assigned in declaration order.
    pub fn add_node(
        &mut self,
        id: NodeId,
        name: Option<String>,
    ) -> Result<NodeIndex, TopologyError> {
        if self.by_id.contains_key(&id) {
            return Err(TopologyError::DuplicateId { id });
        }
        if let Some(name) = &name {
            if self.by_name.contains_key(name) {
                return Err(TopologyError::DuplicateName { name: name.clone() });
            }
        }

        let index = NodeIndex::from(self.nodes.len());
        self.by_id.insert(id, index);
        if let Some(name) = &name {
            self.by_name.insert(name.clone(), index);
        }
        self.nodes.push(NodeDecl {
            id,
            name,
            neighbors: Vec::new(),
        });
        Ok(index)
    }

    /// Link two declared nodes in both directions.
    pub fn add_link(
        &mut self,
        a: NodeIndex,
        b: NodeIndex,
        weight: Weight,
    ) -> Result<(), TopologyError> {
        let id_a = self.node(a).ok_or(TopologyError::UnknownIndex { index: a })?.id;
        let id_b = self.node(b).ok_or(TopologyError::UnknownIndex { index: b })?.id;
        if a == b {
            return Err(TopologyError::SelfLoop { id: id_a });
        }
        if self.nodes[a.as_usize()]
            .neighbors
            .iter()
            .any(|n| n.index == b)
        {
            return Err(TopologyError::DuplicateLink { a: id_a, b: id_b });
        }

        self.nodes[a.as_usize()]
            .neighbors
            .push(Neighbor { index: b, weight });
        self.nodes[b.as_usize()]
            .neighbors
            .push(Neighbor { index: a, weight });
        self.links.push(Link { a, b, weight });
        Ok(())
    }

    /// Number of declared nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if no node is declared.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node declaration by handle.
    pub fn node(&self, index: NodeIndex) -> Option<&NodeDecl> {
        self.nodes.get(index.as_usize())
    }

    /// All declarations in input order.
    pub fn nodes(&self) -> &[NodeDecl] {
        &self.nodes
    }

    /// All links in input order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Look up a handle by protocol id.
    pub fn index_of_id(&self, id: NodeId) -> Option<NodeIndex> {
        self.by_id.get(&id).copied()
    }

    /// Look up a handle by display name.
    pub fn index_of_name(&self, name: &str) -> Option<NodeIndex> {
        self.by_name.get(name).copied()
    }

    /// Handle of the node with the globally smallest id.
    pub fn min_id_node(&self) -> Option<NodeIndex> {
        self.nodes
            .iter()
            .enumerate()
            .min_by_key(|(_, n)| n.id)
            .map(|(i, _)| NodeIndex::from(i))
    }

    /// Connected components, each listed in input order.
    ///
    /// Components are ordered by their first member's handle.
    pub fn components(&self) -> Vec<Vec<NodeIndex>> {
        let mut component_of: Vec<Option<usize>> = vec![None; self.nodes.len()];
        let mut components = Vec::new();

        for start in 0..self.nodes.len() {
            if component_of[start].is_some() {
                continue;
            }
            let component = components.len();
            let mut members = Vec::new();
            let mut stack = vec![start];
            component_of[start] = Some(component);
            while let Some(current) = stack.pop() {
                members.push(NodeIndex::from(current));
                for neighbor in &self.nodes[current].neighbors {
                    let next = neighbor.index.as_usize();
                    if component_of[next].is_none() {
                        component_of[next] = Some(component);
                        stack.push(next);
                    }
                }
            }
            members.sort();
            components.push(members);
        }

        components
    }

    /// Shortest path weight from `source` to every node (Dijkstra).
    ///
    /// Unreachable nodes map to `None`. Returns an empty vector for an
    /// unknown source. Path costs saturate at `Cost::MAX`, matching the
    /// arithmetic nodes use for advertised costs.
    pub fn shortest_costs_from(&self, source: NodeIndex) -> Vec<Option<Cost>> {
        if self.node(source).is_none() {
            return Vec::new();
        }

        let mut dist: Vec<Option<Cost>> = vec![None; self.nodes.len()];
        let mut heap = BinaryHeap::new();
        dist[source.as_usize()] = Some(0);
        heap.push(Reverse((0, source)));

        while let Some(Reverse((cost, index))) = heap.pop() {
            if dist[index.as_usize()].is_some_and(|best| cost > best) {
                continue;
            }
            for neighbor in &self.nodes[index.as_usize()].neighbors {
                let candidate = cost.saturating_add(neighbor.weight);
                let slot = &mut dist[neighbor.index.as_usize()];
                if slot.map_or(true, |best| candidate < best) {
                    *slot = Some(candidate);
                    heap.push(Reverse((candidate, neighbor.index)));
                }
            }
        }

        dist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Topology {
        let mut topology = Topology::new();
        let a = topology.add_node(NodeId(3), Some("A".into())).unwrap();
        let b = topology.add_node(NodeId(1), Some("B".into())).unwrap();
        let c = topology.add_node(NodeId(2), Some("C".into())).unwrap();
        topology.add_link(a, b, 4).unwrap();
        topology.add_link(b, c, 1).unwrap();
        topology.add_link(a, c, 2).unwrap();
        topology
    }

    #[test]
    fn test_links_are_symmetric() {
        let topology = triangle();
        for (i, node) in topology.nodes().iter().enumerate() {
            for neighbor in &node.neighbors {
                let back = &topology.nodes()[neighbor.index.as_usize()].neighbors;
                assert!(back
                    .iter()
                    .any(|n| n.index == NodeIndex::from(i) && n.weight == neighbor.weight));
            }
        }
        assert_eq!(topology.links().len(), 3);
    }

    #[test]
    fn test_rejects_duplicates_and_self_loops() {
        let mut topology = triangle();
        assert_eq!(
            topology.add_node(NodeId(1), Some("Z".into())),
            Err(TopologyError::DuplicateId { id: NodeId(1) })
        );
        assert_eq!(
            topology.add_node(NodeId(9), Some("A".into())),
            Err(TopologyError::DuplicateName { name: "A".into() })
        );
        assert_eq!(
            topology.add_link(NodeIndex(0), NodeIndex(0), 1),
            Err(TopologyError::SelfLoop { id: NodeId(3) })
        );
        assert_eq!(
            topology.add_link(NodeIndex(1), NodeIndex(0), 7),
            Err(TopologyError::DuplicateLink {
                a: NodeId(1),
                b: NodeId(3)
            })
        );
        assert_eq!(
            topology.add_link(NodeIndex(0), NodeIndex(8), 1),
            Err(TopologyError::UnknownIndex {
                index: NodeIndex(8)
            })
        );
    }

    #[test]
    fn test_shortest_costs() {
        let topology = triangle();
        let root = topology.min_id_node().unwrap();
        assert_eq!(root, NodeIndex(1));
        assert_eq!(
            topology.shortest_costs_from(root),
            vec![Some(3), Some(0), Some(1)]
        );
    }

    #[test]
    fn test_shortest_costs_saturate() {
        let mut topology = Topology::new();
        let a = topology.add_node(NodeId(1), Some("A".into())).unwrap();
        let b = topology.add_node(NodeId(2), Some("B".into())).unwrap();
        let c = topology.add_node(NodeId(3), Some("C".into())).unwrap();
        topology.add_link(a, b, Weight::MAX).unwrap();
        topology.add_link(b, c, 5).unwrap();
        assert_eq!(
            topology.shortest_costs_from(a),
            vec![Some(0), Some(Cost::MAX), Some(Cost::MAX)]
        );
    }

    #[test]
    fn test_components_and_unreachable() {
        let mut topology = triangle();
        let d = topology.add_node(NodeId(0), None).unwrap();
        let e = topology.add_node(NodeId(8), None).unwrap();
        topology.add_link(d, e, 5).unwrap();

        let components = topology.components();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0], vec![NodeIndex(0), NodeIndex(1), NodeIndex(2)]);
        assert_eq!(components[1], vec![d, e]);

        let costs = topology.shortest_costs_from(d);
        assert_eq!(costs[0], None);
        assert_eq!(costs[e.as_usize()], Some(5));
        assert_eq!(topology.node(d).unwrap().label(), "0");
    }
}
