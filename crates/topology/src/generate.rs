//! Seeded random topology generation.

use crate::builder::TopologyBuilder;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use stp_types::{NodeIndex, Topology, Weight};
use tracing::debug;

/// Parameters for [`generate_topology`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Number of nodes.
    pub nodes: usize,
    /// Links added on top of the random spanning tree.
    pub extra_links: usize,
    /// Link weights are drawn from `min_weight..=max_weight`.
    pub min_weight: Weight,
    pub max_weight: Weight,
    /// RNG seed; the same config always yields the same graph.
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            nodes: 8,
            extra_links: 4,
            min_weight: 1,
            max_weight: 20,
            seed: 0,
        }
    }
}

impl GeneratorConfig {
    pub fn new(nodes: usize, seed: u64) -> Self {
        Self {
            nodes,
            seed,
            ..Default::default()
        }
    }

    pub fn with_extra_links(mut self, extra_links: usize) -> Self {
        self.extra_links = extra_links;
        self
    }

    pub fn with_weights(mut self, min_weight: Weight, max_weight: Weight) -> Self {
        self.min_weight = min_weight;
        self.max_weight = max_weight.max(min_weight);
        self
    }
}

/// Spreadsheet-style node names: `A`..`Z`, `AA`, `AB`, ...
pub(crate) fn node_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// Generate a connected topology with distinct shuffled ids.
///
/// Every node after the first links to a random earlier node, which makes the
/// graph connected; `extra_links` further links join random unlinked pairs
/// (fewer if the graph saturates).
pub fn generate_topology(config: &GeneratorConfig) -> Topology {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut builder = TopologyBuilder::new();
    let n = config.nodes;
    let max_weight = config.max_weight.max(config.min_weight);

    // Distinct ids drawn from a range four times the node count.
    let ids = sample(&mut rng, (n * 4).max(1), n);
    let names: Vec<String> = (0..n).map(node_name).collect();
    for (name, id) in names.iter().zip(ids.iter()) {
        let declared = builder.declare(name, id as u64 + 1);
        debug_assert!(declared.is_ok(), "generated names and ids are distinct");
    }

    for i in 1..n {
        let j = rng.gen_range(0..i);
        let weight = rng.gen_range(config.min_weight..=max_weight);
        let linked = builder.connect(&names[i], &names[j], weight);
        debug_assert!(linked.is_ok(), "spanning tree links join distinct new pairs");
    }

    let mut topology = builder.finish();
    let max_links = n * n.saturating_sub(1) / 2;
    let mut added = 0;
    let mut attempts = 0;
    while added < config.extra_links
        && topology.links().len() < max_links
        && attempts < config.extra_links * 16
    {
        attempts += 1;
        let a = NodeIndex::from(rng.gen_range(0..n));
        let b = NodeIndex::from(rng.gen_range(0..n));
        let weight = rng.gen_range(config.min_weight..=max_weight);
        if topology.add_link(a, b, weight).is_ok() {
            added += 1;
        }
    }

    debug!(
        nodes = topology.len(),
        links = topology.links().len(),
        seed = config.seed,
        "Topology generated"
    );
    topology
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_names() {
        assert_eq!(node_name(0), "A");
        assert_eq!(node_name(25), "Z");
        assert_eq!(node_name(26), "AA");
        assert_eq!(node_name(27), "AB");
        assert_eq!(node_name(701), "ZZ");
        assert_eq!(node_name(702), "AAA");
    }

    #[test]
    fn test_generated_graph_is_connected() {
        for seed in 0..10 {
            let topology = generate_topology(&GeneratorConfig::new(30, seed).with_extra_links(10));
            assert_eq!(topology.len(), 30);
            assert_eq!(topology.components().len(), 1);
            assert!(topology.links().len() >= 29);
        }
    }

    #[test]
    fn test_spanning_tree_is_complete() {
        // Without extra links every node is declared and the tree has n - 1 links.
        for seed in 0..10 {
            let topology = generate_topology(&GeneratorConfig::new(40, seed).with_extra_links(0));
            assert_eq!(topology.len(), 40);
            assert_eq!(topology.links().len(), 39);
            let mut ids: Vec<_> = topology.nodes().iter().map(|n| n.id).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), 40);
        }
    }

    #[test]
    fn test_same_seed_same_graph() {
        let config = GeneratorConfig::new(12, 7).with_weights(0, 5);
        assert_eq!(generate_topology(&config), generate_topology(&config));
        assert!(generate_topology(&config)
            .links()
            .iter()
            .all(|l| l.weight <= 5));
    }

    #[test]
    fn test_empty_and_single() {
        assert!(generate_topology(&GeneratorConfig::new(0, 1)).is_empty());
        let single = generate_topology(&GeneratorConfig::new(1, 1).with_extra_links(3));
        assert_eq!(single.len(), 1);
        assert!(single.links().is_empty());
    }
}
