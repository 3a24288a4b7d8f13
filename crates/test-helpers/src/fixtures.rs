//! Topology fixtures.

use stp_topology::{generate_topology, parse_topology, GeneratorConfig, TopologyBuilder};
use stp_types::{NodeIndex, Topology, Weight};

/// Six-node reference topology. Converges to root `B` (id 1).
pub const WORKED_EXAMPLE: &str = "\
Graph {
    A = 5;
    B = 1;
    C = 3;
    D = 7;
    E = 6;
    F = 4;
    A-B: 10;
    A-C: 10;
    B-D: 15;
    B-E: 10;
    C-D: 3;
    C-E: 10;
    D-E: 2;
    D-F: 10;
    E-F: 2;
}
";

/// Converged `(node, next hop, cost)` for [`WORKED_EXAMPLE`] in input order.
///
/// `C` reaches B at cost 15 only through D; D and F both tie-break onto E.
pub const WORKED_EXAMPLE_ROUTES: [(&str, &str, u64); 6] = [
    ("A", "B", 10),
    ("B", "Root", 0),
    ("C", "D", 15),
    ("D", "E", 12),
    ("E", "B", 10),
    ("F", "E", 12),
];

/// [`WORKED_EXAMPLE`] as a topology.
pub fn worked_example() -> Topology {
    parse_topology(WORKED_EXAMPLE).expect("worked example parses")
}

fn unnamed(ids: impl IntoIterator<Item = u64>) -> Topology {
    let mut builder = TopologyBuilder::new();
    for id in ids {
        builder
            .declare_unnamed(id)
            .expect("fixture ids are distinct");
    }
    builder.build().expect("unnamed fixture is valid")
}

fn link(topology: &mut Topology, a: usize, b: usize, weight: Weight) {
    topology
        .add_link(NodeIndex::from(a), NodeIndex::from(b), weight)
        .expect("fixture links are valid");
}

/// `n` nodes in a line. Ids decrease along the line, so the root is the
/// last node and information has to travel the full length.
pub fn line(n: usize, weight: Weight) -> Topology {
    let mut topology = unnamed((1..=n as u64).rev());
    for i in 1..n {
        link(&mut topology, i - 1, i, weight);
    }
    topology
}

/// `n` nodes in a ring with uniform weights. Every node opposite the root
/// has two equal-cost paths when `n` is even.
pub fn ring(n: usize, weight: Weight) -> Topology {
    let mut topology = unnamed(1..=n as u64);
    for i in 1..n {
        link(&mut topology, i - 1, i, weight);
    }
    if n > 2 {
        link(&mut topology, n - 1, 0, weight);
    }
    topology
}

/// A hub with `leaves` spokes. The hub has the largest id.
pub fn star(leaves: usize, weight: Weight) -> Topology {
    let mut topology = unnamed(std::iter::once(leaves as u64 + 1).chain(1..=leaves as u64));
    for leaf in 1..=leaves {
        link(&mut topology, 0, leaf, weight);
    }
    topology
}

/// `width` x `height` grid with uniform weights; the root is the bottom-right
/// corner. Almost every node has several equal-cost paths.
pub fn grid(width: usize, height: usize, weight: Weight) -> Topology {
    let n = width * height;
    let mut topology = unnamed((1..=n as u64).rev());
    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            if x + 1 < width {
                link(&mut topology, i, i + 1, weight);
            }
            if y + 1 < height {
                link(&mut topology, i, i + width, weight);
            }
        }
    }
    topology
}

/// Square `R(1)-P(4)-S(9)` and `R-Q(3)-S`. S has two paths of cost 7 to the
/// root and ends up behind Q, the smaller id, although P is heard first.
pub fn equal_cost_square() -> Topology {
    TopologyBuilder::new()
        .node("R", 1)
        .node("P", 4)
        .node("Q", 3)
        .node("S", 9)
        .link("R", "P", 2)
        .link("R", "Q", 2)
        .link("P", "S", 5)
        .link("Q", "S", 5)
        .build()
        .expect("square fixture is valid")
}

/// Two disjoint triangles. The left one contains the global minimum id 1,
/// the right one has local minimum 10.
pub fn two_components() -> Topology {
    TopologyBuilder::new()
        .node("A", 4)
        .node("B", 1)
        .node("C", 7)
        .node("X", 12)
        .node("Y", 10)
        .node("Z", 11)
        .link("A", "B", 3)
        .link("B", "C", 2)
        .link("A", "C", 9)
        .link("X", "Y", 1)
        .link("Y", "Z", 4)
        .link("X", "Z", 6)
        .build()
        .expect("two-component fixture is valid")
}

/// Seeded random connected graph.
pub fn random_connected(nodes: usize, extra_links: usize, seed: u64) -> Topology {
    generate_topology(&GeneratorConfig::new(nodes, seed).with_extra_links(extra_links))
}

/// Seeded random connected graph with weights in `1..=max_weight`. Small
/// weight ranges make equal-cost paths common.
pub fn random_with_ties(nodes: usize, extra_links: usize, max_weight: Weight, seed: u64) -> Topology {
    generate_topology(
        &GeneratorConfig::new(nodes, seed)
            .with_extra_links(extra_links)
            .with_weights(1, max_weight),
    )
}

/// `R(1)` feeding `U(5)` and `V(6)` through two disjoint paths of cost 2,
/// with a zero-weight link between U and V.
///
/// Each of U and V sees the other as its smallest-id neighbor on a shortest
/// path, so the tie-break leaves them pointing at each other.
pub fn zero_weight_loop() -> Topology {
    TopologyBuilder::new()
        .node("R", 1)
        .node("X", 9)
        .node("Y", 8)
        .node("U", 5)
        .node("V", 6)
        .link("R", "X", 1)
        .link("R", "Y", 1)
        .link("X", "U", 1)
        .link("Y", "V", 1)
        .link("U", "V", 0)
        .build()
        .expect("zero-weight fixture is valid")
}
