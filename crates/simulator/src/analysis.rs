//! Convergence analysis for post-simulation diagnostics.
//!
//! Checks the routes a run converged to against shortest paths computed
//! directly on the topology. In every connected component:
//!
//! ```text
//! root      = the member with the smallest id, next hop Root, cost 0
//! cost(n)   = Dijkstra distance from the root to n
//! cost(n)   = cost(next_hop(n)) + weight(n, next_hop(n))
//! next hops = a tree: following them from any member reaches the root
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let report = ConvergenceAnalyzer::new(&topology, &runner.routes()).analyze();
//! report.print_summary();
//! ```

use std::fmt;
use stp_simulation::{RouteEntry, RouteTable};
use stp_types::{Cost, NodeId, NodeIndex, Topology};

/// A route that disagrees with the shortest-path tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The route table does not describe the analysed topology.
    SizeMismatch { routes: usize, nodes: usize },

    /// The node believes in a root other than its component minimum.
    WrongRoot {
        node: String,
        expected: NodeId,
        actual: NodeId,
    },

    /// The node's cost is not its shortest-path distance to the root.
    WrongCost {
        node: String,
        expected: Cost,
        actual: Cost,
    },

    /// The component root points somewhere other than itself.
    RootHasNextHop { node: String },

    /// A non-root node claims to be the root.
    MissingNextHop { node: String },

    /// The next hop is not linked to the node.
    NotANeighbor { node: String, next_hop: String },

    /// `cost(node) != cost(next_hop) + weight`.
    InconsistentCost {
        node: String,
        next_hop: String,
        expected: Cost,
        actual: Cost,
    },

    /// Following next hops from the node never reaches the root.
    NoPathToRoot { node: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::SizeMismatch { routes, nodes } => {
                write!(f, "{routes} routes for {nodes} nodes")
            }
            Violation::WrongRoot {
                node,
                expected,
                actual,
            } => write!(f, "{node}: root {actual}, expected {expected}"),
            Violation::WrongCost {
                node,
                expected,
                actual,
            } => write!(f, "{node}: cost {actual}, shortest path is {expected}"),
            Violation::RootHasNextHop { node } => write!(f, "{node}: root has a next hop"),
            Violation::MissingNextHop { node } => write!(f, "{node}: no next hop"),
            Violation::NotANeighbor { node, next_hop } => {
                write!(f, "{node}: next hop {next_hop} is not a neighbor")
            }
            Violation::InconsistentCost {
                node,
                next_hop,
                expected,
                actual,
            } => write!(
                f,
                "{node}: cost {actual} but {next_hop} plus link weight is {expected}"
            ),
            Violation::NoPathToRoot { node } => write!(f, "{node}: next hops never reach the root"),
        }
    }
}

/// Summary of one connected component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSummary {
    /// Label of the member with the smallest id.
    pub root: String,
    pub root_id: NodeId,
    pub members: usize,
    /// Largest shortest-path distance from the root.
    pub max_cost: Cost,
}

/// Result of [`ConvergenceAnalyzer::analyze`].
#[derive(Debug, Clone, Default)]
pub struct ConvergenceReport {
    pub nodes: usize,
    pub components: Vec<ComponentSummary>,
    pub violations: Vec<Violation>,
}

impl ConvergenceReport {
    /// True when every route matches the shortest-path tree.
    pub fn is_optimal(&self) -> bool {
        self.violations.is_empty()
    }

    /// Print a human-readable summary.
    pub fn print_summary(&self) {
        println!("\n🔍 Convergence Analysis Report");
        println!("==============================\n");

        println!("📊 Summary:");
        println!("  Nodes: {}", self.nodes);
        println!("  Components: {}", self.components.len());
        for component in &self.components {
            println!(
                "  Root {} (id {}): {} nodes, farthest at cost {}",
                component.root, component.root_id, component.members, component.max_cost
            );
        }
        println!();

        if self.is_optimal() {
            println!("✅ Every node follows a shortest path to its component root.\n");
            return;
        }

        println!("⚠️  Violations: {}", self.violations.len());
        for violation in self.violations.iter().take(20) {
            println!("  {violation}");
        }
        if self.violations.len() > 20 {
            println!("  ... and {} more", self.violations.len() - 20);
        }
        println!();
    }
}

/// Compares a route table with the topology it was computed on.
///
/// Route entries are matched to nodes by position, so `routes` must come from
/// a runner built over `topology`.
pub struct ConvergenceAnalyzer<'a> {
    topology: &'a Topology,
    routes: &'a RouteTable,
}

impl<'a> ConvergenceAnalyzer<'a> {
    pub fn new(topology: &'a Topology, routes: &'a RouteTable) -> Self {
        Self { topology, routes }
    }

    pub fn analyze(&self) -> ConvergenceReport {
        let mut report = ConvergenceReport {
            nodes: self.topology.len(),
            ..Default::default()
        };

        if self.routes.len() != self.topology.len() {
            report.violations.push(Violation::SizeMismatch {
                routes: self.routes.len(),
                nodes: self.topology.len(),
            });
            return report;
        }

        for members in self.topology.components() {
            self.analyze_component(&members, &mut report);
        }
        report
    }

    fn analyze_component(&self, members: &[NodeIndex], report: &mut ConvergenceReport) {
        let nodes = self.topology.nodes();
        let entries = self.routes.entries();

        let Some(&root) = members.iter().min_by_key(|i| nodes[i.as_usize()].id) else {
            return;
        };
        let root_id = nodes[root.as_usize()].id;
        let distances = self.topology.shortest_costs_from(root);

        report.components.push(ComponentSummary {
            root: nodes[root.as_usize()].label(),
            root_id,
            members: members.len(),
            max_cost: members
                .iter()
                .filter_map(|i| distances[i.as_usize()])
                .max()
                .unwrap_or(0),
        });

        for &index in members {
            let entry = &entries[index.as_usize()];

            if entry.root_id != root_id.0 {
                report.violations.push(Violation::WrongRoot {
                    node: entry.node.clone(),
                    expected: root_id,
                    actual: NodeId(entry.root_id),
                });
            }

            // Members of a component are reachable from its root.
            let expected = distances[index.as_usize()].unwrap_or(Cost::MAX);
            if entry.cost != expected {
                report.violations.push(Violation::WrongCost {
                    node: entry.node.clone(),
                    expected,
                    actual: entry.cost,
                });
            }

            if index == root {
                if !entry.is_root() {
                    report.violations.push(Violation::RootHasNextHop {
                        node: entry.node.clone(),
                    });
                }
                continue;
            }

            self.check_next_hop(index, entry, report);
            if !self.reaches(index, root, members.len()) {
                report.violations.push(Violation::NoPathToRoot {
                    node: entry.node.clone(),
                });
            }
        }
    }

    fn check_next_hop(&self, index: NodeIndex, entry: &RouteEntry, report: &mut ConvergenceReport) {
        let Some(hop) = self.next_hop_of(index) else {
            report.violations.push(Violation::MissingNextHop {
                node: entry.node.clone(),
            });
            return;
        };

        let hop_label = self.routes.entries()[hop.as_usize()].node.clone();
        let link = self.topology.nodes()[index.as_usize()]
            .neighbors
            .iter()
            .find(|n| n.index == hop);
        let Some(link) = link else {
            report.violations.push(Violation::NotANeighbor {
                node: entry.node.clone(),
                next_hop: hop_label,
            });
            return;
        };

        let expected = self.routes.entries()[hop.as_usize()]
            .cost
            .saturating_add(link.weight);
        if entry.cost != expected {
            report.violations.push(Violation::InconsistentCost {
                node: entry.node.clone(),
                next_hop: hop_label,
                expected,
                actual: entry.cost,
            });
        }
    }

    fn next_hop_of(&self, index: NodeIndex) -> Option<NodeIndex> {
        let id = self.routes.entries()[index.as_usize()].next_hop_id?;
        self.topology.index_of_id(NodeId(id))
    }

    /// Follow next hops from `start` for at most `limit` steps.
    fn reaches(&self, start: NodeIndex, root: NodeIndex, limit: usize) -> bool {
        let mut current = start;
        for _ in 0..limit {
            if current == root {
                return true;
            }
            match self.next_hop_of(current) {
                Some(next) => current = next,
                None => return false,
            }
        }
        current == root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stp_simulation::SimulationRunner;
    use stp_test_helpers::fixtures;

    fn converged(topology: &Topology) -> RouteTable {
        let mut runner = SimulationRunner::new(topology);
        assert!(runner.run().is_converged());
        runner.routes()
    }

    #[test]
    fn test_worked_example_is_optimal() {
        let topology = fixtures::worked_example();
        let routes = converged(&topology);
        let report = ConvergenceAnalyzer::new(&topology, &routes).analyze();
        assert!(report.is_optimal(), "{:?}", report.violations);
        assert_eq!(report.components.len(), 1);
        assert_eq!(report.components[0].root, "B");
        assert_eq!(report.components[0].max_cost, 15);
    }

    #[test]
    fn test_disconnected_components_each_get_a_root() {
        let topology = fixtures::two_components();
        let routes = converged(&topology);
        let report = ConvergenceAnalyzer::new(&topology, &routes).analyze();
        assert!(report.is_optimal(), "{:?}", report.violations);
        let roots: Vec<_> = report.components.iter().map(|c| c.root.as_str()).collect();
        assert_eq!(roots, vec!["B", "Y"]);
    }

    #[test]
    fn test_unconverged_routes_are_flagged() {
        let topology = fixtures::line(5, 1);
        let mut runner = SimulationRunner::new(&topology);
        runner.step_round();
        let routes = runner.routes();

        let report = ConvergenceAnalyzer::new(&topology, &routes).analyze();
        assert!(!report.is_optimal());
        // After one round the first node has only heard of its neighbor.
        assert!(report.violations.contains(&Violation::WrongRoot {
            node: "5".into(),
            expected: NodeId(1),
            actual: NodeId(4),
        }));
        assert!(report.violations.contains(&Violation::WrongCost {
            node: "5".into(),
            expected: 4,
            actual: 1,
        }));
        // The true root is already settled.
        assert!(!report
            .violations
            .iter()
            .any(|v| matches!(v, Violation::RootHasNextHop { .. })));
    }

    #[test]
    fn test_zero_weight_loop_is_flagged() {
        let topology = fixtures::zero_weight_loop();
        let routes = converged(&topology);
        let report = ConvergenceAnalyzer::new(&topology, &routes).analyze();
        assert_eq!(
            report.violations,
            vec![
                Violation::NoPathToRoot { node: "U".into() },
                Violation::NoPathToRoot { node: "V".into() },
            ]
        );
    }

    #[test]
    fn test_size_mismatch() {
        let topology = fixtures::worked_example();
        let routes = converged(&fixtures::line(3, 1));
        let report = ConvergenceAnalyzer::new(&topology, &routes).analyze();
        assert_eq!(
            report.violations,
            vec![Violation::SizeMismatch {
                routes: 3,
                nodes: 6
            }]
        );
    }

    #[test]
    fn test_violation_display() {
        let violation = Violation::WrongCost {
            node: "C".into(),
            expected: 15,
            actual: 20,
        };
        assert_eq!(violation.to_string(), "C: cost 20, shortest path is 15");
    }
}
