//! File-based topology loading.

use std::path::PathBuf;
use stp_topology::{load_topology, parse_topology, render_topology, LoadError, ParseError};
use stp_types::NodeId;

fn data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

#[test]
fn test_load_office() {
    let topology = load_topology(data("office.txt")).unwrap();
    assert_eq!(topology.len(), 6);
    assert_eq!(topology.links().len(), 9);

    let labels: Vec<String> = topology.nodes().iter().map(|n| n.label()).collect();
    assert_eq!(labels, ["A", "B", "C", "D", "E", "F"]);

    let b = topology.index_of_name("B").unwrap();
    assert_eq!(topology.index_of_id(NodeId(1)), Some(b));
    assert_eq!(topology.min_id_node(), Some(b));
    assert_eq!(topology.node(b).unwrap().neighbors.len(), 3);
}

#[test]
fn test_shortest_costs_of_loaded_file() {
    let topology = load_topology(data("office.txt")).unwrap();
    let b = topology.index_of_name("B").unwrap();
    let costs: Vec<u64> = topology
        .shortest_costs_from(b)
        .into_iter()
        .map(Option::unwrap)
        .collect();
    assert_eq!(costs, [10, 0, 15, 12, 10, 12]);
}

#[test]
fn test_undeclared_node_names_file_and_line() {
    let err = load_topology(data("bad_edge.txt")).unwrap_err();
    match &err {
        LoadError::Parse { path, source } => {
            assert!(path.ends_with("bad_edge.txt"));
            assert_eq!(
                *source,
                ParseError::UndeclaredNode {
                    line: 5,
                    name: "Q".into()
                }
            );
        }
        other => panic!("unexpected error: {other}"),
    }
    let message = err.to_string();
    assert!(message.contains("bad_edge.txt"));
    assert!(message.contains("line 5"));
}

#[test]
fn test_rendered_file_parses_to_same_topology() {
    let topology = load_topology(data("office.txt")).unwrap();
    assert_eq!(parse_topology(&render_topology(&topology)).unwrap(), topology);
}
