//! Tests for deterministic simulation.
//!
//! The same topology must produce identical routes, statistics and round
//! counts on every run, whichever dispatch executes the phases.

use stp_dispatch_pooled::PooledDispatch;
use stp_dispatch_sync::SyncDispatch;
use stp_simulation::{SimulationConfig, SimulationRunner};
use stp_test_helpers::{fixtures, WORKED_EXAMPLE_ROUTES};
use stp_types::Topology;
use tracing_test::traced_test;

fn run_pooled(topology: &Topology, threads: usize) -> SimulationRunner<PooledDispatch> {
    let dispatch = PooledDispatch::with_threads(threads).unwrap();
    let mut runner =
        SimulationRunner::with_dispatch(topology, dispatch, SimulationConfig::default());
    runner.run();
    runner
}

/// The reference example converges to the documented tree.
#[traced_test]
#[test]
fn test_worked_example_output() {
    let topology = fixtures::worked_example();
    let mut runner = SimulationRunner::new(&topology);
    let outcome = runner.run();

    assert!(outcome.is_converged());
    assert!(outcome.rounds() <= topology.len() as u64 + 1);

    let routes = runner.routes();
    assert_eq!(
        routes.to_string(),
        "A->B\nB->Root\nC->D\nD->E\nE->B\nF->E\n"
    );
    for (node, hop, cost) in WORKED_EXAMPLE_ROUTES {
        let entry = routes.get(node).unwrap();
        assert_eq!(entry.root_id, 1, "{node} root");
        assert_eq!(entry.cost, cost, "{node} cost");
        assert_eq!(entry.next_hop.as_deref().unwrap_or("Root"), hop);
    }
}

/// Two runs over the same topology are indistinguishable.
#[test]
fn test_same_topology_same_result() {
    let topology = fixtures::random_connected(50, 40, 12345);

    let mut runner1 = SimulationRunner::new(&topology);
    let outcome1 = runner1.run();

    let mut runner2 = SimulationRunner::new(&topology);
    let outcome2 = runner2.run();

    assert_eq!(outcome1, outcome2);
    assert_eq!(runner1.stats(), runner2.stats());
    assert_eq!(runner1.routes(), runner2.routes());
}

/// Round-by-round reports match, not just the final state.
#[test]
fn test_round_reports_match() {
    let topology = fixtures::random_with_ties(30, 30, 3, 7);

    let mut runner1 = SimulationRunner::new(&topology);
    let mut runner2 = SimulationRunner::new(&topology);
    loop {
        let report1 = runner1.step_round();
        let report2 = runner2.step_round();
        assert_eq!(report1, report2);
        assert_eq!(runner1.routes(), runner2.routes());
        if !report1.changed() {
            break;
        }
    }
}

/// The pooled dispatch reproduces the inline results exactly.
#[traced_test]
#[test]
fn test_pooled_matches_sync() {
    for seed in 0..8 {
        let topology = fixtures::random_with_ties(40, 60, 4, seed);

        let mut sync = SimulationRunner::new(&topology);
        let sync_outcome = sync.run();

        for threads in [1, 2, 4] {
            let pooled = run_pooled(&topology, threads);
            assert_eq!(pooled.routes(), sync.routes(), "seed {seed}, {threads} threads");
            assert_eq!(pooled.stats(), sync.stats(), "seed {seed}, {threads} threads");
            assert_eq!(pooled.stats().rounds, sync_outcome.rounds());
        }
    }
}

/// A sync runner built explicitly behaves like `SimulationRunner::new`.
#[test]
fn test_explicit_sync_dispatch() {
    let topology = fixtures::grid(4, 4, 1);

    let mut implicit = SimulationRunner::new(&topology);
    implicit.run();

    let mut explicit =
        SimulationRunner::with_dispatch(&topology, SyncDispatch::new(), SimulationConfig::default());
    explicit.run();

    assert_eq!(implicit.routes(), explicit.routes());
}

/// The generator is seeded, so the whole pipeline replays from a seed.
#[test]
fn test_seeded_generation_replays() {
    let routes = |seed| {
        let mut runner = SimulationRunner::new(&fixtures::random_connected(25, 10, seed));
        runner.run();
        runner.routes()
    };
    assert_eq!(routes(99), routes(99));
    assert_ne!(routes(99), routes(100));
}
