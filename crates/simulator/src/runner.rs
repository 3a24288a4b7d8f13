//! Simulator runner wrapping the round coordinator.

use crate::analysis::{ConvergenceAnalyzer, ConvergenceReport};
use crate::config::{OutputFormat, ReportSection, SimulatorConfig};
use serde::Serialize;
use stp_dispatch::Dispatch;
use stp_dispatch_pooled::{PooledDispatch, ThreadPoolError};
use stp_dispatch_sync::SyncDispatch;
use stp_simulation::{RouteTable, RunOutcome, SimulationRunner, SimulationStats};
use stp_types::Topology;
use tracing::info;

/// Result of one simulation.
#[derive(Debug, Clone)]
pub struct SimulationOutput {
    pub outcome: RunOutcome,
    pub routes: RouteTable,
    pub stats: SimulationStats,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    converged: bool,
    rounds: u64,
    messages: u64,
    routes: &'a RouteTable,
}

impl SimulationOutput {
    /// Render the report in the configured format.
    pub fn render(&self, report: &ReportSection) -> Result<String, serde_json::Error> {
        match report.format {
            OutputFormat::Text => Ok(self.routes.render(report.show_costs)),
            OutputFormat::Json => {
                let mut out = serde_json::to_string_pretty(&JsonReport {
                    converged: self.outcome.is_converged(),
                    rounds: self.outcome.rounds(),
                    messages: self.stats.messages_sent,
                    routes: &self.routes,
                })?;
                out.push('\n');
                Ok(out)
            }
        }
    }

    /// Compare the routes with shortest paths on `topology`.
    pub fn analyze(&self, topology: &Topology) -> ConvergenceReport {
        ConvergenceAnalyzer::new(topology, &self.routes).analyze()
    }
}

/// Runs simulations with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// Simulate `topology` until it converges or hits the round bound.
    ///
    /// Runs phases inline when `dispatch.threads` is 0, otherwise on a
    /// dedicated rayon pool of that size.
    pub fn run(&self, topology: &Topology) -> Result<SimulationOutput, ThreadPoolError> {
        info!(
            nodes = topology.len(),
            links = topology.links().len(),
            threads = self.config.dispatch.threads,
            max_rounds = ?self.config.simulation.max_rounds,
            "Starting simulation"
        );

        match self.config.dispatch.threads {
            0 => Ok(self.run_with(topology, SyncDispatch::new())),
            threads => Ok(self.run_with(topology, PooledDispatch::with_threads(threads)?)),
        }
    }

    fn run_with<D: Dispatch>(&self, topology: &Topology, dispatch: D) -> SimulationOutput {
        let mut runner =
            SimulationRunner::with_dispatch(topology, dispatch, self.config.simulation_config());
        let outcome = runner.run();
        SimulationOutput {
            outcome,
            routes: runner.routes(),
            stats: runner.stats().clone(),
        }
    }
}
