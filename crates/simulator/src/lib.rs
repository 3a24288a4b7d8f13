//! STP Simulator
//!
//! Command-line front end for the root-selection simulation framework.
//!
//! # Architecture
//!
//! The simulator builds on `stp-simulation` to provide:
//!
//! - **Configuration**: TOML file plus command-line overrides
//! - **Dispatch selection**: inline phases or a rayon pool (via `stp-dispatch-pooled`)
//! - **Reporting**: text or JSON route tables
//! - **Convergence analysis**: converged routes checked against shortest paths
//!
//! # Example
//!
//! ```ignore
//! use stp_simulator::{Simulator, SimulatorConfig};
//!
//! let config = SimulatorConfig::default().with_threads(4);
//! let topology = stp_topology::load_topology(&config.input)?;
//!
//! let output = Simulator::new(config.clone()).run(&topology)?;
//! print!("{}", output.render(&config.report)?);
//! output.analyze(&topology).print_summary();
//! ```

mod analysis;
mod config;
mod runner;

pub use analysis::{ComponentSummary, ConvergenceAnalyzer, ConvergenceReport, Violation};
pub use config::{
    ConfigError, DispatchSection, OutputFormat, ReportSection, SimulationSection, SimulatorConfig,
};
pub use runner::{SimulationOutput, Simulator};
