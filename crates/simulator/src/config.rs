//! Simulator configuration.
//!
//! Loaded from an optional TOML file; every field has a default so a partial
//! (or empty) file is valid. Command-line flags are applied on top by the
//! binary.
//!
//! ```toml
//! input = "input.txt"
//!
//! [simulation]
//! max_rounds = 16
//!
//! [dispatch]
//! threads = 4
//!
//! [report]
//! show_costs = true
//! verify = true
//! format = "json"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use stp_simulation::SimulationConfig;

/// Errors from loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level simulator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulatorConfig {
    /// Topology file to simulate.
    #[serde(default = "default_input")]
    pub input: PathBuf,

    #[serde(default)]
    pub simulation: SimulationSection,

    #[serde(default)]
    pub dispatch: DispatchSection,

    #[serde(default)]
    pub report: ReportSection,
}

fn default_input() -> PathBuf {
    PathBuf::from("input.txt")
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            simulation: SimulationSection::default(),
            dispatch: DispatchSection::default(),
            report: ReportSection::default(),
        }
    }
}

/// Round coordinator settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationSection {
    /// Round bound per run. Node count + 1 when unset.
    #[serde(default)]
    pub max_rounds: Option<u64>,
}

/// Phase execution settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DispatchSection {
    /// Size of the rayon pool used for both phases. 0 runs phases inline.
    #[serde(default)]
    pub threads: usize,
}

/// Output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReportSection {
    /// Append believed root and cost to every report line.
    #[serde(default)]
    pub show_costs: bool,

    /// Check the converged routes against shortest paths and print the result.
    #[serde(default)]
    pub verify: bool,

    #[serde(default)]
    pub format: OutputFormat,
}

/// Report format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One `<name>-><next hop>` line per node.
    #[default]
    Text,
    /// Outcome and route entries as a JSON document.
    Json,
}

impl SimulatorConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Coordinator settings for [`SimulationRunner`](stp_simulation::SimulationRunner).
    pub fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            max_rounds: self.simulation.max_rounds,
        }
    }

    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = input.into();
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: u64) -> Self {
        self.simulation.max_rounds = Some(max_rounds);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.dispatch.threads = threads;
        self
    }
}
