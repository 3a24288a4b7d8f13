//! Topology construction for the root-selection simulator.
//!
//! Produces a validated [`Topology`](stp_types::Topology) from one of three
//! sources:
//!
//! - [`TopologyBuilder`]: hardcoded nodes and links, addressed by name
//! - [`parse_topology`] / [`load_topology`]: the `Graph { ... }` text format
//! - [`generate_topology`]: seeded random connected graphs
//!
//! # Text format
//!
//! ```text
//! Graph {
//!     A = 5;
//!     B = 1;
//!     A-B: 10;
//! }
//! ```
//!
//! Node declarations (`<name> = <id>;`) must precede the links that reference
//! them (`<name>-<name>: <weight>;`). Lines outside the block are ignored;
//! inside it, blank lines and `//` comments are skipped and anything else that
//! does not parse is rejected with its line number.

mod builder;
mod generate;
mod parser;

pub use builder::{BuildError, TopologyBuilder};
pub use generate::{generate_topology, GeneratorConfig};
pub use parser::{load_topology, parse_topology, render_topology, LoadError, ParseError};
