//! Test helpers for the root-selection simulator.
//!
//! Provides ready-made topologies with known properties: the reference
//! six-node example, regular shapes whose root sits as far away as possible
//! from most nodes, graphs full of equal-cost paths, disconnected graphs and
//! seeded random connected graphs.
//!
//! # Example
//!
//! ```rust
//! use stp_test_helpers::fixtures;
//!
//! let topology = fixtures::worked_example();
//! assert_eq!(topology.len(), 6);
//!
//! let ring = fixtures::ring(12, 3);
//! assert_eq!(ring.components().len(), 1);
//! ```

pub mod fixtures;

pub use fixtures::{WORKED_EXAMPLE, WORKED_EXAMPLE_ROUTES};
