//! Core types for the root-selection simulator.
//!
//! This crate provides the foundational types used by every other crate in the
//! workspace:
//!
//! - **Identifiers**: [`NodeId`] (protocol identity) and [`NodeIndex`] (arena handle)
//! - **Route state**: [`RouteState`] and the [`NextHop`] tagged variant
//! - **Topology**: [`Topology`], the validated arena of node declarations and
//!   symmetric weighted links
//!
//! # Design Philosophy
//!
//! This crate is self-contained with minimal dependencies. It does not depend on
//! any other workspace crates, making it the foundation layer.

mod identifiers;
mod route;
mod topology;

pub use identifiers::{Cost, NodeId, NodeIndex, Weight};
pub use route::{NextHop, RouteState};
pub use topology::{Link, Neighbor, NodeDecl, Topology, TopologyError};
