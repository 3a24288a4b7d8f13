//! Deterministic round coordinator.
//!
//! This crate drives every [`Node`](stp_core::Node) through synchronous
//! rounds until no node changes its route. Given the same topology it
//! produces identical results every run, whichever dispatch is used.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  SimulationRunner                       │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │  Phase 1: dispatch.map_nodes(send_message)         │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │ barrier                     │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │  Message Queue (BTreeMap<DeliveryKey, Message>)    │ │
//! │  │  Ordered by: destination, sequence                 │ │
//! │  │  Drained into each node's inbox                    │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │ barrier                     │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │  Phase 2: dispatch.map_nodes_mut(apply_messages)   │ │
//! │  │  any_changed = OR of every node's result           │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod message_queue;
mod report;
mod runner;

pub use report::{RouteEntry, RouteTable};
pub use runner::{RoundReport, RunOutcome, SimulationConfig, SimulationRunner, SimulationStats};
