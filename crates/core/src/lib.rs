//! Core state machine for root selection.
//!
//! This crate provides the per-node protocol logic:
//!
//! - [`Node`]: routing state, neighbor links, inbox and the update rule
//! - [`OutboundMessage`] / [`InboundMessage`]: the (root, cost) advertisement
//!   as emitted by a sender and as buffered by a receiver
//! - [`UpdateRule`] / [`UpdateSummary`]: which rule each buffered message hit
//! - [`StateMachine`]: the trait the round coordinator drives
//!
//! # Architecture
//!
//! ```text
//! send_message() → OutboundMessage → coordinator → receive_message() → inbox
//!                                                                        │
//!                              update_state() / apply_messages() ◀──────┘
//! ```
//!
//! The state machine is:
//! - **Synchronous**: No async, no .await
//! - **Deterministic**: Same state + inbox = same transitions
//! - **Isolated**: A node never touches another node's state; all delivery
//!   goes through the coordinator

mod message;
mod node;
mod traits;

pub use message::{InboundMessage, OutboundMessage};
pub use node::{NeighborLink, Node, UpdateRule, UpdateSummary};
pub use traits::StateMachine;
