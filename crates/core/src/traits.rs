//! Core trait for round-driven state machines.

use crate::{InboundMessage, OutboundMessage, UpdateSummary};

/// A node state machine driven by synchronous rounds.
///
/// This is the seam between the protocol logic and the round coordinator.
/// Implementations are:
///
/// - **Synchronous**: No method blocks or awaits
/// - **Deterministic**: Given the same state and inbox, `apply_messages`
///   always produces the same transitions
/// - **No I/O**: Messages leave and arrive only through the coordinator
///
/// # Round discipline
///
/// The coordinator calls `send_message` on every node, then delivers every
/// emitted message with `receive_message`, then calls `apply_messages` on
/// every node. No phase starts before the previous one finished on all nodes.
pub trait StateMachine {
    /// Advertise the current belief to every neighbor.
    ///
    /// Reads own state only; must not mutate anything.
    fn send_message(&self) -> Vec<OutboundMessage>;

    /// Buffer an advertisement for the next `apply_messages` call.
    ///
    /// Never mutates routing state.
    fn receive_message(&mut self, message: InboundMessage);

    /// Apply every buffered advertisement in arrival order and clear the inbox.
    fn apply_messages(&mut self) -> UpdateSummary;
}
