//! Message queue with deterministic delivery order.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use stp_core::OutboundMessage;
use stp_types::NodeIndex;

/// Key for ordering messages in the queue.
///
/// The queue holds a single round's broadcast at a time, so messages are
/// ordered by:
/// 1. Destination node index
/// 2. Sequence number (FIFO: sender order, then the sender's link order)
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct DeliveryKey {
    /// Which node receives this message.
    pub to: NodeIndex,
    /// Sequence number for deterministic FIFO ordering.
    pub sequence: u64,
}

impl Ord for DeliveryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.to.cmp(&other.to) {
            Ordering::Equal => {}
            ord => return ord,
        }

        self.sequence.cmp(&other.sequence)
    }
}

impl PartialOrd for DeliveryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Buffer between the broadcast phase and inbox delivery.
///
/// Sequence numbers are assigned on push, so the arrival order a node sees
/// depends only on the order messages were enqueued, never on how the
/// broadcast phase was scheduled.
#[derive(Debug, Default)]
pub struct MessageQueue {
    messages: BTreeMap<DeliveryKey, OutboundMessage>,
    sequence: u64,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a message from the current broadcast phase.
    pub fn push(&mut self, message: OutboundMessage) {
        let key = DeliveryKey {
            to: message.to,
            sequence: self.sequence,
        };
        self.sequence += 1;
        self.messages.insert(key, message);
    }

    /// Number of queued messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Remove every queued message, in delivery order.
    pub fn drain(&mut self) -> impl Iterator<Item = (DeliveryKey, OutboundMessage)> {
        std::mem::take(&mut self.messages).into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stp_types::NodeId;

    fn message(to: u32, sender: u64) -> OutboundMessage {
        OutboundMessage {
            to: NodeIndex(to),
            root_id: NodeId(sender),
            cost: 0,
            link_weight: 1,
            sender: NodeId(sender),
        }
    }

    #[test]
    fn test_destination_ordering() {
        let node0 = DeliveryKey {
            to: NodeIndex(0),
            sequence: 2,
        };
        let node1 = DeliveryKey {
            to: NodeIndex(1),
            sequence: 1,
        };
        assert!(node0 < node1, "Lower destination should drain first");
    }

    #[test]
    fn test_drain_groups_by_destination_in_fifo_order() {
        let mut queue = MessageQueue::new();
        queue.push(message(1, 30));
        queue.push(message(0, 20));
        queue.push(message(1, 10));
        queue.push(message(0, 40));
        assert_eq!(queue.len(), 4);

        let drained: Vec<(u32, u64)> = queue
            .drain()
            .map(|(key, msg)| (key.to.0, msg.sender.0))
            .collect();
        assert_eq!(drained, vec![(0, 20), (0, 40), (1, 30), (1, 10)]);
        assert!(queue.is_empty());

        // Sequence numbers keep growing across drains.
        queue.push(message(0, 50));
        let (key, _) = queue.drain().next().unwrap();
        assert_eq!(key.sequence, 4);
    }
}
