//! Identifier types.

use std::fmt;

/// Edge weight of a single link.
pub type Weight = u64;

/// Cumulative path weight towards the believed root.
pub type Cost = u64;

/// Protocol-level node identifier.
///
/// Unique across a topology and totally ordered. The node with the smallest
/// `NodeId` is the root every other node converges towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable handle of a node inside the simulation arena.
///
/// Assigned in declaration order. Unlike [`NodeId`] it carries no protocol
/// meaning; it only locates a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// The handle as a `Vec` index.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for NodeIndex {
    fn from(index: usize) -> Self {
        Self(index as u32)
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_ordering() {
        assert!(NodeId(1) < NodeId(3));
        assert_eq!(NodeId(7).max(NodeId(2)), NodeId(7));
    }

    #[test]
    fn test_node_index_roundtrip() {
        let index = NodeIndex::from(5usize);
        assert_eq!(index.as_usize(), 5);
        assert_eq!(index.to_string(), "#5");
    }
}
