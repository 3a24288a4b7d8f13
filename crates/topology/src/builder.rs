//! Name-addressed topology construction.

use stp_types::{NodeId, NodeIndex, Topology, TopologyError, Weight};

/// Errors from [`TopologyBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// A link references a name that has not been declared yet.
    #[error("node '{name}' is not declared")]
    UndeclaredNode { name: String },

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Builds a [`Topology`] from named nodes and links.
///
/// Links are symmetric: one `link("A", "B", w)` call gives both endpoints a
/// neighbor entry.
///
/// # Example
///
/// ```
/// use stp_topology::TopologyBuilder;
///
/// let topology = TopologyBuilder::new()
///     .node("A", 5)
///     .node("B", 1)
///     .link("A", "B", 10)
///     .build()
///     .unwrap();
/// assert_eq!(topology.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct TopologyBuilder {
    topology: Topology,
    error: Option<BuildError>,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a named node.
    pub fn declare(&mut self, name: &str, id: u64) -> Result<NodeIndex, BuildError> {
        Ok(self.topology.add_node(NodeId(id), Some(name.to_string()))?)
    }

    /// Declare an unnamed node; it is reported by its numeric id.
    pub fn declare_unnamed(&mut self, id: u64) -> Result<NodeIndex, BuildError> {
        Ok(self.topology.add_node(NodeId(id), None)?)
    }

    /// Link two previously declared nodes.
    pub fn connect(&mut self, a: &str, b: &str, weight: Weight) -> Result<(), BuildError> {
        let a = self.resolve(a)?;
        let b = self.resolve(b)?;
        Ok(self.topology.add_link(a, b, weight)?)
    }

    /// Chaining form of [`declare`](Self::declare). The first error is kept
    /// and returned by [`build`](Self::build).
    pub fn node(mut self, name: &str, id: u64) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.declare(name, id) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Chaining form of [`connect`](Self::connect).
    pub fn link(mut self, a: &str, b: &str, weight: Weight) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.connect(a, b, weight) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Finish, returning the first error hit by a chained call.
    pub fn build(self) -> Result<Topology, BuildError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.topology),
        }
    }

    /// Finish without checking chained errors.
    pub(crate) fn finish(self) -> Topology {
        self.topology
    }

    fn resolve(&self, name: &str) -> Result<NodeIndex, BuildError> {
        self.topology
            .index_of_name(name)
            .ok_or_else(|| BuildError::UndeclaredNode {
                name: name.to_string(),
            })
    }
}
