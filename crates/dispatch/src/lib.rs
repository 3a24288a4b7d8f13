//! Dispatch trait for running a round phase across every node.
//!
//! The round coordinator never iterates nodes itself. It hands each phase to a
//! [`Dispatch`] implementation:
//!
//! - [`SyncDispatch`](https://docs.rs/stp-dispatch-sync) iterates inline on the calling thread
//! - [`PooledDispatch`](https://docs.rs/stp-dispatch-pooled) fans out over a rayon thread pool
//!
//! # Phase barrier
//!
//! Both methods are **blocking**: they return only when the closure has run
//! for every item. That return is the barrier between the broadcast phase,
//! message delivery and the apply phase. Results always come back in input
//! order, so the coordinator's delivery order does not depend on scheduling.

/// Trait for mapping a phase over the node arena.
pub trait Dispatch: Send + Sync {
    /// Map a read-only function over items, potentially in parallel.
    ///
    /// Used for the broadcast phase, where nodes only read their own state.
    fn map_nodes<T, R>(&self, items: &[T], f: impl Fn(&T) -> R + Send + Sync) -> Vec<R>
    where
        T: Sync,
        R: Send;

    /// Map a mutating function over items, potentially in parallel.
    ///
    /// Each call gets exclusive access to exactly one item. Used for the apply
    /// phase, where every node mutates only itself.
    fn map_nodes_mut<T, R>(&self, items: &mut [T], f: impl Fn(&mut T) -> R + Send + Sync) -> Vec<R>
    where
        T: Send,
        R: Send;

    /// Number of threads a phase may run on.
    fn parallelism(&self) -> usize;
}
