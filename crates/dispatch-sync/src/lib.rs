//! Synchronous inline dispatch.
//!
//! [`SyncDispatch`] runs every phase on the calling thread in input order.

use stp_dispatch::Dispatch;

/// Synchronous dispatch that iterates inline.
///
/// All work runs on the calling thread in node order.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyncDispatch;

impl SyncDispatch {
    pub fn new() -> Self {
        Self
    }
}

impl Dispatch for SyncDispatch {
    fn map_nodes<T, R>(&self, items: &[T], f: impl Fn(&T) -> R + Send + Sync) -> Vec<R>
    where
        T: Sync,
        R: Send,
    {
        items.iter().map(f).collect()
    }

    fn map_nodes_mut<T, R>(&self, items: &mut [T], f: impl Fn(&mut T) -> R + Send + Sync) -> Vec<R>
    where
        T: Send,
        R: Send,
    {
        items.iter_mut().map(f).collect()
    }

    fn parallelism(&self) -> usize {
        1
    }
}
