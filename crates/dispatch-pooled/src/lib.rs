//! Rayon thread pool dispatch.
//!
//! This module provides [`PooledDispatch`], which runs each round phase on a
//! dedicated rayon thread pool. Nodes are independent within a phase, so the
//! broadcast and apply phases parallelise without locking; `install` +
//! `par_iter` returns only once every node is done, which keeps the barrier
//! between phases.
//!
//! # Example
//!
//! ```no_run
//! use stp_dispatch_pooled::{PooledDispatch, ThreadPoolConfig};
//!
//! // Pick a size
//! let dispatch = PooledDispatch::with_threads(4).unwrap();
//!
//! // Or start from the detected core count
//! let config = ThreadPoolConfig::builder().stack_size(4 * 1024 * 1024).build().unwrap();
//! let dispatch = PooledDispatch::new(config).unwrap();
//! ```

use std::num::NonZeroUsize;
use thiserror::Error;
use tracing::instrument;

use stp_dispatch::Dispatch;

/// Errors from thread pool configuration.
#[derive(Debug, Error)]
pub enum ThreadPoolError {
    #[error("Failed to build rayon thread pool: {0}")]
    RayonBuildError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Configuration for the phase thread pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadPoolConfig {
    /// Number of worker threads.
    pub threads: usize,

    /// Stack size for worker threads (bytes). Default: 2MB.
    pub stack_size: usize,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self::auto()
    }
}

impl ThreadPoolConfig {
    /// One thread per available core.
    pub fn auto() -> Self {
        let available = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(4);

        Self::for_core_count(available)
    }

    /// Configure for a specific number of available cores.
    ///
    /// Leaves one core to the coordinator thread once there are more than two.
    pub fn for_core_count(total_cores: usize) -> Self {
        let threads = if total_cores > 2 {
            total_cores - 1
        } else {
            total_cores.max(1)
        };

        Self {
            threads,
            stack_size: 2 * 1024 * 1024,
        }
    }

    /// Create a builder for custom configuration.
    pub fn builder() -> ThreadPoolConfigBuilder {
        ThreadPoolConfigBuilder::new()
    }

    /// Minimal configuration for testing (a single worker).
    pub fn minimal() -> Self {
        Self {
            threads: 1,
            stack_size: 2 * 1024 * 1024,
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ThreadPoolError> {
        if self.threads == 0 {
            return Err(ThreadPoolError::InvalidConfig(
                "threads must be at least 1".to_string(),
            ));
        }
        if self.stack_size < 64 * 1024 {
            return Err(ThreadPoolError::InvalidConfig(format!(
                "stack_size must be at least 64KiB, got {}",
                self.stack_size
            )));
        }
        Ok(())
    }
}

/// Builder for ThreadPoolConfig.
#[derive(Debug, Clone)]
pub struct ThreadPoolConfigBuilder {
    config: ThreadPoolConfig,
}

impl ThreadPoolConfigBuilder {
    /// Create a new builder with auto-detected defaults.
    pub fn new() -> Self {
        Self {
            config: ThreadPoolConfig::auto(),
        }
    }

    /// Set the number of worker threads.
    pub fn threads(mut self, count: usize) -> Self {
        self.config.threads = count;
        self
    }

    /// Set stack size for worker threads.
    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = size;
        self
    }

    /// Build the configuration, validating it first.
    pub fn build(self) -> Result<ThreadPoolConfig, ThreadPoolError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ThreadPoolConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Rayon thread pool dispatch.
///
/// Owns one rayon pool. Every phase runs inside `ThreadPool::install()`, so
/// `par_iter` uses this pool rather than the global one.
pub struct PooledDispatch {
    config: ThreadPoolConfig,
    pool: rayon::ThreadPool,
}

impl std::fmt::Debug for PooledDispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledDispatch")
            .field("threads", &self.config.threads)
            .finish()
    }
}

impl PooledDispatch {
    /// Create a new pooled dispatch with the given configuration.
    pub fn new(config: ThreadPoolConfig) -> Result<Self, ThreadPoolError> {
        config.validate()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .stack_size(config.stack_size)
            .thread_name(|i| format!("phase-{}", i))
            .build()
            .map_err(|e| ThreadPoolError::RayonBuildError(e.to_string()))?;

        tracing::info!(threads = config.threads, "Phase thread pool initialized");

        Ok(Self { config, pool })
    }

    /// Create with a fixed number of threads.
    pub fn with_threads(threads: usize) -> Result<Self, ThreadPoolError> {
        Self::new(ThreadPoolConfig::builder().threads(threads).build()?)
    }
}

impl Dispatch for PooledDispatch {
    #[instrument(level = "trace", skip_all, fields(items = items.len()))]
    fn map_nodes<T, R>(&self, items: &[T], f: impl Fn(&T) -> R + Send + Sync) -> Vec<R>
    where
        T: Sync,
        R: Send,
    {
        self.pool.install(|| {
            use rayon::prelude::*;
            items.par_iter().map(f).collect()
        })
    }

    #[instrument(level = "trace", skip_all, fields(items = items.len()))]
    fn map_nodes_mut<T, R>(&self, items: &mut [T], f: impl Fn(&mut T) -> R + Send + Sync) -> Vec<R>
    where
        T: Send,
        R: Send,
    {
        self.pool.install(|| {
            use rayon::prelude::*;
            items.par_iter_mut().map(f).collect()
        })
    }

    fn parallelism(&self) -> usize {
        self.pool.current_num_threads()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_core_count() {
        assert_eq!(ThreadPoolConfig::for_core_count(1).threads, 1);
        assert_eq!(ThreadPoolConfig::for_core_count(2).threads, 2);
        assert_eq!(ThreadPoolConfig::for_core_count(8).threads, 7);
    }

    #[test]
    fn test_validation_rejects_zero_threads() {
        let err = ThreadPoolConfig::builder().threads(0).build().unwrap_err();
        assert!(matches!(err, ThreadPoolError::InvalidConfig(_)));

        let err = ThreadPoolConfig::builder()
            .threads(2)
            .stack_size(1024)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("stack_size"));
    }

    #[test]
    fn test_builder_defaults_to_detected_cores() {
        let config = ThreadPoolConfig::builder().build().unwrap();
        assert_eq!(config, ThreadPoolConfig::auto());
        assert!(config.threads >= 1);
    }

    #[test]
    fn test_pooled_map_preserves_order() {
        let dispatch = PooledDispatch::with_threads(4).unwrap();
        let items: Vec<u64> = (0..1000).collect();
        let doubled = dispatch.map_nodes(&items, |x| x * 2);
        assert_eq!(doubled, items.iter().map(|x| x * 2).collect::<Vec<_>>());
        assert_eq!(dispatch.parallelism(), 4);
    }

    #[test]
    fn test_pooled_map_mut_touches_every_item() {
        let dispatch = PooledDispatch::new(ThreadPoolConfig::minimal()).unwrap();
        let mut items = vec![0u32; 64];
        let results = dispatch.map_nodes_mut(&mut items, |x| {
            *x += 1;
            *x
        });
        assert!(items.iter().all(|x| *x == 1));
        assert_eq!(results.len(), 64);
    }
}
