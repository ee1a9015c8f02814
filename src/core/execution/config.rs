//! Configuration for graph engine execution
//!
//! Controls how values fan out to downstream nodes and how far a single
//! drain of the update queue may cascade.

use serde::Deserialize;

/// Enumeration of supported concurrency modes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ConcurrencyMode {
    /// Deliver to downstream nodes one after another on the calling thread
    #[default]
    Sequential,
    /// Deliver to distinct downstream nodes in parallel using Rayon
    Rayon,
}

/// Default cap on propagation steps per `process_updates` call
pub const DEFAULT_MAX_PROPAGATION_STEPS: usize = 1024;

/// Configuration for the graph engine
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// The concurrency mode to use for fan-out
    pub concurrency_mode: ConcurrencyMode,
    /// Size of a dedicated thread pool, only relevant in Rayon mode.
    /// `None` uses Rayon's global pool.
    pub thread_pool_size: Option<usize>,
    /// Upper bound on updates handled by one drain of the queue
    pub max_propagation_steps: usize,
}

impl EngineConfig {
    /// Create a configuration with default values
    ///
    /// Sequential delivery, no dedicated pool, 1024 propagation steps.
    pub fn new() -> Self {
        Self {
            concurrency_mode: ConcurrencyMode::default(),
            thread_pool_size: None,
            max_propagation_steps: DEFAULT_MAX_PROPAGATION_STEPS,
        }
    }

    /// Set the concurrency mode
    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// Set the thread pool size for parallel delivery
    ///
    /// # Note
    /// This setting only affects execution when concurrency_mode is Rayon
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    pub fn with_max_propagation_steps(mut self, steps: usize) -> Self {
        self.max_propagation_steps = steps;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
