//! Configuration options for search pipeline operations.
//!
//! This module provides a builder pattern for configuring the partitioner,
//! the dispatcher's worker pool, and input validation limits.

use std::time::Duration;

/// Configuration for the partition / dispatch / reduce / rank pipeline.
///
/// Use the builder pattern to construct configurations with non-default
/// values.
///
/// # Default Values
/// - `max_workers`: 200
/// - `min_chunk_size`: 10 symbols
/// - `cost_budget`: 1,000,000,000 (symbol-comparisons per chunk)
/// - `max_input_len`: 5,000,000 symbols
/// - `pool_threads`: number of CPU cores
/// - `map_deadline`: None (wait indefinitely)
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of chunk invocations per search
    pub max_workers: usize,

    /// Smallest chunk the partitioner will produce, in symbols
    pub min_chunk_size: usize,

    /// Rough per-chunk scoring budget. The ideal chunk size is
    /// `cost_budget / query_len`, so longer queries get smaller chunks
    /// and the per-worker cost stays roughly bounded.
    pub cost_budget: u64,

    /// Maximum length for the expanded query and for the target,
    /// each checked independently before any dispatch
    pub max_input_len: usize,

    /// Number of threads multiplexing chunk invocations
    pub pool_threads: usize,

    /// Optional wall-clock bound on the whole map phase
    pub map_deadline: Option<Duration>,

    /// Enable verbose mode for per-phase progress on stderr
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_workers: 200,
            min_chunk_size: 10,
            cost_budget: 1_000_000_000,
            max_input_len: 5_000_000,
            pool_threads: num_cpus::get().max(1),
            map_deadline: None,
            verbose: false,
        }
    }
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Example
    /// ```
    /// use ntsearch::Config;
    ///
    /// let config = Config::builder()
    ///     .max_workers(50)
    ///     .min_chunk_size(100)
    ///     .verbose(false)
    ///     .build();
    /// ```
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Configuration that never parallelizes: the whole target is scored
    /// in a single pass. Useful as a correctness baseline.
    pub fn serial() -> Self {
        Config {
            max_workers: 1,
            ..Default::default()
        }
    }
}

/// Builder for constructing Config instances.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Sets the maximum number of chunk invocations.
    ///
    /// Default: 200
    pub fn max_workers(mut self, workers: usize) -> Self {
        assert!(workers > 0, "max_workers must be positive");
        self.config.max_workers = workers;
        self
    }

    /// Sets the smallest chunk size the partitioner will produce.
    ///
    /// Default: 10 symbols
    pub fn min_chunk_size(mut self, size: usize) -> Self {
        assert!(size > 0, "min_chunk_size must be positive");
        self.config.min_chunk_size = size;
        self
    }

    /// Sets the per-chunk scoring budget used to derive the ideal
    /// chunk size from the query length.
    ///
    /// Default: 1,000,000,000
    pub fn cost_budget(mut self, budget: u64) -> Self {
        self.config.cost_budget = budget;
        self
    }

    /// Sets the maximum accepted input length, applied to the expanded
    /// query and to the target independently.
    ///
    /// Default: 5,000,000 symbols
    pub fn max_input_len(mut self, len: usize) -> Self {
        self.config.max_input_len = len;
        self
    }

    /// Sets the number of threads multiplexing chunk invocations.
    ///
    /// Default: Number of CPU cores
    pub fn pool_threads(mut self, threads: usize) -> Self {
        assert!(threads > 0, "pool_threads must be positive");
        self.config.pool_threads = threads;
        self
    }

    /// Sets a wall-clock deadline for the whole map phase.
    ///
    /// Default: None (wait indefinitely)
    pub fn map_deadline(mut self, deadline: Duration) -> Self {
        self.config.map_deadline = Some(deadline);
        self
    }

    /// Enable verbose mode for per-phase progress output.
    ///
    /// Default: false
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Builds the final Config instance.
    pub fn build(self) -> Config {
        self.config
    }
}
