//! Per-phase wall-clock timing.
//!
//! Timing is best-effort observability and never affects correctness:
//! the collector only reads monotonic clocks and the resulting block is
//! attached to a response when the caller asked for statistics.

use std::time::{Duration, Instant};

/// Wall-clock durations for each pipeline phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timings {
    /// Parsing query and target into their coded representation
    pub prepare: Duration,
    /// Chunk dispatch and scoring (fan-out through fan-in)
    pub map: Duration,
    /// Positional merge of per-chunk score vectors; zero on the
    /// degenerate single-pass path
    pub reduce: Duration,
    /// Ranking and top-K materialization
    pub sort: Duration,
    /// Whole request
    pub total: Duration,
}

/// Start/stop capture for one phase.
#[derive(Debug, Clone, Copy)]
pub struct PhaseTimer {
    started: Instant,
}

impl PhaseTimer {
    pub fn start() -> Self {
        PhaseTimer {
            started: Instant::now(),
        }
    }

    pub fn stop(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Statistics block attached to a search response on request.
#[derive(Debug, Clone)]
pub struct SearchStats {
    /// Expanded query length in symbols
    pub query_len: usize,
    /// Target length in symbols
    pub target_len: usize,
    /// Number of chunk invocations (0 on the degenerate path)
    pub worker_count: usize,
    /// Per-phase durations
    pub timings: Timings,
    /// Per-call diagnostic records collected from the workers
    pub worker_meta: Vec<crate::dispatch::MapMeta>,
}
