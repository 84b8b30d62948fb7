//! Target partitioning.
//!
//! Decides how many workers a search should fan out to and how the target
//! tiles into chunks. Chunk sizing is driven by the query length: scoring
//! cost per position grows with the query, so longer queries get smaller
//! chunks to keep each worker's total cost roughly bounded.

use crate::config::Config;
use crate::error::{Result, SearchError};

/// A contiguous sub-range of the target assigned to one worker invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub offset: usize,
    pub len: usize,
}

/// The partitioner's decision for one search.
#[derive(Debug, Clone)]
pub struct PartitionPlan {
    /// Number of chunk invocations; 0 or 1 means the degenerate path
    pub worker_count: usize,
    /// Tile width; every chunk's offset is `index * chunk_size`
    pub chunk_size: usize,
    /// Chunks in index order, tiling `[0, s_len)` without gaps or overlap.
    /// Empty on the degenerate path.
    pub chunks: Vec<Chunk>,
}

impl PartitionPlan {
    /// True when the search should run as a single unchunked pass,
    /// bypassing dispatch and reduction.
    pub fn is_degenerate(&self) -> bool {
        self.worker_count <= 1
    }
}

fn cdiv(x: usize, y: usize) -> usize {
    (x + y - 1) / y
}

/// Computes the chunking for a query of `q_len` symbols against a target
/// of `s_len` symbols.
///
/// `q_len` must be positive (the caller short-circuits empty queries
/// before planning). `s_len = 0` yields a zero-worker degenerate plan.
pub fn plan(q_len: usize, s_len: usize, config: &Config) -> Result<PartitionPlan> {
    if q_len == 0 {
        return Err(SearchError::InvalidInput(
            "query length must be positive".to_string(),
        ));
    }

    let ideal = (config.cost_budget / q_len as u64).max(config.min_chunk_size as u64) as usize;
    let worker_count = if s_len == 0 {
        0
    } else {
        config.max_workers.min(cdiv(s_len, ideal))
    };

    if worker_count <= 1 {
        return Ok(PartitionPlan {
            worker_count,
            chunk_size: s_len,
            chunks: Vec::new(),
        });
    }

    // recompute so the chunks evenly tile the target
    let chunk_size = cdiv(s_len, worker_count);
    let chunks = (0..worker_count)
        .map(|index| {
            let offset = index * chunk_size;
            Chunk {
                index,
                offset,
                len: chunk_size.min(s_len.saturating_sub(offset)),
            }
        })
        .collect();

    Ok(PartitionPlan {
        worker_count,
        chunk_size,
        chunks,
    })
}
