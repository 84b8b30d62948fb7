//! The search pipeline: validate, partition, dispatch, reduce, rank.
//!
//! This module owns the request surface and the end-to-end flow. All
//! validation happens before any chunk is dispatched; a single chunk
//! failure aborts the whole request with no partial results, because a
//! missing chunk would silently bias the merged scores low at its
//! positions and corrupt the ranking without any visible signal.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::dispatch::{self, MapRequest, WorkerInvoker};
use crate::error::{Result, SearchError};
use crate::partition;
use crate::rank::{self, RankedMatch};
use crate::reduce;
use crate::scorer::Scorer;
use crate::seq::Seq;
use crate::timing::{PhaseTimer, SearchStats, Timings};

/// Upper bound on the number of matches a request may ask for.
pub const MAX_COUNT: usize = 100;

/// Parameters for one search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Query string (may be empty, yielding empty results)
    pub q: String,
    /// Target string; when absent the handle's default target is used.
    /// An explicitly empty target is searched as-is (zero results).
    pub seq: Option<String>,
    /// Number of top matches to return, clamped to `[0, 100]`
    pub count: usize,
    /// The query is repeated this many times before searching; 0 is
    /// treated as 1
    pub repeat: usize,
    /// Attach the timing/length breakdown to the response
    pub stats: bool,
}

impl Default for SearchRequest {
    fn default() -> Self {
        SearchRequest {
            q: String::new(),
            seq: None,
            count: 1,
            repeat: 1,
            stats: false,
        }
    }
}

impl SearchRequest {
    pub fn new(q: &str) -> Self {
        SearchRequest {
            q: q.to_string(),
            ..Default::default()
        }
    }

    pub fn with_seq(mut self, seq: &str) -> Self {
        self.seq = Some(seq.to_string());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_repeat(mut self, repeat: usize) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn with_stats(mut self, stats: bool) -> Self {
        self.stats = stats;
        self
    }
}

/// A completed search: ranked matches best-first, plus statistics when
/// the request asked for them.
#[derive(Debug)]
pub struct SearchResult {
    pub results: Vec<RankedMatch>,
    pub stats: Option<SearchStats>,
}

fn empty_result(
    want_stats: bool,
    query_len: usize,
    target_len: usize,
    total_timer: PhaseTimer,
) -> SearchResult {
    let stats = want_stats.then(|| SearchStats {
        query_len,
        target_len,
        worker_count: 0,
        timings: Timings {
            total: total_timer.stop(),
            ..Default::default()
        },
        worker_meta: Vec::new(),
    });
    SearchResult {
        results: Vec::new(),
        stats,
    }
}

pub(crate) fn run(
    config: &Config,
    invoker: &Arc<dyn WorkerInvoker>,
    scorer: &dyn Scorer,
    request: &SearchRequest,
    default_target: Option<&str>,
) -> Result<SearchResult> {
    let total_timer = PhaseTimer::start();

    let count = request.count.min(MAX_COUNT);
    let repeat = request.repeat.max(1);

    // bound the expanded query length before materializing it
    let expanded_len = request
        .q
        .len()
        .checked_mul(repeat)
        .unwrap_or(usize::MAX);
    if expanded_len > config.max_input_len {
        return Err(SearchError::InputTooLarge {
            what: "query",
            len: expanded_len,
            max: config.max_input_len,
        });
    }
    let q = request.q.repeat(repeat);

    let seq: &str = match (&request.seq, default_target) {
        (Some(seq), _) => seq.as_str(),
        (None, Some(default)) => default,
        (None, None) => {
            return Err(SearchError::InvalidInput(
                "no target sequence provided and no default target configured".to_string(),
            ))
        }
    };
    if seq.len() > config.max_input_len {
        return Err(SearchError::InputTooLarge {
            what: "target",
            len: seq.len(),
            max: config.max_input_len,
        });
    }

    // empty query or empty target: nothing can match
    if q.is_empty() || seq.is_empty() {
        return Ok(empty_result(request.stats, q.len(), seq.len(), total_timer));
    }

    let prepare_timer = PhaseTimer::start();
    let query = Seq::read(&q);
    let target = Seq::read(seq);
    let prepare = prepare_timer.stop();

    let plan = partition::plan(query.len(), target.len(), config)?;
    if config.verbose {
        eprintln!(
            "[ntsearch] query {} x target {} -> {} workers, chunk size {}",
            query.len(),
            target.len(),
            plan.worker_count,
            plan.chunk_size
        );
    }

    let map_timer = PhaseTimer::start();
    let (merged_data, worker_meta, map_time, reduce_time) = if plan.is_degenerate() {
        // single unchunked pass through the same worker entry point
        let response = dispatch::map_chunk(
            scorer,
            &MapRequest {
                q: q.clone(),
                seq: seq.as_bytes().to_vec(),
                offset: 0,
                chunk: 0,
            },
        );
        (response.data, response.meta, map_timer.stop(), Duration::ZERO)
    } else {
        let responses = dispatch::dispatch(invoker, &q, seq, &plan, config)?;
        let map_time = map_timer.stop();

        let reduce_timer = PhaseTimer::start();
        let merged = reduce::reduce(query.len(), target.len(), responses);
        (merged.data, merged.meta, map_time, reduce_timer.stop())
    };

    let sort_timer = PhaseTimer::start();
    let selected = rank::top_positions(&merged_data, count);
    let results = rank::materialize(scorer, &query, &target, selected);
    let sort = sort_timer.stop();

    let stats = request.stats.then(|| SearchStats {
        query_len: query.len(),
        target_len: target.len(),
        worker_count: plan.worker_count,
        timings: Timings {
            prepare,
            map: map_time,
            reduce: reduce_time,
            sort,
            total: total_timer.stop(),
        },
        worker_meta,
    });

    Ok(SearchResult { results, stats })
}
