//! # ntsearch: Chunked Map/Reduce Nucleotide Search
//!
//! This library answers "where does query Q approximately occur in
//! sequence S?" by splitting a long target sequence into chunks,
//! dispatching each chunk to a worker invocation for independent
//! per-position scoring, merging the partial score vectors back into one
//! contiguous result, and ranking the top matches.
//!
//! ## Overview
//!
//! ntsearch allows you to:
//! - Search a multi-megabyte target for the best approximate placements
//!   of a query, with IUPAC degenerate codes matched bitwise
//! - Fan the work out across a bounded pool of workers, in-process by
//!   default or through a custom [`WorkerInvoker`] for remote execution
//! - Get deterministic rankings: the chunked result is positionally
//!   identical to a single unchunked pass
//! - Collect per-phase timing breakdowns on request
//!
//! ## Example Usage
//!
//! ```
//! # fn main() -> ntsearch::Result<()> {
//! use ntsearch::{Config, NtSearch, SearchRequest};
//!
//! let engine = NtSearch::new(Config::default());
//!
//! let request = SearchRequest::new("ACGT")
//!     .with_seq("TTACGTTT")
//!     .with_count(1);
//! let result = engine.search(&request)?;
//!
//! assert_eq!(result.results[0].position, 2);
//! assert_eq!(result.results[0].matches, 4);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is structured in several modules:
//! - `partition`: chunk-size and worker-count computation
//! - `dispatch`: the worker seam and the concurrent fan-out/fan-in
//! - `reduce`: positional merge with summation at chunk seams
//! - `rank`: top-K selection and lazy alignment materialization
//! - `scorer`: the scoring seam and the default degenerate-match scorer
//! - `seq`: 4-bit coded nucleotide sequences
//! - `timing`, `config`, `error`: the ambient pieces
//!
//! ## Correctness across chunk boundaries
//!
//! A query window that straddles the seam between two adjacent chunks is
//! scored partially by each side; the reducer sums contributions at the
//! same absolute position, reconstructing exactly the score a single
//! unchunked pass would have produced. A search therefore returns the
//! same ranking whether it ran with zero, one, or two hundred workers.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod partition;
pub mod rank;
pub mod reduce;
pub mod scorer;
pub mod search;
pub mod seq;
pub mod timing;

use std::path::Path;
use std::sync::Arc;

pub use config::Config;
pub use dispatch::{map_chunk, InProcessInvoker, MapMeta, MapRequest, MapResponse, WorkerInvoker};
pub use error::{Result, SearchError};
pub use rank::RankedMatch;
pub use scorer::{NtScorer, ScoreVector, Scorer};
pub use search::{SearchRequest, SearchResult, MAX_COUNT};
pub use seq::Seq;
pub use timing::{SearchStats, Timings};

/// Main interface to the search pipeline.
///
/// Holds the configuration, the scorer, the worker invoker, and an
/// optional default target sequence. The default target is injected
/// explicitly here rather than loaded as ambient global state, so tests
/// and embedders can supply synthetic targets.
pub struct NtSearch {
    config: Config,
    scorer: Arc<dyn Scorer>,
    invoker: Arc<dyn WorkerInvoker>,
    default_target: Option<String>,
}

impl NtSearch {
    /// Creates a search engine with the given configuration, the default
    /// scorer, and in-process workers.
    pub fn new(config: Config) -> Self {
        let scorer: Arc<dyn Scorer> = Arc::new(NtScorer);
        let invoker: Arc<dyn WorkerInvoker> = Arc::new(InProcessInvoker::new(Arc::clone(&scorer)));
        NtSearch {
            config,
            scorer,
            invoker,
            default_target: None,
        }
    }

    /// Replaces the worker invoker, e.g. with a remote transport.
    pub fn with_invoker(mut self, invoker: Arc<dyn WorkerInvoker>) -> Self {
        self.invoker = invoker;
        self
    }

    /// Replaces the scorer used for the degenerate single-pass path and
    /// for materializing ranked matches. Remote workers score with
    /// whatever their invoker wires in.
    pub fn with_scorer(mut self, scorer: Arc<dyn Scorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Sets the target used when a request does not supply one.
    pub fn with_default_target(mut self, seq: &str) -> Self {
        self.default_target = Some(seq.to_string());
        self
    }

    /// Loads the default target from a plain-text sequence file,
    /// keeping at most the first `max_len` symbols. Whitespace
    /// (including newlines) is stripped.
    pub fn default_target_from_file(mut self, path: &Path, max_len: usize) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut seq = String::with_capacity(max_len.min(text.len()));
        for c in text.chars().filter(|c| !c.is_whitespace()) {
            if seq.len() >= max_len {
                break;
            }
            seq.push(c);
        }
        self.default_target = Some(seq);
        Ok(self)
    }

    /// Runs one search request through the pipeline.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The expanded query or the target exceeds the configured maximum
    /// - No target was supplied and no default target is configured
    /// - Any dispatched chunk invocation fails or the map deadline expires
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        search::run(
            &self.config,
            &self.invoker,
            self.scorer.as_ref(),
            request,
            self.default_target.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_target_is_used_when_seq_absent() {
        let engine = NtSearch::new(Config::default()).with_default_target("TTTTACGTTT");
        let result = engine.search(&SearchRequest::new("ACGT")).unwrap();
        assert_eq!(result.results.len(), 1);
        assert_eq!(result.results[0].position, 4);
        assert_eq!(result.results[0].matches, 4);
    }

    #[test]
    fn test_missing_target_is_invalid_input() {
        let engine = NtSearch::new(Config::default());
        assert!(matches!(
            engine.search(&SearchRequest::new("ACGT")),
            Err(SearchError::InvalidInput(_))
        ));
    }
}
