//! Chunk dispatch: fan-out to worker invocations, fan-in of their results.
//!
//! The dispatcher is invocation-mechanism-agnostic. It hands each chunk's
//! request to a [`WorkerInvoker`], which may run the scorer in-process
//! (the default) or forward the call over a network boundary. Calls are
//! multiplexed over a bounded pool of threads; the fan-in collects every
//! response before reduction starts and aborts the whole search on the
//! first error without waiting for stragglers.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crate::config::Config;
use crate::error::{Result, SearchError};
use crate::partition::PartitionPlan;
use crate::scorer::Scorer;
use crate::seq::Seq;

/// One chunk's worth of work: the full (unsliced) query, the target slice,
/// and the slice's absolute offset. The chunk index is threaded through as
/// an explicit token and echoed back in the response, so result
/// association does not depend on delivery order.
///
/// The full query always travels with the request: correct scoring near a
/// chunk's tail depends on the query's full length, never on a slice of it.
/// The slice travels as raw bytes because chunk boundaries are byte
/// offsets and may fall inside a multi-byte character; coding is per byte
/// either way (see [`Seq::from_bytes`]).
#[derive(Debug, Clone)]
pub struct MapRequest {
    pub q: String,
    pub seq: Vec<u8>,
    pub offset: usize,
    pub chunk: usize,
}

/// Per-call diagnostic record, concatenated across chunks by the reducer.
#[derive(Debug, Clone)]
pub struct MapMeta {
    pub chunk: usize,
    /// Time spent parsing the request's sequences, in microseconds
    pub read_micros: u128,
    /// Time spent scoring, in microseconds
    pub score_micros: u128,
}

/// A worker's answer: the raw per-position score vector for its slice,
/// plus diagnostics. The chunk token and the slice's absolute offset are
/// echoed back so the reducer can place the scores without assuming
/// anything about delivery order.
#[derive(Debug)]
pub struct MapResponse {
    pub chunk: usize,
    pub offset: usize,
    pub meta: Vec<MapMeta>,
    pub data: Vec<u32>,
}

/// The seam between the dispatcher and the invocation mechanism.
///
/// Implementations must treat each call as at-most-once: the dispatcher
/// never retries, and a failed call fails the whole search.
pub trait WorkerInvoker: Send + Sync {
    fn invoke(&self, request: MapRequest) -> Result<MapResponse>;
}

/// The single-chunk worker entry point.
///
/// This is what a remote worker process would run for one request; the
/// in-process invoker and the degenerate single-pass path both go through
/// it so metadata handling does not fork.
pub fn map_chunk(scorer: &dyn Scorer, request: &MapRequest) -> MapResponse {
    let read_start = Instant::now();
    let query = Seq::read(&request.q);
    let slice = Seq::from_bytes(&request.seq);
    let read_micros = read_start.elapsed().as_micros();

    let score_start = Instant::now();
    let data = scorer.score(&query, &slice);
    let score_micros = score_start.elapsed().as_micros();

    MapResponse {
        chunk: request.chunk,
        offset: request.offset,
        meta: vec![MapMeta {
            chunk: request.chunk,
            read_micros,
            score_micros,
        }],
        data,
    }
}

/// In-process invoker: runs [`map_chunk`] synchronously on the calling
/// thread.
pub struct InProcessInvoker {
    scorer: Arc<dyn Scorer>,
}

impl InProcessInvoker {
    pub fn new(scorer: Arc<dyn Scorer>) -> Self {
        InProcessInvoker { scorer }
    }
}

impl WorkerInvoker for InProcessInvoker {
    fn invoke(&self, request: MapRequest) -> Result<MapResponse> {
        Ok(map_chunk(self.scorer.as_ref(), &request))
    }
}

/// Fans one request per chunk out to the invoker and collects all
/// responses, ordered by chunk index.
///
/// The first failed call aborts the collection immediately; outstanding
/// calls are left to finish on the pool and their results are discarded.
/// When `config.map_deadline` is set, the whole fan-in must finish within
/// it or the search fails with [`SearchError::DeadlineExceeded`].
pub fn dispatch(
    invoker: &Arc<dyn WorkerInvoker>,
    q: &str,
    seq: &str,
    plan: &PartitionPlan,
    config: &Config,
) -> Result<Vec<MapResponse>> {
    let n_chunks = plan.chunks.len();
    let (job_tx, job_rx) = crossbeam_channel::bounded::<MapRequest>(n_chunks);
    let seq_bytes = seq.as_bytes();
    for chunk in &plan.chunks {
        // byte slicing: a chunk boundary may fall inside a multi-byte
        // character, which codes as gaps per byte on both sides
        let start = chunk.offset.min(seq_bytes.len());
        let end = (chunk.offset + chunk.len).min(seq_bytes.len());
        job_tx
            .send(MapRequest {
                q: q.to_string(),
                seq: seq_bytes[start..end].to_vec(),
                offset: chunk.offset,
                chunk: chunk.index,
            })
            .expect("job channel has capacity for every chunk");
    }
    drop(job_tx);

    let n_threads = config.pool_threads.min(n_chunks).max(1);
    if config.verbose {
        eprintln!("[ntsearch] dispatching {n_chunks} chunks across {n_threads} threads");
    }

    let (result_tx, result_rx) = mpsc::channel::<(usize, Result<MapResponse>)>();
    for _ in 0..n_threads {
        let jobs = job_rx.clone();
        let results = result_tx.clone();
        let invoker = Arc::clone(invoker);
        thread::spawn(move || {
            for request in jobs.iter() {
                let index = request.chunk;
                let response = invoker.invoke(request);
                if results.send((index, response)).is_err() {
                    // collector bailed out; drain no further work
                    break;
                }
            }
        });
    }
    drop(result_tx);

    let deadline = config.map_deadline.map(|d| Instant::now() + d);
    let mut slots: Vec<Option<MapResponse>> = (0..n_chunks).map(|_| None).collect();
    for _ in 0..n_chunks {
        let received = match deadline {
            Some(at) => {
                let remaining = at.saturating_duration_since(Instant::now());
                match result_rx.recv_timeout(remaining) {
                    Ok(message) => message,
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        return Err(SearchError::DeadlineExceeded)
                    }
                    Err(mpsc::RecvTimeoutError::Disconnected) => {
                        return Err(SearchError::Other(
                            "worker pool disconnected before all chunks completed".to_string(),
                        ))
                    }
                }
            }
            None => match result_rx.recv() {
                Ok(message) => message,
                Err(_) => {
                    return Err(SearchError::Other(
                        "worker pool disconnected before all chunks completed".to_string(),
                    ))
                }
            },
        };
        match received {
            (index, Ok(response)) => slots[index] = Some(response),
            (index, Err(e)) => {
                return Err(SearchError::WorkerFailed {
                    chunk: index,
                    message: e.to_string(),
                })
            }
        }
    }

    Ok(slots
        .into_iter()
        .map(|slot| slot.expect("every chunk slot filled after n_chunks receives"))
        .collect())
}
