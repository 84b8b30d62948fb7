//! Ranking and top-K materialization.
//!
//! Candidate positions are ordered by descending score with ascending
//! position as the tie-break, so rankings are deterministic across runs
//! and across worker counts. Alignment artifacts are only built for the
//! selected positions; everything else stays a bare score.

use crate::scorer::Scorer;
use crate::seq::Seq;

/// A scored position with its materialized alignment artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedMatch {
    /// Absolute start of the query window in the target; negative when
    /// the window hangs off the front
    pub position: i64,
    /// Number of matching symbols under the window
    pub matches: u32,
    /// Target symbols under the window (`'-'` beyond the target's ends)
    pub sequence: String,
    /// Per-symbol intersection of query and target
    pub mask: String,
    /// Per-symbol union of query and target
    pub cover: String,
}

/// Selects the top `count` merged indices, best score first, ties by
/// ascending position.
pub fn top_positions(merged: &[u32], count: usize) -> Vec<(usize, u32)> {
    let mut order: Vec<usize> = (0..merged.len()).collect();
    order.sort_by(|&a, &b| merged[b].cmp(&merged[a]).then(a.cmp(&b)));
    order.truncate(count);
    order.into_iter().map(|n| (n, merged[n])).collect()
}

/// Materializes the selected merged indices into [`RankedMatch`] values
/// via the scorer's accessors.
pub fn materialize(
    scorer: &dyn Scorer,
    query: &Seq,
    target: &Seq,
    selected: Vec<(usize, u32)>,
) -> Vec<RankedMatch> {
    let adjust = query.len() as i64 - 1;
    selected
        .into_iter()
        .map(|(n, matches)| {
            let position = n as i64 - adjust;
            RankedMatch {
                position,
                matches,
                sequence: scorer.aligned_sequence(query, target, position),
                mask: scorer.alignment_mask(query, target, position),
                cover: scorer.alignment_cover(query, target, position),
            }
        })
        .collect()
}
