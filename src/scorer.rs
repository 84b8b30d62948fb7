//! Per-position scoring and lazy alignment materialization.
//!
//! The pipeline treats scoring as a pure function behind the [`Scorer`]
//! trait: given a query and a target slice, produce one score per candidate
//! window placement. The default implementation counts compatible symbols
//! under the 4-bit IUPAC coding of [`crate::seq`]. Alignment artifacts
//! (aligned subsequence, mask, cover) are materialized through separate
//! accessors so they are only ever built for the top-ranked positions.

use crate::seq::{code_to_char, Seq};

/// Per-position match scores for one target slice, indexed relative to the
/// slice. Index `j` corresponds to the query window starting at relative
/// position `j - (q_len - 1)`, so a slice of length `l` yields
/// `l + q_len - 1` entries and windows hanging off either end score only
/// the symbols the slice contains.
pub type ScoreVector = Vec<u32>;

/// Scoring seam between the pipeline and the alignment engine.
///
/// Implementations must be pure with respect to their inputs: the reducer
/// relies on two adjacent chunks independently scoring their visible parts
/// of a boundary-straddling window and the sum reconstructing the
/// single-pass score.
pub trait Scorer: Send + Sync {
    /// Scores every candidate placement of `query` against `slice`.
    fn score(&self, query: &Seq, slice: &Seq) -> ScoreVector;

    /// The target symbols under the query window starting at `position`,
    /// with `'-'` where the window extends past either end of the target.
    fn aligned_sequence(&self, query: &Seq, target: &Seq, position: i64) -> String;

    /// Per-symbol intersection of query and target under the window
    /// (`'-'` where they are incompatible).
    fn alignment_mask(&self, query: &Seq, target: &Seq, position: i64) -> String;

    /// Per-symbol union of query and target under the window, as the
    /// narrowest degenerate code covering both.
    fn alignment_cover(&self, query: &Seq, target: &Seq, position: i64) -> String;
}

/// Default scorer: degenerate-aware match counting.
///
/// A window position contributes 1 to the score when the 4-bit masks of
/// the query symbol and the target symbol intersect, so `N` matches
/// everything and gaps match nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NtScorer;

impl Scorer for NtScorer {
    fn score(&self, query: &Seq, slice: &Seq) -> ScoreVector {
        let q_len = query.len();
        if q_len == 0 {
            return Vec::new();
        }
        let out_len = slice.len() + q_len - 1;
        let mut scores = vec![0_u32; out_len];
        for (j, score) in scores.iter_mut().enumerate() {
            let start = j as i64 - (q_len as i64 - 1);
            let mut matches = 0_u32;
            for (k, &q_code) in query.codes().iter().enumerate() {
                if q_code & slice.code_at(start + k as i64) != 0 {
                    matches += 1;
                }
            }
            *score = matches;
        }
        scores
    }

    fn aligned_sequence(&self, query: &Seq, target: &Seq, position: i64) -> String {
        (0..query.len())
            .map(|k| code_to_char(target.code_at(position + k as i64)))
            .collect()
    }

    fn alignment_mask(&self, query: &Seq, target: &Seq, position: i64) -> String {
        query
            .codes()
            .iter()
            .enumerate()
            .map(|(k, &q)| code_to_char(q & target.code_at(position + k as i64)))
            .collect()
    }

    fn alignment_cover(&self, query: &Seq, target: &Seq, position: i64) -> String {
        query
            .codes()
            .iter()
            .enumerate()
            .map(|(k, &q)| code_to_char(q | target.code_at(position + k as i64)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_score_vector_values() {
        let query = Seq::read("AC");
        let slice = Seq::read("ACAC");
        // windows start at -1, 0, 1, 2, 3
        assert_eq!(NtScorer.score(&query, &slice), vec![0, 2, 0, 2, 0]);
    }

    #[test]
    fn test_score_vector_length() {
        let query = Seq::read("ACGT");
        assert_eq!(NtScorer.score(&query, &Seq::read("ACGTACGT")).len(), 11);
        // empty slice still yields the hanging-window positions, all zero
        assert_eq!(NtScorer.score(&query, &Seq::read("")), vec![0, 0, 0]);
        assert!(NtScorer.score(&Seq::read(""), &Seq::read("ACGT")).is_empty());
    }

    #[test]
    fn test_degenerate_matching() {
        let query = Seq::read("AN");
        let slice = Seq::read("AG");
        // N intersects G, so both symbols match at position 0
        assert_eq!(NtScorer.score(&query, &slice)[1], 2);
    }

    #[test]
    fn test_materialization_in_range() {
        let query = Seq::read("AC");
        let target = Seq::read("TACT");
        assert_eq!(NtScorer.aligned_sequence(&query, &target, 1), "AC");
        assert_eq!(NtScorer.alignment_mask(&query, &target, 1), "AC");
        assert_eq!(NtScorer.alignment_cover(&query, &target, 1), "AC");
    }

    #[test]
    fn test_materialization_hanging_window() {
        let query = Seq::read("AC");
        let target = Seq::read("AG");
        // window at -1 only overlaps the first target symbol
        assert_eq!(NtScorer.aligned_sequence(&query, &target, -1), "-A");
        assert_eq!(NtScorer.alignment_mask(&query, &target, -1), "--");
        assert_eq!(NtScorer.alignment_cover(&query, &target, -1), "AM");
    }

    #[test]
    fn test_mismatch_artifacts() {
        let query = Seq::read("AC");
        let target = Seq::read("AG");
        assert_eq!(NtScorer.alignment_mask(&query, &target, 0), "A-");
        assert_eq!(NtScorer.alignment_cover(&query, &target, 0), "AS");
    }
}
