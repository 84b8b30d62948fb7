//! Positional merge of per-chunk score vectors.
//!
//! Each chunk scores windows it can only partially see: a window that
//! straddles the seam between chunk `i` and chunk `i+1` gets a partial
//! score from each side, computed independently. Summing contributions at
//! the same absolute position reconstructs exactly the score a single
//! unchunked pass would have produced, which is the correctness-critical
//! invariant of the whole pipeline.

use crate::dispatch::{MapMeta, MapResponse};

/// The reducer's output: one score per absolute candidate position, plus
/// the concatenated worker diagnostics.
#[derive(Debug)]
pub struct Merged {
    /// Length `s_len + q_len - 1`, indexed by absolute position
    pub data: Vec<u32>,
    /// Chunk-order concatenation of every response's metadata
    pub meta: Vec<MapMeta>,
}

/// Merges chunk responses (ordered by chunk index) into one
/// sequence-length score array.
///
/// Each chunk's vector index `j` lands at absolute index
/// `offset + j`, using the offset echoed back in the response;
/// contributions at the same index are summed, so the `q_len - 1`
/// overlap positions at each seam add up rather than overwrite.
pub fn reduce(q_len: usize, s_len: usize, responses: Vec<MapResponse>) -> Merged {
    debug_assert!(q_len > 0);
    let mut data = vec![0_u32; s_len + q_len - 1];
    let mut meta = Vec::with_capacity(responses.len());
    for response in responses {
        for (j, value) in response.data.into_iter().enumerate() {
            if let Some(slot) = data.get_mut(response.offset + j) {
                *slot += value;
            }
        }
        meta.extend(response.meta);
    }
    Merged { data, meta }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::MapRequest;
    use crate::scorer::{NtScorer, Scorer};
    use crate::seq::Seq;
    use pretty_assertions::assert_eq;

    fn response(chunk: usize, offset: usize, data: Vec<u32>) -> MapResponse {
        MapResponse {
            chunk,
            offset,
            meta: vec![MapMeta {
                chunk,
                read_micros: 0,
                score_micros: 0,
            }],
            data,
        }
    }

    #[test]
    fn test_overlapping_contributions_sum() {
        // q_len = 3, s_len = 8, chunk size 4: each chunk's vector has
        // 4 + 3 - 1 = 6 entries, overlapping the next chunk's first two
        let merged = reduce(
            3,
            8,
            vec![
                response(0, 0, vec![1, 1, 1, 1, 1, 1]),
                response(1, 4, vec![2, 2, 2, 2, 2, 2]),
            ],
        );
        assert_eq!(merged.data, vec![1, 1, 1, 1, 3, 3, 2, 2, 2, 2]);
        assert_eq!(merged.meta.len(), 2);
        assert_eq!(merged.meta[0].chunk, 0);
        assert_eq!(merged.meta[1].chunk, 1);
    }

    #[test]
    fn test_seam_sum_equals_single_pass() {
        // a real boundary-straddling match: score each half-slice with the
        // full query and check the merged array equals the unchunked score
        let q = "ACGT";
        let seq = "TTTACGTTTT";
        let chunk_size = 5;
        let query = Seq::read(q);

        let single_pass = NtScorer.score(&query, &Seq::read(seq));

        let responses: Vec<MapResponse> = (0..2)
            .map(|i| {
                let slice = &seq.as_bytes()[i * chunk_size..(i + 1) * chunk_size];
                crate::dispatch::map_chunk(
                    &NtScorer,
                    &MapRequest {
                        q: q.to_string(),
                        seq: slice.to_vec(),
                        offset: i * chunk_size,
                        chunk: i,
                    },
                )
            })
            .collect();

        let merged = reduce(query.len(), seq.len(), responses);
        assert_eq!(merged.data, single_pass);
    }

    #[test]
    fn test_empty_chunk_contributes_nothing() {
        let merged = reduce(
            2,
            4,
            vec![response(0, 0, vec![0, 1, 2]), response(1, 2, vec![])],
        );
        assert_eq!(merged.data, vec![0, 1, 2, 0, 0]);
    }
}
