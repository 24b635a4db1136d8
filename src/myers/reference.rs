//! Unvectorized semi-global edit distance.
//!
//! Cell-by-cell dynamic programming over the same lattice the bit-parallel
//! sweep encodes: the pattern must be consumed entirely, the text may start
//! and end anywhere. Slow, but obviously correct; used to check the engine.

use crate::genomics::symbols_match;

/// Last DP row: entry `j` is the edit distance of the pattern against the
/// best text substring ending at column `j` (entry 0 is the pattern length).
pub fn last_row(pattern: &[u8], text: &[u8]) -> Vec<u32> {
    let mut prev: Vec<u32> = vec![0; text.len() + 1];
    let mut curr = vec![0u32; text.len() + 1];

    for (i, &p) in pattern.iter().enumerate() {
        curr[0] = i as u32 + 1;
        for (j, &t) in text.iter().enumerate() {
            let diagonal = prev[j] + u32::from(!symbols_match(p, t));
            let up = prev[j + 1] + 1;
            let left = curr[j] + 1;
            curr[j + 1] = diagonal.min(up).min(left);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev
}

/// Smallest distance over all end columns, with the first column reaching it.
pub fn semi_global_distance(pattern: &[u8], text: &[u8]) -> (u32, usize) {
    last_row(pattern, text)
        .into_iter()
        .enumerate()
        .fold((u32::MAX, 0), |best, (column, distance)| {
            if distance < best.0 {
                (distance, column)
            } else {
                best
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genomics::encode_read;

    fn codes(s: &[u8]) -> Vec<u8> {
        encode_read(s).unwrap()
    }

    #[test]
    fn last_row_matches_hand_computed_values() {
        assert_eq!(last_row(&codes(b"ACGT"), &codes(b"ACCT")), vec![4, 3, 2, 2, 1]);
    }

    #[test]
    fn finds_embedded_occurrence() {
        assert_eq!(semi_global_distance(&codes(b"GAT"), &codes(b"CCGATCC")), (0, 5));
    }

    #[test]
    fn ambiguous_symbols_never_match() {
        assert_eq!(semi_global_distance(&codes(b"NN"), &codes(b"NNAC")), (2, 0));
    }
}
