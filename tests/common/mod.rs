#![allow(dead_code)]

use bpalign::genomics::encode_read;
use bpalign::myers::{EngineConfig, LaneVector, MyersEngine, SearchOutcome, SearchWindow};
use bpalign::{PackedDna, ScoringConfig};
use proptest::prelude::*;

pub const SCORING: ScoringConfig = ScoringConfig {
    match_score: 1.0,
    mismatch: -4.0,
    gap_open: -6.0,
    gap_extend: -1.0,
};

/// Random ASCII bases drawn from `ACGT`.
pub fn bases(len: impl Into<proptest::collection::SizeRange>) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(prop_oneof![Just(b'A'), Just(b'C'), Just(b'G'), Just(b'T')], len)
}

/// Random ASCII bases including the occasional `N`.
pub fn bases_with_n(
    len: impl Into<proptest::collection::SizeRange>,
) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(
        prop_oneof![
            4 => Just(b'A'),
            4 => Just(b'C'),
            4 => Just(b'G'),
            4 => Just(b'T'),
            1 => Just(b'N'),
        ],
        len,
    )
}

pub fn codes(seq: &[u8]) -> Vec<u8> {
    encode_read(seq).expect("valid bases")
}

pub fn engine<V: LaneVector>(max_window: usize) -> MyersEngine<V> {
    MyersEngine::new(EngineConfig::with_max_window(max_window).expect("positive window"))
        .expect("engine builds")
}

/// Load `read` and sweep the whole of `reference`.
///
/// The window spans `reference.len() - 1` columns, so `reference` needs at
/// least two bases; a single base is a zero-width window.
pub fn search_whole<V: LaneVector>(
    engine: &mut MyersEngine<V>,
    read: &[u8],
    reference: &[u8],
    budget: u32,
) -> SearchOutcome {
    assert!(reference.len() >= 2, "reference too short for a window");
    let genome = PackedDna::pack(reference).expect("valid reference");
    engine.set_pattern(&codes(read)).expect("pattern fits");
    engine
        .search(
            &genome,
            SearchWindow {
                ref_offset: 0,
                max_distance_in_ref: reference.len() - 1,
                max_edit_distance: budget,
            },
        )
        .expect("search runs")
}
