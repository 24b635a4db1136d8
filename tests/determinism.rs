mod common;

use std::collections::HashSet;

use blake3::Hasher;
use bpalign::myers::{MyersEngine, SearchWindow, Vec128};
use bpalign::PackedDna;
use common::{codes, engine, SCORING};

const REFERENCE: &[u8] = b"TTGACCGATTACAGGCTTACGATCGATCGGATTACCAGTTGACGNNACGTAGCTAGGATTTACAGA";
const READS: [&[u8]; 3] = [b"GATTACAGGCTTACG", b"CGATCGGATTTACCAG", b"ACGTAGCTAGGATTACA"];

fn fingerprint(engine: &mut MyersEngine<Vec128>, genome: &PackedDna) -> blake3::Hash {
    let mut hasher = Hasher::new();
    for read in READS {
        engine.set_pattern(&codes(read)).expect("pattern fits");
        let outcome = engine
            .search(
                genome,
                SearchWindow {
                    ref_offset: 1,
                    max_distance_in_ref: REFERENCE.len() - 2,
                    max_edit_distance: 4,
                },
            )
            .expect("search runs");
        hasher.update(format!("{outcome:?}").as_bytes());

        let mut dump = Vec::new();
        engine.dump_snapshots(&mut dump).expect("dump to memory");
        hasher.update(&dump);

        if let Some(hit) = outcome.hit() {
            let trace = engine.edit_script(&hit, &SCORING).expect("backtrace succeeds");
            hasher.update(trace.script.to_string().as_bytes());
            hasher.update(&trace.start_in_window.to_le_bytes());
            hasher.update(&trace.score.to_le_bytes());
            hasher.update(&trace.events.to_le_bytes());
        }
    }
    hasher.finalize()
}

#[test]
fn repeated_sweeps_are_identical() {
    let genome = PackedDna::pack(REFERENCE).expect("valid reference");

    let mut fingerprints = HashSet::new();
    for _ in 0..3 {
        let mut fresh = engine::<Vec128>(REFERENCE.len());
        fingerprints.insert(fingerprint(&mut fresh, &genome));
    }

    // A reused engine must not leak state between calls.
    let mut reused = engine::<Vec128>(REFERENCE.len());
    fingerprints.insert(fingerprint(&mut reused, &genome));
    fingerprints.insert(fingerprint(&mut reused, &genome));

    assert_eq!(fingerprints.len(), 1, "outputs diverged across runs");
}
