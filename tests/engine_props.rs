mod common;

use bpalign::myers::reference::{last_row, semi_global_distance};
use bpalign::myers::{LaneVector, Lanes, SearchOutcome, Vec128};
use bpalign::EditOp;
use common::{bases, bases_with_n, codes, engine, search_whole, SCORING};
use proptest::prelude::*;

fn check_against_reference<V: LaneVector>(
    read: &[u8],
    reference: &[u8],
) -> Result<(), TestCaseError> {
    let mut engine = engine::<V>(256);
    // A budget of the read length can never prune or reject.
    let outcome = search_whole(&mut engine, read, reference, read.len() as u32);
    let hit = match outcome {
        SearchOutcome::Found(hit) => hit,
        SearchOutcome::NotFound { best_distance } => {
            return Err(TestCaseError::fail(format!(
                "budget {} rejected best {}",
                read.len(),
                best_distance
            )))
        }
    };

    let (expected, _) = semi_global_distance(&codes(read), &codes(reference));
    prop_assert_eq!(hit.edit_distance, expected);

    let row = last_row(&codes(read), &codes(reference));
    prop_assert_eq!(row[hit.end_column], hit.edit_distance);
    Ok(())
}

fn check_script<V: LaneVector>(read: &[u8], reference: &[u8]) -> Result<(), TestCaseError> {
    let mut engine = engine::<V>(256);
    let outcome = search_whole(&mut engine, read, reference, read.len() as u32);
    let hit = outcome.hit().expect("budget of read length always accepts");
    let trace = engine.edit_script(&hit, &SCORING).expect("backtrace succeeds");
    let script = &trace.script;

    prop_assert_eq!(script.edit_distance(), hit.edit_distance as usize);
    prop_assert_eq!(script.read_len(), read.len());
    prop_assert_eq!(
        script.reference_len(),
        read.len() + script.deletions() - script.insertions()
    );
    prop_assert_eq!(trace.start_in_window + script.reference_len(), hit.end_column);

    // Replay the script against both sequences.
    let window = &reference[trace.start_in_window..hit.end_column];
    let (mut r, mut g) = (0usize, 0usize);
    let mut rebuilt_read = Vec::with_capacity(read.len());
    for op in script.ops() {
        match *op {
            EditOp::Match => {
                prop_assert_eq!(read[r], window[g]);
                rebuilt_read.push(window[g]);
                r += 1;
                g += 1;
            }
            EditOp::Mismatch(base) => {
                prop_assert_eq!(base, window[g]);
                rebuilt_read.push(read[r]);
                r += 1;
                g += 1;
            }
            EditOp::Deletion(base) => {
                prop_assert_eq!(base, window[g]);
                g += 1;
            }
            EditOp::Insertion(base) => {
                prop_assert_eq!(base, read[r]);
                rebuilt_read.push(base);
                r += 1;
            }
        }
    }
    prop_assert_eq!(g, window.len());
    prop_assert_eq!(rebuilt_read, read.to_vec());
    Ok(())
}

proptest! {
    #[test]
    fn vec128_distance_matches_reference_dp(
        read in bases(1..=128),
        reference in bases(2..200),
    ) {
        check_against_reference::<Vec128>(&read, &reference)?;
    }

    #[test]
    fn portable_two_lane_distance_matches_reference_dp(
        read in bases(60..=128),
        reference in bases(2..200),
    ) {
        check_against_reference::<Lanes<2>>(&read, &reference)?;
    }

    #[test]
    fn single_lane_distance_matches_reference_dp(
        read in bases_with_n(1..=64),
        reference in bases_with_n(2..150),
    ) {
        check_against_reference::<Lanes<1>>(&read, &reference)?;
    }

    #[test]
    fn mutated_copies_match_reference_dp(
        prefix in bases(0..40),
        read in bases(20..=128),
        edits in proptest::collection::vec((any::<prop::sample::Index>(), 0u8..3, 0u8..4), 0..6),
        suffix in bases(0..40),
    ) {
        let mut copy = read.clone();
        for (index, kind, base) in edits {
            let base = b"ACGT"[base as usize];
            match kind {
                0 => { let i = index.index(copy.len()); copy[i] = base; }
                1 => { let i = index.index(copy.len() + 1); copy.insert(i, base); }
                _ if copy.len() > 1 => { let i = index.index(copy.len()); copy.remove(i); }
                _ => {}
            }
        }
        let mut reference = prefix;
        reference.extend_from_slice(&copy);
        reference.extend_from_slice(&suffix);

        check_against_reference::<Vec128>(&read, &reference)?;
        check_script::<Vec128>(&read, &reference)?;
    }

    #[test]
    fn scripts_replay_to_read_and_window(
        read in bases_with_n(1..=128),
        reference in bases_with_n(2..200),
    ) {
        check_script::<Vec128>(&read, &reference)?;
    }

    #[test]
    fn lane_policies_agree(
        read in bases(1..=64),
        reference in bases(2..120),
    ) {
        let mut wide = engine::<Vec128>(128);
        let mut narrow = engine::<Lanes<1>>(128);
        let budget = read.len() as u32;
        prop_assert_eq!(
            search_whole(&mut wide, &read, &reference, budget),
            search_whole(&mut narrow, &read, &reference, budget)
        );
    }
}
