use crate::genomics::{decode_symbol, symbols_match, EditOp, EditScript};
use crate::myers::{AlignError, ColumnSnapshots, LaneVector};

/// Affine scoring weights, added up along the backtrace path.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct ScoringConfig {
    /// Added for each matching column.
    pub match_score: f64,
    /// Added for each substitution.
    pub mismatch: f64,
    /// Added for the first column of a gap run.
    pub gap_open: f64,
    /// Added for each further column of the same gap run.
    pub gap_extend: f64,
}

impl ScoringConfig {
    /// Bundle the four weights.
    pub fn new(match_score: f64, mismatch: f64, gap_open: f64, gap_extend: f64) -> Self {
        Self {
            match_score,
            mismatch,
            gap_open,
            gap_extend,
        }
    }
}

/// Reconstructed alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentTrace {
    /// Columns from left to right.
    pub script: EditScript,
    /// Window position (0-based) where the aligned region begins.
    pub start_in_window: usize,
    /// Affine score of the script.
    pub score: f64,
    /// Mismatches plus gap openings.
    pub events: u32,
}

/// Kind of the gap run the walk is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GapRun {
    None,
    Deletion,
    Insertion,
}

#[derive(Debug)]
struct Tally<'a> {
    scoring: &'a ScoringConfig,
    score: f64,
    events: u32,
    run: GapRun,
}

impl<'a> Tally<'a> {
    fn new(scoring: &'a ScoringConfig) -> Self {
        Self {
            scoring,
            score: 0.0,
            events: 0,
            run: GapRun::None,
        }
    }

    fn matched(&mut self) {
        self.score += self.scoring.match_score;
        self.run = GapRun::None;
    }

    fn mismatched(&mut self) {
        self.score += self.scoring.mismatch;
        self.events += 1;
        self.run = GapRun::None;
    }

    fn gap(&mut self, kind: GapRun) {
        if self.run == kind {
            self.score += self.scoring.gap_extend;
        } else {
            self.score += self.scoring.gap_open;
            self.events += 1;
            self.run = kind;
        }
    }
}

/// Walk the recorded columns back from `(read.len(), end_column)` and rebuild
/// the alignment.
///
/// `reference` is the unpacked window the sweep ran over and `read` the
/// pattern, both as symbol codes. At each mismatching cell the cheapest
/// predecessor is chosen with ties going diagonal first, then horizontal
/// (deletion), then vertical (insertion). Read bases left over once the
/// window start is reached become insertions.
pub fn build_edit_script<V: LaneVector>(
    snapshots: &ColumnSnapshots<V>,
    end_column: usize,
    edit_distance: u32,
    reference: &[u8],
    read: &[u8],
    scoring: &ScoringConfig,
) -> Result<AlignmentTrace, AlignError> {
    if end_column > reference.len() {
        return Err(AlignError::EndBeyondWindow {
            end_column,
            window_len: reference.len(),
        });
    }

    let mut ops = Vec::with_capacity(read.len() + edit_distance as usize);
    let mut tally = Tally::new(scoring);
    let mut cost = i64::from(edit_distance);
    let mut read_pos = read.len();
    let mut pos = end_column;

    while read_pos > 0 && pos > 0 {
        let read_code = read[read_pos - 1];
        let ref_code = reference[pos - 1];

        if symbols_match(read_code, ref_code) {
            ops.push(EditOp::Match);
            tally.matched();
            read_pos -= 1;
            pos -= 1;
            continue;
        }

        let cell = snapshots
            .deltas(pos, read_pos)
            .ok_or(AlignError::SnapshotOutOfRange {
                column: pos,
                filled: snapshots.filled(),
            })?;
        let d = cost - i64::from(!cell.diagonal_zero);
        let h = cost - i64::from(cell.hp) + i64::from(cell.hn);
        let v = cost - i64::from(cell.vp) + i64::from(cell.vn);

        if d <= h && d <= v {
            ops.push(EditOp::Mismatch(decode_symbol(ref_code)));
            tally.mismatched();
            cost = d;
            read_pos -= 1;
            pos -= 1;
        } else if h <= v {
            ops.push(EditOp::Deletion(decode_symbol(ref_code)));
            tally.gap(GapRun::Deletion);
            cost = h;
            pos -= 1;
        } else {
            ops.push(EditOp::Insertion(decode_symbol(read_code)));
            tally.gap(GapRun::Insertion);
            cost = v;
            read_pos -= 1;
        }
    }

    while read_pos > 0 {
        ops.push(EditOp::Insertion(decode_symbol(read[read_pos - 1])));
        tally.gap(GapRun::Insertion);
        read_pos -= 1;
    }

    ops.reverse();
    Ok(AlignmentTrace {
        script: EditScript::from_ops(ops),
        start_in_window: pos,
        score: tally.score,
        events: tally.events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genomics::{encode_read, PackedDna};
    use crate::myers::{EngineConfig, Lanes, MyersEngine, SearchWindow, Vec128};
    use test_case::test_case;

    const SCORING: ScoringConfig = ScoringConfig {
        match_score: 1.0,
        mismatch: -4.0,
        gap_open: -6.0,
        gap_extend: -1.0,
    };

    fn trace_whole_window<V: LaneVector>(read: &[u8], reference: &[u8]) -> AlignmentTrace {
        let genome = PackedDna::pack(reference).unwrap();
        let mut engine =
            MyersEngine::<V>::new(EngineConfig::with_max_window(64).unwrap()).unwrap();
        engine.set_pattern(&encode_read(read).unwrap()).unwrap();
        let hit = engine
            .search(
                &genome,
                SearchWindow {
                    ref_offset: 0,
                    max_distance_in_ref: reference.len() - 1,
                    max_edit_distance: 8,
                },
            )
            .unwrap()
            .hit()
            .unwrap();
        engine.edit_script(&hit, &SCORING).unwrap()
    }

    #[test_case(b"ACGT", b"ACCT", "..C.", 3.0 * 1.0 - 4.0, 1 ; "single substitution")]
    #[test_case(b"ACGT", b"ACTGT", "..G#.", 3.0 - 6.0, 1 ; "earlier tied end keeps insertion")]
    #[test_case(b"ACGT", b"ACT", "..G#.", 3.0 - 6.0, 1 ; "single insertion")]
    #[test_case(b"ACGGGT", b"ACT", "..G#G#G#.", 3.0 - 6.0 - 2.0, 1 ; "insertion run extends")]
    #[test_case(b"GACGT", b"ACGT", "G#....", 4.0 - 6.0, 1 ; "leading bases forced to insertions")]
    fn rebuilds_script(read: &[u8], reference: &[u8], script: &str, score: f64, events: u32) {
        let trace = trace_whole_window::<Vec128>(read, reference);
        assert_eq!(trace.script.to_string(), script);
        assert_eq!(trace.start_in_window, 0);
        assert!((trace.score - score).abs() < 1e-9);
        assert_eq!(trace.events, events);

        let narrow = trace_whole_window::<Lanes<1>>(read, reference);
        assert_eq!(narrow, trace);
    }

    #[test]
    fn start_marks_beginning_of_aligned_region() {
        let trace = trace_whole_window::<Vec128>(b"GATTACA", b"CCCCGATTACACC");
        assert_eq!(trace.script.to_string(), ".......");
        assert_eq!(trace.start_in_window, 4);
    }

    #[test]
    fn gap_runs_of_different_kinds_open_separately() {
        let mut tally = Tally::new(&SCORING);
        tally.gap(GapRun::Deletion);
        tally.gap(GapRun::Deletion);
        tally.gap(GapRun::Insertion);
        tally.matched();
        tally.gap(GapRun::Insertion);
        assert_eq!(tally.events, 3);
        assert!((tally.score - (-6.0 - 1.0 - 6.0 + 1.0 - 6.0)).abs() < 1e-9);
    }

    #[test]
    fn end_beyond_window_is_rejected() {
        let snapshots = ColumnSnapshots::<Vec128>::new(4);
        let err = build_edit_script(&snapshots, 5, 0, &[0, 1, 2, 3], &[0], &SCORING).unwrap_err();
        assert!(matches!(
            err,
            AlignError::EndBeyondWindow {
                end_column: 5,
                window_len: 4
            }
        ));
    }

    #[test]
    fn unrecorded_column_is_reported() {
        let snapshots = ColumnSnapshots::<Vec128>::new(4);
        let err = build_edit_script(&snapshots, 2, 1, &[0, 1], &[3], &SCORING).unwrap_err();
        assert!(matches!(
            err,
            AlignError::SnapshotOutOfRange { column: 2, filled: 0 }
        ));
    }
}
