use std::io::{self, Write};

use crate::genomics::{decode_symbol, NO_SYMBOL};
use crate::myers::{LaneVector, LANE_BITS};

/// Bit-vector state of one DP column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnState<V: LaneVector> {
    /// Vertical +1 differences.
    pub vp: V,
    /// Vertical -1 differences.
    pub vn: V,
    /// Horizontal +1 differences (before the shift into the next column).
    pub hp: V,
    /// Horizontal -1 differences (before the shift into the next column).
    pub hn: V,
    /// Diagonal zero-difference indicator.
    pub d0: V,
}

impl<V: LaneVector> ColumnState<V> {
    /// State before any reference symbol is consumed: every vertical
    /// difference is +1.
    pub fn initial() -> Self {
        Self {
            vp: V::ones(),
            vn: V::zero(),
            hp: V::zero(),
            hn: V::zero(),
            d0: V::ones(),
        }
    }
}

/// Differences around one DP cell `(row, column)`, read back from a snapshot.
///
/// With `D` the DP matrix: `diagonal_zero` means `D[i][j] == D[i-1][j-1]`,
/// `hp`/`hn` mean `D[i][j] - D[i][j-1]` is `+1`/`-1`, and `vp`/`vn` mean
/// `D[i][j] - D[i-1][j]` is `+1`/`-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellDeltas {
    /// Diagonal predecessor has the same cost.
    pub diagonal_zero: bool,
    /// Left neighbour is one cheaper.
    pub hp: bool,
    /// Left neighbour is one dearer.
    pub hn: bool,
    /// Upper neighbour is one cheaper.
    pub vp: bool,
    /// Upper neighbour is one dearer.
    pub vn: bool,
}

/// Column states recorded by the most recent sweep, indexed by iteration.
///
/// Entry 0 always holds [`ColumnState::initial`]. Because lane `k` runs `k`
/// columns behind lane 0, the state of reference column `j` for a row in lane
/// `k` lives at entry `j + k`; [`Self::deltas`] hides that skew.
#[derive(Debug, Clone)]
pub struct ColumnSnapshots<V: LaneVector> {
    columns: Vec<ColumnState<V>>,
    filled: usize,
}

impl<V: LaneVector> ColumnSnapshots<V> {
    /// Allocate room for `iterations` columns after the initial one.
    pub fn new(iterations: usize) -> Self {
        Self {
            columns: vec![ColumnState::initial(); iterations + 1],
            filled: 0,
        }
    }

    /// Number of iterations that fit.
    pub fn capacity(&self) -> usize {
        self.columns.len() - 1
    }

    /// Grow to hold `iterations` columns. Never shrinks.
    pub fn reserve(&mut self, iterations: usize) {
        if iterations + 1 > self.columns.len() {
            self.columns.resize(iterations + 1, ColumnState::initial());
        }
    }

    /// Iterations recorded by the last sweep.
    pub fn filled(&self) -> usize {
        self.filled
    }

    pub(crate) fn begin_sweep(&mut self) {
        self.filled = 0;
    }

    #[inline]
    pub(crate) fn store(&mut self, iteration: usize, state: ColumnState<V>) {
        debug_assert_eq!(iteration, self.filled + 1);
        self.columns[iteration] = state;
        self.filled = iteration;
    }

    /// Raw state after `iteration` (0 is the initial column).
    pub fn column(&self, iteration: usize) -> Option<&ColumnState<V>> {
        if iteration > self.filled {
            return None;
        }
        self.columns.get(iteration)
    }

    /// Differences at pattern row `row` (1-based) and reference column
    /// `column` (1-based).
    pub fn deltas(&self, column: usize, row: usize) -> Option<CellDeltas> {
        if row == 0 {
            return None;
        }
        let lane = (row - 1) / LANE_BITS;
        if lane >= V::LANES {
            return None;
        }
        let shift = (row - 1) % LANE_BITS;
        let state = self.column(column + lane)?;
        let bit = |v: &V| (v.word(lane) >> shift) & 1 == 1;

        Some(CellDeltas {
            diagonal_zero: bit(&state.d0),
            hp: bit(&state.hp),
            hn: bit(&state.hn),
            vp: bit(&state.vp),
            vn: bit(&state.vn),
        })
    }

    /// Write every recorded column as hex, one block per column, labelled
    /// with the reference symbol lane 0 consumed there.
    pub fn dump<W: Write>(&self, out: &mut W, window: &[u8]) -> io::Result<()> {
        for (iteration, state) in self.columns[..=self.filled].iter().enumerate() {
            let symbol = match iteration {
                0 => NO_SYMBOL,
                j => window.get(j - 1).copied().unwrap_or(NO_SYMBOL),
            };
            writeln!(out, "{},{}", iteration, decode_symbol(symbol) as char)?;
            writeln!(out, "D0: {:?}", state.d0)?;
            writeln!(out, "HN: {:?}", state.hn)?;
            writeln!(out, "HP: {:?}", state.hp)?;
            writeln!(out, "VN: {:?}", state.vn)?;
            writeln!(out, "VP: {:?}", state.vp)?;
            writeln!(out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::myers::Lanes;

    #[test]
    fn initial_column_is_myers_start_state() {
        let snapshots = ColumnSnapshots::<Lanes<2>>::new(4);
        let state = snapshots.column(0).unwrap();
        assert_eq!(state.vp, Lanes::ones());
        assert_eq!(state.vn, Lanes::zero());
        assert_eq!(state.d0, Lanes::ones());
        assert!(snapshots.column(1).is_none());
    }

    #[test]
    fn deltas_apply_lane_skew() {
        let mut snapshots = ColumnSnapshots::<Lanes<2>>::new(4);
        snapshots.begin_sweep();
        let mut first = ColumnState::initial();
        first.hp = Lanes([0, 0]);
        snapshots.store(1, first);
        let mut second = ColumnState::initial();
        second.hp = Lanes([0, 1]);
        snapshots.store(2, second);

        // Row 65 is bit 0 of lane 1: column 1 is stored at iteration 2.
        assert!(snapshots.deltas(1, 65).unwrap().hp);
        assert!(!snapshots.deltas(1, 1).unwrap().hp);
        assert!(snapshots.deltas(2, 65).is_none());
        assert!(snapshots.deltas(1, 0).is_none());
    }

    #[test]
    fn dump_writes_one_block_per_column() {
        let mut snapshots = ColumnSnapshots::<Lanes<1>>::new(2);
        snapshots.begin_sweep();
        snapshots.store(1, ColumnState::initial());
        let mut out = Vec::new();
        snapshots.dump(&mut out, &[2]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("0,X\n"));
        assert!(text.contains("1,G\n"));
        assert_eq!(text.matches("VP:").count(), 2);
    }
}
