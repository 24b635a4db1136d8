use std::io::{self, Write};

use tracing::{debug, trace};

use crate::genomics::{PackedDna, PrefetchBuffer};
use crate::myers::{
    build_edit_script, AlignError, AlignmentTrace, ColumnSnapshots, ColumnState, EngineConfig,
    LaneVector, PatternMasks, ScoringConfig, Vec128, LANE_BITS,
};

/// Where and how far to search for the loaded pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    /// Symbol offset of the window in the packed reference (may be odd).
    pub ref_offset: usize,
    /// Window bound: the sweep covers `max_distance_in_ref + 1` reference
    /// columns.
    pub max_distance_in_ref: usize,
    /// Largest edit distance accepted as a hit.
    pub max_edit_distance: u32,
}

/// Best end position found by a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct DpHit {
    /// Reference column (1-based, exclusive end within the window) where the
    /// best alignment ends.
    pub end_column: usize,
    /// Edit distance of that alignment.
    pub edit_distance: u32,
}

/// Result of one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// An alignment within budget.
    Found(DpHit),
    /// Nothing within budget; `best_distance` is the smallest distance seen
    /// before the sweep ended.
    NotFound {
        /// Smallest running distance observed.
        best_distance: u32,
    },
}

impl SearchOutcome {
    /// The hit, if any.
    pub fn hit(self) -> Option<DpHit> {
        match self {
            SearchOutcome::Found(hit) => Some(hit),
            SearchOutcome::NotFound { .. } => None,
        }
    }
}

/// Bit-parallel banded edit-distance engine.
///
/// Owns every scratch buffer it needs (pattern masks, the prefetched window,
/// the column snapshots) and reuses them across calls. One engine serves one
/// worker; nothing is shared.
///
/// Typical use: [`Self::set_pattern`], then [`Self::search`] for each
/// candidate window, then [`Self::edit_script`] for accepted hits.
#[derive(Debug)]
pub struct MyersEngine<V: LaneVector = Vec128> {
    config: EngineConfig,
    pattern: Vec<u8>,
    masks: Option<PatternMasks<V>>,
    prefetch: PrefetchBuffer,
    snapshots: ColumnSnapshots<V>,
}

impl<V: LaneVector> MyersEngine<V> {
    /// Create an engine with buffers sized for `config.max_window_len`.
    pub fn new(config: EngineConfig) -> Result<Self, AlignError> {
        config.validate()?;
        let window = config.max_window_len;
        Ok(Self {
            pattern: Vec::with_capacity(V::BITS),
            masks: None,
            prefetch: PrefetchBuffer::new(window + 1, V::LANES - 1),
            snapshots: ColumnSnapshots::new(Self::iterations_for(window)),
            config,
        })
    }

    fn iterations_for(max_distance_in_ref: usize) -> usize {
        max_distance_in_ref + 1 + (V::LANES - 1)
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Largest `max_distance_in_ref` accepted without growing.
    pub fn capacity(&self) -> usize {
        self.config.max_window_len
    }

    /// Longest supported pattern.
    pub fn max_pattern_len(&self) -> usize {
        V::BITS
    }

    /// Grow buffers so windows up to `max_distance_in_ref` fit. Never shrinks.
    pub fn reserve(&mut self, max_distance_in_ref: usize) {
        if max_distance_in_ref <= self.config.max_window_len {
            return;
        }
        debug!(
            from = self.config.max_window_len,
            to = max_distance_in_ref,
            "growing alignment buffers"
        );
        self.prefetch.reserve(max_distance_in_ref + 1);
        self.snapshots.reserve(Self::iterations_for(max_distance_in_ref));
        self.config.max_window_len = max_distance_in_ref;
    }

    /// Load the pattern (one symbol code per byte) for subsequent searches.
    pub fn set_pattern(&mut self, pattern: &[u8]) -> Result<(), AlignError> {
        let masks = PatternMasks::build(pattern)?;
        self.pattern.clear();
        self.pattern.extend_from_slice(pattern);
        self.masks = Some(masks);
        self.snapshots.begin_sweep();
        trace!(len = pattern.len(), "pattern loaded");
        Ok(())
    }

    /// The loaded pattern.
    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    /// Reference window unpacked by the last search.
    pub fn window(&self) -> &[u8] {
        self.prefetch.window()
    }

    /// Column states recorded by the last search.
    pub fn snapshots(&self) -> &ColumnSnapshots<V> {
        &self.snapshots
    }

    /// Sweep the window and report the best end column within budget.
    ///
    /// Every column's bit-vectors are recorded so that [`Self::edit_script`]
    /// can backtrack from the returned hit until the next search.
    pub fn search(
        &mut self,
        genome: &PackedDna,
        window: SearchWindow,
    ) -> Result<SearchOutcome, AlignError> {
        let SearchWindow {
            ref_offset,
            max_distance_in_ref,
            max_edit_distance,
        } = window;

        if max_distance_in_ref == 0 {
            return Err(AlignError::InvalidWindow);
        }
        if max_distance_in_ref > self.config.max_window_len {
            return Err(AlignError::CapacityExceeded {
                requested: max_distance_in_ref,
                capacity: self.config.max_window_len,
            });
        }
        let masks = self.masks.as_ref().ok_or(AlignError::NoPattern)?;

        let seq_len = masks.len();
        let last_row = seq_len - 1;
        // Lane holding the last row; its scores trail lane 0 by this many
        // columns.
        let lag = last_row / LANE_BITS;
        let window_cols = max_distance_in_ref + 1;
        let iterations = window_cols + lag;

        self.prefetch.prefetch(genome, ref_offset, window_cols);
        let symbols = self.prefetch.symbols();
        let lead = self.prefetch.lead();
        self.snapshots.begin_sweep();

        let ColumnState {
            mut vp,
            mut vn,
            mut hp,
            mut hn,
            ..
        } = ColumnState::<V>::initial();

        let mut curr_ed = seq_len as u32;
        let mut min_ed = curr_ed;
        let mut min_col = 0usize;

        for j in 1..=iterations {
            let eq = masks.skewed(symbols, lead + j - 1);

            let hin_n = hn.carry_in();
            let hin_p = hp.carry_in();
            let x = eq | hin_n;

            let d0 = ((x & vp).lane_add(vp) ^ vp) | x | vn;
            hp = vn | !(d0 | vp);
            hn = d0 & vp;

            let shifted_hp = hp.lane_shl1() | hin_p;
            vn = d0 & shifted_hp;
            vp = hn.lane_shl1() | !(d0 | shifted_hp) | hin_n;

            self.snapshots.store(j, ColumnState { vp, vn, hp, hn, d0 });

            let column = j.saturating_sub(lag);
            if hn.bit(last_row) {
                curr_ed -= 1;
                if curr_ed < min_ed {
                    min_ed = curr_ed;
                    min_col = column;
                } else if curr_ed == min_ed && min_col + 1 == column {
                    min_col = column;
                }
            } else {
                if hp.bit(last_row) {
                    curr_ed += 1;
                } else if curr_ed == min_ed && min_col + 1 == column {
                    // Equal score one column on: extend rather than jump.
                    min_col = column;
                }

                let remaining = window_cols.saturating_sub(column);
                if let Some(threshold) = self.config.pruning.threshold(remaining, max_edit_distance) {
                    if curr_ed as usize > threshold {
                        trace!(column, curr_ed, threshold, "pruned sweep");
                        break;
                    }
                }
            }
        }

        trace!(
            ref_offset,
            best = min_ed,
            column = min_col,
            columns = self.snapshots.filled(),
            "sweep finished"
        );

        if min_ed > max_edit_distance {
            return Ok(SearchOutcome::NotFound {
                best_distance: min_ed,
            });
        }
        Ok(SearchOutcome::Found(DpHit {
            end_column: min_col,
            edit_distance: min_ed,
        }))
    }

    /// Backtrack from `hit` through the last search's snapshots.
    pub fn edit_script(
        &self,
        hit: &DpHit,
        scoring: &ScoringConfig,
    ) -> Result<AlignmentTrace, AlignError> {
        if self.masks.is_none() {
            return Err(AlignError::NoPattern);
        }
        build_edit_script(
            &self.snapshots,
            hit.end_column,
            hit.edit_distance,
            self.prefetch.window(),
            &self.pattern,
            scoring,
        )
    }

    /// Write the last search's column states for offline inspection.
    pub fn dump_snapshots<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.snapshots.dump(out, self.prefetch.window())
    }
}
