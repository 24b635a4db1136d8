//! Per-read alignment driver.
//!
//! Sits between the seeding stage, which proposes candidate reference
//! offsets, and the [`MyersEngine`]: it loads the read once, sweeps each
//! candidate window, grows the engine when a window does not fit, and turns
//! accepted hits into [`Alignment`] records.

use tracing::{debug, warn};

use crate::genomics::{encode_read, EditScript, PackedDna};
use crate::myers::{
    AlignError, EngineConfig, LaneVector, MyersEngine, ScoringConfig, SearchOutcome, SearchWindow,
    Vec128,
};

/// A candidate location proposed for the current read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Symbol offset of the window start in the reference.
    pub ref_offset: usize,
    /// Window bound passed to the sweep.
    pub max_distance_in_ref: usize,
    /// Edit budget adjusted for the mate, overriding the driver's default.
    pub mate_budget: Option<u32>,
}

impl Candidate {
    /// Candidate using the driver's default budget.
    pub fn new(ref_offset: usize, max_distance_in_ref: usize) -> Self {
        Self {
            ref_offset,
            max_distance_in_ref,
            mate_budget: None,
        }
    }

    /// Override the edit budget.
    pub fn with_mate_budget(mut self, budget: u32) -> Self {
        self.mate_budget = Some(budget);
        self
    }
}

/// One accepted alignment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct Alignment {
    /// Reference position where the alignment starts.
    pub ref_start: usize,
    /// End column within the candidate window.
    pub end_column: usize,
    /// Edit distance.
    pub edit_distance: u32,
    /// Extended edit script.
    pub script: EditScript,
    /// Affine score.
    pub score: f64,
    /// Mismatches plus gap openings.
    pub events: u32,
}

/// Aligns one read at a time against candidate windows.
#[derive(Debug)]
pub struct CandidateAligner<V: LaneVector = Vec128> {
    engine: MyersEngine<V>,
    scoring: ScoringConfig,
    max_edits: u32,
}

impl<V: LaneVector> CandidateAligner<V> {
    /// Create a driver with an engine built from `config`.
    pub fn new(
        config: EngineConfig,
        scoring: ScoringConfig,
        max_edits: u32,
    ) -> Result<Self, AlignError> {
        Ok(Self {
            engine: MyersEngine::new(config)?,
            scoring,
            max_edits,
        })
    }

    /// The underlying engine.
    pub fn engine(&self) -> &MyersEngine<V> {
        &self.engine
    }

    /// Default edit budget.
    pub fn max_edits(&self) -> u32 {
        self.max_edits
    }

    /// Load a read given as ASCII bases.
    pub fn load_read(&mut self, read: &[u8]) -> Result<(), AlignError> {
        let codes = encode_read(read)?;
        self.engine.set_pattern(&codes)
    }

    /// Align the loaded read at `candidate`.
    ///
    /// Returns `Ok(None)` when nothing fits the budget and when the window is
    /// empty after clipping to the reference end; the latter is logged with
    /// its cause.
    pub fn align(
        &mut self,
        genome: &PackedDna,
        candidate: Candidate,
    ) -> Result<Option<Alignment>, AlignError> {
        let budget = candidate.mate_budget.unwrap_or(self.max_edits);
        let last = genome.len().saturating_sub(candidate.ref_offset + 1);
        let window = SearchWindow {
            ref_offset: candidate.ref_offset,
            max_distance_in_ref: candidate.max_distance_in_ref.min(last),
            max_edit_distance: budget,
        };

        let outcome = match self.engine.search(genome, window) {
            Err(AlignError::CapacityExceeded { requested, .. }) => {
                self.engine.reserve(requested);
                self.engine.search(genome, window)
            }
            Err(AlignError::InvalidWindow) => {
                warn!(
                    ref_offset = candidate.ref_offset,
                    max_distance_in_ref = candidate.max_distance_in_ref,
                    reference_len = genome.len(),
                    "skipping candidate: {}",
                    skip_reason(candidate, genome.len())
                );
                return Ok(None);
            }
            other => other,
        }?;

        let hit = match outcome {
            SearchOutcome::Found(hit) => hit,
            SearchOutcome::NotFound { best_distance } => {
                debug!(
                    ref_offset = candidate.ref_offset,
                    best_distance, budget, "no alignment within budget"
                );
                return Ok(None);
            }
        };

        let trace = self.engine.edit_script(&hit, &self.scoring)?;
        Ok(Some(Alignment {
            ref_start: candidate.ref_offset + trace.start_in_window,
            end_column: hit.end_column,
            edit_distance: hit.edit_distance,
            script: trace.script,
            score: trace.score,
            events: trace.events,
        }))
    }
}

fn skip_reason(candidate: Candidate, reference_len: usize) -> &'static str {
    if candidate.ref_offset >= reference_len {
        "offset lies past the reference end"
    } else if candidate.ref_offset + 1 == reference_len {
        "offset is the last reference base, no columns remain after clipping"
    } else {
        "zero-width window requested"
    }
}
