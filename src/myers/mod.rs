//! Bit-parallel banded edit distance (Myers/Hyyrö) with affine backtrace.
//!
//! The pattern (a read of up to 128 bases) is encoded as per-symbol bitmasks,
//! and each reference column is processed with a handful of word operations
//! instead of one cell at a time. Every column's bit-vectors are kept so the
//! alignment itself can be rebuilt afterwards:
//!
//! 1. [`MyersEngine::set_pattern`] builds the [`PatternMasks`].
//! 2. [`MyersEngine::search`] unpacks the window and sweeps it, returning the
//!    best end column as a [`SearchOutcome`].
//! 3. [`MyersEngine::edit_script`] walks the [`ColumnSnapshots`] back from the
//!    hit and scores the path with a [`ScoringConfig`].
//!
//! The vector width is a type parameter ([`LaneVector`]); [`Vec128`] is the
//! default and [`Vec64`] serves short patterns.

mod backtrace;
mod config;
mod engine;
mod error;
mod lanes;
mod pattern;
pub mod reference;
mod snapshot;

pub use backtrace::{build_edit_script, AlignmentTrace, ScoringConfig};
pub use config::{ConfigError, EngineConfig, PruningPolicy};
pub use engine::{DpHit, MyersEngine, SearchOutcome, SearchWindow};
pub use error::AlignError;
#[cfg(target_arch = "x86_64")]
pub use lanes::Sse2x2;
pub use lanes::{LaneVector, Lanes, Vec128, Vec64, LANE_BITS};
pub use pattern::PatternMasks;
pub use snapshot::{CellDeltas, ColumnSnapshots, ColumnState};
