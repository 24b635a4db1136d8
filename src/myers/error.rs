use thiserror::Error;

use crate::genomics::PackedDnaError;
use crate::myers::ConfigError;

/// Errors surfaced by the alignment engine.
///
/// A search that finds nothing within budget is not an error; see
/// [`crate::myers::SearchOutcome::NotFound`].
#[derive(Debug, Error)]
pub enum AlignError {
    /// Zero-width search window: a caller bug, not retried.
    #[error("invalid search window: max_distance_in_ref must be > 0")]
    InvalidWindow,

    /// Window longer than the allocated buffers. Grow the engine and retry.
    #[error("window of {requested} exceeds engine capacity {capacity}")]
    CapacityExceeded {
        /// Requested `max_distance_in_ref`.
        requested: usize,
        /// Largest `max_distance_in_ref` the buffers currently hold.
        capacity: usize,
    },

    /// Pattern is empty or longer than the vector width.
    #[error("pattern length {len} outside supported range 1..={max}")]
    PatternLength {
        /// Supplied pattern length.
        len: usize,
        /// Maximum supported pattern length.
        max: usize,
    },

    /// Search started before a pattern was loaded.
    #[error("no pattern loaded")]
    NoPattern,

    /// Backtrace needs a column the last sweep never reached.
    #[error("column {column} not recorded (last sweep filled {filled})")]
    SnapshotOutOfRange {
        /// Requested reference column.
        column: usize,
        /// Iterations recorded by the last sweep.
        filled: usize,
    },

    /// Backtrace end column lies outside the supplied reference window.
    #[error("end column {end_column} beyond window of {window_len}")]
    EndBeyondWindow {
        /// Requested end column.
        end_column: usize,
        /// Length of the reference window.
        window_len: usize,
    },

    /// Read could not be encoded.
    #[error("invalid read: {0}")]
    Sequence(#[from] PackedDnaError),

    /// Invalid engine configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
