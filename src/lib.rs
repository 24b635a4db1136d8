//! # Bit-parallel read alignment
//!
//! Banded edit-distance search and alignment reconstruction for short reads
//! (up to 128 bases) against a 4-bit packed reference.
//!
//! ## Pipeline
//!
//! 1. **Prefetch**: unpack the candidate window from the packed reference,
//!    using SSE2 nibble expansion where available ([`scan`], [`genomics`])
//! 2. **Sweep**: Myers' bit-vector recurrence over 64-bit lanes, one reference
//!    column per step, every column's vectors recorded ([`myers`])
//! 3. **Backtrace**: walk the recorded columns back from the best end column
//!    and score the path with affine gaps ([`myers::build_edit_script`])
//! 4. **Drive**: grow buffers on demand and assemble [`Alignment`] records
//!    ([`align`])
//!
//! ## Usage Example
//!
//! ```
//! use bpalign::{Candidate, CandidateAligner, EngineConfig, PackedDna, ScoringConfig};
//!
//! let genome = PackedDna::pack(b"TTTTGATTACATTTT")?;
//! let scoring = ScoringConfig::new(1.0, -4.0, -6.0, -1.0);
//! let mut aligner: CandidateAligner =
//!     CandidateAligner::new(EngineConfig::with_max_window(64)?, scoring, 2)?;
//!
//! aligner.load_read(b"GATTACA")?;
//! let alignment = aligner.align(&genome, Candidate::new(0, 14))?.expect("aligned");
//! assert_eq!(alignment.ref_start, 4);
//! assert_eq!(alignment.script.to_string(), ".......");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod scan;     // Vectorised byte scans and nibble expansion
pub mod genomics; // Alphabet, packed reference, prefetch buffer, edit scripts
pub mod myers;    // Bit-parallel sweep and backtrace
pub mod align;    // Per-read alignment driver

// Re-exports for convenience
pub use align::{Alignment, Candidate, CandidateAligner};
pub use genomics::{EditOp, EditScript, PackedDna, PackedDnaError};
pub use myers::{
    AlignError, ConfigError, DpHit, EngineConfig, MyersEngine, PruningPolicy, ScoringConfig,
    SearchOutcome, SearchWindow,
};
