//! Sequence representations consumed and produced by the alignment engine.
//!
//! The reference is held 4 bits per symbol ([`PackedDna`]), a window of it is
//! unpacked into a [`PrefetchBuffer`] before each sweep, and alignments come
//! back as an [`EditScript`].

mod packed_dna;
mod prefetch;
mod types;

pub use packed_dna::{
    decode_symbol, encode_read, encode_symbol, symbols_match, PackedDna, PackedDnaError,
    PackedDnaIter, CODE_A, CODE_C, CODE_G, CODE_N, CODE_T, DECODE_TABLE, NO_SYMBOL, SYMBOL_CODES,
};
pub use prefetch::PrefetchBuffer;
pub use types::{CigarOp, CigarOpKind, EditOp, EditScript};
