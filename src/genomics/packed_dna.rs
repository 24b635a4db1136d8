use std::fmt;

use thiserror::Error;

use crate::scan;

/// Number of distinct 4-bit symbol codes used by the engine.
pub const SYMBOL_CODES: usize = 8;

/// Code for adenine.
pub const CODE_A: u8 = 0;
/// Code for cytosine.
pub const CODE_C: u8 = 1;
/// Code for guanine.
pub const CODE_G: u8 = 2;
/// Code for thymine/uracil.
pub const CODE_T: u8 = 3;
/// Code for an ambiguous base.
pub const CODE_N: u8 = 4;
/// "No symbol": sentinel preceding a prefetched window and padding past the
/// end of the reference. Never matches anything.
pub const NO_SYMBOL: u8 = 7;

/// Code to character table: A, C, G, T, N, N and two reserved codes.
pub const DECODE_TABLE: [u8; SYMBOL_CODES] = *b"ACGTNNXX";

/// Symbols per packed byte.
const SYMBOLS_PER_BYTE: usize = 2;

/// Decode a 4-bit symbol code into an uppercase ASCII character.
#[inline]
pub fn decode_symbol(code: u8) -> u8 {
    DECODE_TABLE[(code as usize) & (SYMBOL_CODES - 1)]
}

/// Encode an ASCII nucleotide. IUPAC ambiguity letters fold to [`CODE_N`].
pub fn encode_symbol(base: u8) -> Option<u8> {
    match base.to_ascii_uppercase() {
        b'A' => Some(CODE_A),
        b'C' => Some(CODE_C),
        b'G' => Some(CODE_G),
        b'T' | b'U' => Some(CODE_T),
        b'N' | b'R' | b'Y' | b'K' | b'M' | b'S' | b'W' | b'B' | b'D' | b'H' | b'V' => Some(CODE_N),
        _ => None,
    }
}

/// Whether two codes count as a match. Only the four bases match; ambiguity,
/// reserved and sentinel codes mismatch everything, themselves included.
#[inline]
pub fn symbols_match(a: u8, b: u8) -> bool {
    a == b && a <= CODE_T
}

/// Errors that can occur while packing sequences.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PackedDnaError {
    /// Encountered a character outside the nucleotide alphabet.
    #[error("unsupported nucleotide '{0}' at position {1}")]
    UnsupportedBase(char, usize),

    /// Encountered a raw code that does not fit in the 3-bit code space.
    #[error("invalid symbol code {0} at position {1}")]
    InvalidCode(u8, usize),
}

/// Nucleotide sequence stored as 4-bit codes, two per byte, high nibble
/// first.
///
/// This is the layout the engine prefetches reference windows from: any
/// symbol offset, odd or even, can be addressed directly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackedDna {
    data: Vec<u8>,
    len: usize,
}

impl PackedDna {
    /// Pack an ASCII nucleotide string.
    pub fn pack(sequence: &[u8]) -> Result<Self, PackedDnaError> {
        let mut packed = Self {
            data: Vec::with_capacity(bytes_for_len(sequence.len())),
            len: 0,
        };
        packed.extend_from_slice(sequence)?;
        Ok(packed)
    }

    /// Pack a sequence that is already expressed as symbol codes.
    pub fn from_codes(codes: &[u8]) -> Result<Self, PackedDnaError> {
        let mut packed = Self {
            data: Vec::with_capacity(bytes_for_len(codes.len())),
            len: 0,
        };
        for (idx, &code) in codes.iter().enumerate() {
            if code as usize >= SYMBOL_CODES {
                return Err(PackedDnaError::InvalidCode(code, idx));
            }
            packed.push_code(code);
        }
        Ok(packed)
    }

    /// Wrap already-packed bytes.
    ///
    /// # Panics
    /// Panics if `len` exceeds the capacity implied by `data`.
    pub fn from_parts(data: Vec<u8>, len: usize) -> Self {
        let capacity = data.len() * SYMBOLS_PER_BYTE;
        assert!(
            len <= capacity,
            "length {} exceeds backing capacity {} ({} bytes)",
            len,
            capacity,
            data.len()
        );
        Self { data, len }
    }

    /// Number of symbols in the sequence.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Packed bytes. An odd-length sequence leaves the final low nibble zero.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Symbol code at `idx`.
    pub fn code_at(&self, idx: usize) -> Option<u8> {
        if idx >= self.len {
            return None;
        }
        let byte = self.data[idx / SYMBOLS_PER_BYTE];
        Some(if idx & 1 == 1 { byte & 0x0f } else { byte >> 4 })
    }

    /// Unpack into one code per byte.
    pub fn to_codes(&self) -> Vec<u8> {
        let mut out = vec![0u8; scan::expanded_len(self.len, false)];
        scan::expand_packed(&mut out, &self.data, self.len, false);
        out.truncate(self.len);
        out
    }

    /// Decode into a newly allocated vector of uppercase ASCII bases.
    pub fn to_ascii(&self) -> Vec<u8> {
        let mut codes = self.to_codes();
        for code in codes.iter_mut() {
            *code = decode_symbol(*code);
        }
        codes
    }

    /// Append a single ASCII base.
    pub fn push(&mut self, base: u8) -> Result<(), PackedDnaError> {
        let code =
            encode_symbol(base).ok_or(PackedDnaError::UnsupportedBase(base as char, self.len))?;
        self.push_code(code);
        Ok(())
    }

    /// Append ASCII bases.
    pub fn extend_from_slice(&mut self, sequence: &[u8]) -> Result<(), PackedDnaError> {
        for &base in sequence {
            self.push(base)?;
        }
        Ok(())
    }

    fn push_code(&mut self, code: u8) {
        if self.len % SYMBOLS_PER_BYTE == 0 {
            self.data.push(code << 4);
        } else if let Some(last) = self.data.last_mut() {
            *last |= code & 0x0f;
        }
        self.len += 1;
    }

    /// Iterate over symbol codes.
    pub fn iter(&self) -> PackedDnaIter<'_> {
        PackedDnaIter {
            dna: self,
            index: 0,
        }
    }
}

impl fmt::Display for PackedDna {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decoded = self.to_ascii();
        let as_str = String::from_utf8_lossy(&decoded);
        write!(f, "{as_str}")
    }
}

/// Iterator over the symbol codes of a [`PackedDna`].
#[derive(Debug)]
pub struct PackedDnaIter<'a> {
    dna: &'a PackedDna,
    index: usize,
}

impl Iterator for PackedDnaIter<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        let code = self.dna.code_at(self.index)?;
        self.index += 1;
        Some(code)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.dna.len.saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PackedDnaIter<'_> {}

/// Encode an ASCII read into one code per byte.
pub fn encode_read(read: &[u8]) -> Result<Vec<u8>, PackedDnaError> {
    read.iter()
        .enumerate()
        .map(|(idx, &base)| {
            encode_symbol(base).ok_or(PackedDnaError::UnsupportedBase(base as char, idx))
        })
        .collect()
}

fn bytes_for_len(len: usize) -> usize {
    (len + SYMBOLS_PER_BYTE - 1) / SYMBOLS_PER_BYTE
}
