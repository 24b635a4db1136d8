use crate::genomics::{CODE_T, SYMBOL_CODES};
use crate::myers::{AlignError, LaneVector, LANE_BITS};

/// Per-symbol pattern bitmasks (`Peq` in Myers' notation).
///
/// Bit `i` of `masks[c]` is set when pattern position `i` holds base `c`.
/// Only the four bases get bits, so `N`, reserved codes and the sentinel
/// match nothing.
#[derive(Debug, Clone)]
pub struct PatternMasks<V: LaneVector> {
    masks: [V; SYMBOL_CODES],
    len: usize,
}

impl<V: LaneVector> PatternMasks<V> {
    /// Build masks for a pattern given as one symbol code per byte.
    pub fn build(pattern: &[u8]) -> Result<Self, AlignError> {
        if pattern.is_empty() || pattern.len() > V::BITS {
            return Err(AlignError::PatternLength {
                len: pattern.len(),
                max: V::BITS,
            });
        }

        let mut words = vec![0u64; SYMBOL_CODES * V::LANES];
        for (row, &code) in pattern.iter().enumerate() {
            if code <= CODE_T {
                let lane = row / LANE_BITS;
                words[code as usize * V::LANES + lane] |= 1u64 << (row % LANE_BITS);
            }
        }

        let masks = std::array::from_fn(|code| V::from_fn(|lane| words[code * V::LANES + lane]));
        Ok(Self {
            masks,
            len: pattern.len(),
        })
    }

    /// Pattern length.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the pattern has no symbols.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Mask for one symbol code.
    #[inline]
    pub fn mask(&self, code: u8) -> V {
        self.masks[code as usize & (SYMBOL_CODES - 1)]
    }

    /// Column mask with lane `k` taken from `symbols[base - k]`.
    ///
    /// Lane `k` runs `k` columns behind lane 0, so each lane looks up the
    /// reference symbol of its own column.
    #[inline]
    pub fn skewed(&self, symbols: &[u8], base: usize) -> V {
        V::from_fn(|lane| self.mask(symbols[base - lane]).word(lane))
    }
}
