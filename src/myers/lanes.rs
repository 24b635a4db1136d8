//! Vector-width policy for the bit-parallel recurrence.
//!
//! A [`LaneVector`] is a group of 64-bit lanes, each holding 64 consecutive
//! pattern rows. Lanes never exchange carries inside one column: arithmetic
//! and shifts are per lane, and the bit leaving the top of lane `k` reaches
//! lane `k + 1` one column later through [`LaneVector::carry_in`].

use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

/// Pattern rows held by one lane.
pub const LANE_BITS: usize = 64;

/// Operations the DP sweep needs from a vector of 64-bit lanes.
pub trait LaneVector:
    Copy
    + fmt::Debug
    + PartialEq
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
{
    /// Number of 64-bit lanes.
    const LANES: usize;
    /// Total pattern rows, `LANES * 64`.
    const BITS: usize = Self::LANES * LANE_BITS;

    /// All bits clear.
    fn zero() -> Self;

    /// All bits set.
    fn ones() -> Self;

    /// Build a vector lane by lane.
    fn from_fn(f: impl FnMut(usize) -> u64) -> Self;

    /// Raw 64-bit word of `lane`.
    fn word(&self, lane: usize) -> u64;

    /// Per-lane wrapping addition.
    fn lane_add(self, rhs: Self) -> Self;

    /// Per-lane shift left by one bit; bit 0 of every lane becomes zero.
    fn lane_shl1(self) -> Self;

    /// Bit 63 of lane `k` moved to bit 0 of lane `k + 1`; lane 0 is zero.
    fn carry_in(self) -> Self;

    /// Bit `index` counted across lanes.
    #[inline]
    fn bit(&self, index: usize) -> bool {
        (self.word(index / LANE_BITS) >> (index % LANE_BITS)) & 1 == 1
    }
}

/// Portable lane vector backed by `[u64; N]`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Lanes<const N: usize>(pub [u64; N]);

impl<const N: usize> fmt::Debug for Lanes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_words(f, (0..N).map(|lane| self.0[lane]))
    }
}

impl<const N: usize> BitAnd for Lanes<N> {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] & rhs.0[i]))
    }
}

impl<const N: usize> BitOr for Lanes<N> {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] | rhs.0[i]))
    }
}

impl<const N: usize> BitXor for Lanes<N> {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] ^ rhs.0[i]))
    }
}

impl<const N: usize> Not for Lanes<N> {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        Self(std::array::from_fn(|i| !self.0[i]))
    }
}

impl<const N: usize> LaneVector for Lanes<N> {
    const LANES: usize = N;

    #[inline]
    fn zero() -> Self {
        Self([0; N])
    }

    #[inline]
    fn ones() -> Self {
        Self([u64::MAX; N])
    }

    #[inline]
    fn from_fn(f: impl FnMut(usize) -> u64) -> Self {
        Self(std::array::from_fn(f))
    }

    #[inline]
    fn word(&self, lane: usize) -> u64 {
        self.0[lane]
    }

    #[inline]
    fn lane_add(self, rhs: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i].wrapping_add(rhs.0[i])))
    }

    #[inline]
    fn lane_shl1(self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] << 1))
    }

    #[inline]
    fn carry_in(self) -> Self {
        Self(std::array::from_fn(|i| if i == 0 { 0 } else { self.0[i - 1] >> 63 }))
    }
}

#[cfg(target_arch = "x86_64")]
pub use sse2::Sse2x2;

/// Two-lane vector used by the default 128-row engine.
#[cfg(target_arch = "x86_64")]
pub type Vec128 = Sse2x2;
/// Two-lane vector used by the default 128-row engine.
#[cfg(not(target_arch = "x86_64"))]
pub type Vec128 = Lanes<2>;

/// Single-lane vector, for patterns of up to 64 rows.
pub type Vec64 = Lanes<1>;

#[cfg(target_arch = "x86_64")]
mod sse2 {
    use std::arch::x86_64::*;
    use std::fmt;
    use std::ops::{BitAnd, BitOr, BitXor, Not};

    use super::LaneVector;

    /// Two 64-bit lanes in one SSE2 register.
    #[derive(Clone, Copy)]
    pub struct Sse2x2(__m128i);

    impl Sse2x2 {
        #[inline]
        fn words(self) -> [u64; 2] {
            // SAFETY: `__m128i` and `[u64; 2]` have the same size and every
            // bit pattern is valid for both.
            unsafe { std::mem::transmute::<__m128i, [u64; 2]>(self.0) }
        }
    }

    impl fmt::Debug for Sse2x2 {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            super::write_words(f, self.words().into_iter())
        }
    }

    impl PartialEq for Sse2x2 {
        fn eq(&self, other: &Self) -> bool {
            self.words() == other.words()
        }
    }

    impl Eq for Sse2x2 {}

    // SAFETY (all intrinsics below): SSE2 is part of the x86_64 baseline.

    impl BitAnd for Sse2x2 {
        type Output = Self;

        #[inline]
        fn bitand(self, rhs: Self) -> Self {
            Self(unsafe { _mm_and_si128(self.0, rhs.0) })
        }
    }

    impl BitOr for Sse2x2 {
        type Output = Self;

        #[inline]
        fn bitor(self, rhs: Self) -> Self {
            Self(unsafe { _mm_or_si128(self.0, rhs.0) })
        }
    }

    impl BitXor for Sse2x2 {
        type Output = Self;

        #[inline]
        fn bitxor(self, rhs: Self) -> Self {
            Self(unsafe { _mm_xor_si128(self.0, rhs.0) })
        }
    }

    impl Not for Sse2x2 {
        type Output = Self;

        #[inline]
        fn not(self) -> Self {
            Self(unsafe { _mm_xor_si128(self.0, _mm_set1_epi64x(-1)) })
        }
    }

    impl LaneVector for Sse2x2 {
        const LANES: usize = 2;

        #[inline]
        fn zero() -> Self {
            Self(unsafe { _mm_setzero_si128() })
        }

        #[inline]
        fn ones() -> Self {
            Self(unsafe { _mm_set1_epi64x(-1) })
        }

        #[inline]
        fn from_fn(mut f: impl FnMut(usize) -> u64) -> Self {
            let lo = f(0);
            let hi = f(1);
            Self(unsafe { _mm_set_epi64x(hi as i64, lo as i64) })
        }

        #[inline]
        fn word(&self, lane: usize) -> u64 {
            self.words()[lane]
        }

        #[inline]
        fn lane_add(self, rhs: Self) -> Self {
            Self(unsafe { _mm_add_epi64(self.0, rhs.0) })
        }

        #[inline]
        fn lane_shl1(self) -> Self {
            Self(unsafe { _mm_slli_epi64(self.0, 1) })
        }

        #[inline]
        fn carry_in(self) -> Self {
            // Move the low lane up by 8 bytes, zeroing the low lane, then
            // keep only its top bit.
            Self(unsafe { _mm_srli_epi64(_mm_slli_si128(self.0, 8), 63) })
        }
    }
}

fn write_words(f: &mut fmt::Formatter<'_>, words: impl Iterator<Item = u64>) -> fmt::Result {
    f.write_str("[")?;
    for (lane, word) in words.enumerate() {
        if lane > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{word:#018x}")?;
    }
    f.write_str("]")
}
