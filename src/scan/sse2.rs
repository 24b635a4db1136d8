//! SSE2 kernels. SSE2 is part of the x86_64 baseline, so no runtime
//! detection is needed.

use std::arch::x86_64::*;

use super::{scalar, EOL_MARKER, VECTOR_BYTES};

pub(super) fn count_marker(buffer: &[u8]) -> usize {
    // SAFETY: every bit pattern is a valid `__m128i`, so reinterpreting the
    // aligned middle of a byte slice is sound.
    let (head, body, tail) = unsafe { buffer.align_to::<__m128i>() };

    let mut count = scalar::count_marker(head);
    // SAFETY: SSE2 is always available on x86_64.
    unsafe {
        let marker = _mm_set1_epi8(EOL_MARKER as i8);
        for block in body {
            let eq = _mm_cmpeq_epi8(*block, marker);
            count += (_mm_movemask_epi8(eq) as u32).count_ones() as usize;
        }
    }
    count + scalar::count_marker(tail)
}

pub(super) fn count_mismatches(a: &[u8], b: &[u8]) -> usize {
    debug_assert_eq!(a.len(), b.len());
    let rest = a.len() % VECTOR_BYTES;
    let mut mismatches = scalar::count_mismatches(&a[..rest], &b[..rest]);

    for (chunk_a, chunk_b) in a[rest..]
        .chunks_exact(VECTOR_BYTES)
        .zip(b[rest..].chunks_exact(VECTOR_BYTES))
    {
        // SAFETY: both chunks are exactly 16 bytes long; loads are unaligned.
        unsafe {
            let va = _mm_loadu_si128(chunk_a.as_ptr() as *const __m128i);
            let vb = _mm_loadu_si128(chunk_b.as_ptr() as *const __m128i);
            let eq = _mm_movemask_epi8(_mm_cmpeq_epi8(va, vb)) as u32;
            mismatches += VECTOR_BYTES - eq.count_ones() as usize;
        }
    }
    mismatches
}

/// Expand whole 16-byte packed blocks into 32 codes each.
pub(super) fn expand_blocks(dest: &mut [u8], src: &[u8]) {
    debug_assert_eq!(src.len() % VECTOR_BYTES, 0);
    debug_assert_eq!(dest.len(), src.len() * 2);

    for (out, packed) in dest
        .chunks_exact_mut(2 * VECTOR_BYTES)
        .zip(src.chunks_exact(VECTOR_BYTES))
    {
        // SAFETY: `packed` is 16 bytes and `out` is 32 bytes; all loads and
        // stores are unaligned.
        unsafe {
            let zero = _mm_setzero_si128();
            let mask = _mm_set1_epi16(0x0f0f);
            let bytes = _mm_loadu_si128(packed.as_ptr() as *const __m128i);

            // Widen each packed byte `hl` to the 16-bit lane 0x00hl, then
            // build 0x0l0h so the little-endian store emits `h` before `l`.
            let lo = _mm_unpacklo_epi8(bytes, zero);
            let hi = _mm_unpackhi_epi8(bytes, zero);
            let lo = _mm_and_si128(_mm_xor_si128(_mm_slli_epi16(lo, 8), _mm_srli_epi16(lo, 4)), mask);
            let hi = _mm_and_si128(_mm_xor_si128(_mm_slli_epi16(hi, 8), _mm_srli_epi16(hi, 4)), mask);

            _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, lo);
            _mm_storeu_si128(out.as_mut_ptr().add(VECTOR_BYTES) as *mut __m128i, hi);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_expansion_orders_high_nibble_first() {
        let src: Vec<u8> = (0u8..16).map(|i| (i & 0x0f) << 4 | (15 - (i & 0x0f))).collect();
        let mut dest = [0u8; 32];
        expand_blocks(&mut dest, &src);
        for (i, pair) in dest.chunks_exact(2).enumerate() {
            assert_eq!(pair[0], i as u8);
            assert_eq!(pair[1], 15 - i as u8);
        }
    }

    #[test]
    fn aligned_body_counts_every_marker() {
        let buffer = vec![EOL_MARKER; 300];
        assert_eq!(count_marker(&buffer), 300);
        assert_eq!(count_marker(&buffer[3..]), 297);
    }
}
