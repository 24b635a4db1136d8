//! Vectorized byte-stream primitives.
//!
//! Three operations are provided, each with a 128-bit SSE2 fast path on
//! x86_64 and a byte-at-a-time fallback in [`scalar`]:
//!
//! - [`count_marker`]: count line-end bytes.
//! - [`count_mismatches`]: count differing byte pairs.
//! - [`expand_packed`]: expand 4-bit packed symbol codes to one code per byte.
//!
//! The fast path and the fallback return identical results for every input;
//! chunking only changes throughput.

pub mod scalar;

#[cfg(target_arch = "x86_64")]
mod sse2;

/// Byte counted by [`count_marker`].
pub const EOL_MARKER: u8 = b'\n';

/// Width in bytes of one vector register.
pub const VECTOR_BYTES: usize = 16;

/// Below this many bytes [`count_marker`] stays scalar.
const MARKER_SCALAR_CUTOFF: usize = 128;

/// Count occurrences of [`EOL_MARKER`] in `buffer`.
///
/// Unaligned leading bytes are handled one at a time until the first
/// vector-aligned address, then whole vectors are compared, then the tail.
pub fn count_marker(buffer: &[u8]) -> usize {
    if buffer.len() < MARKER_SCALAR_CUTOFF {
        return scalar::count_marker(buffer);
    }

    #[cfg(target_arch = "x86_64")]
    {
        sse2::count_marker(buffer)
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        scalar::count_marker(buffer)
    }
}

/// Count positions where `a` and `b` differ.
///
/// Only the common prefix `0..min(a.len(), b.len())` is compared.
pub fn count_mismatches(a: &[u8], b: &[u8]) -> usize {
    let len = a.len().min(b.len());
    let (a, b) = (&a[..len], &b[..len]);

    #[cfg(target_arch = "x86_64")]
    {
        sse2::count_mismatches(a, b)
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        scalar::count_mismatches(a, b)
    }
}

/// Expand `len` symbols of a 4-bit packed stream into one code per byte.
///
/// Codes are stored high nibble first. When `first_is_half_byte` is set the
/// stream starts mid-byte: only the low nibble of `src[0]` is emitted as the
/// first symbol. The remaining count is rounded up to an even number so
/// whole packed bytes are always expanded; the returned value is the number of
/// bytes written, which may be one more than `len`. Callers must not treat the
/// padding byte as part of the sequence.
///
/// # Panics
/// Panics if `src` holds fewer packed bytes than required or `dest` is shorter
/// than [`expanded_len`].
pub fn expand_packed(dest: &mut [u8], src: &[u8], len: usize, first_is_half_byte: bool) -> usize {
    check_expand_buffers(dest, src, len, first_is_half_byte);
    let written = expanded_len(len, first_is_half_byte);

    let mut out = 0;
    let mut src_pos = 0;
    if first_is_half_byte && len > 0 {
        dest[0] = src[0] & 0x0f;
        out = 1;
        src_pos = 1;
    }

    // Leading partial block first, so the vector loop only sees whole blocks.
    let padded = written - out;
    let rest = padded % (2 * VECTOR_BYTES);
    scalar::expand_whole_bytes(&mut dest[out..out + rest], &src[src_pos..src_pos + rest / 2]);
    out += rest;
    src_pos += rest / 2;

    let body = padded - rest;
    let dest_body = &mut dest[out..out + body];
    let src_body = &src[src_pos..src_pos + body / 2];

    #[cfg(target_arch = "x86_64")]
    sse2::expand_blocks(dest_body, src_body);
    #[cfg(not(target_arch = "x86_64"))]
    scalar::expand_whole_bytes(dest_body, src_body);

    written
}

/// Number of bytes [`expand_packed`] writes for a request of `len` symbols.
pub fn expanded_len(len: usize, first_is_half_byte: bool) -> usize {
    if first_is_half_byte && len > 0 {
        1 + round_up_even(len - 1)
    } else {
        round_up_even(len)
    }
}

/// Number of packed bytes [`expand_packed`] reads for a request of `len`
/// symbols.
pub fn packed_bytes_needed(len: usize, first_is_half_byte: bool) -> usize {
    if first_is_half_byte && len > 0 {
        1 + round_up_even(len - 1) / 2
    } else {
        round_up_even(len) / 2
    }
}

fn round_up_even(n: usize) -> usize {
    n + (n & 1)
}

pub(crate) fn check_expand_buffers(dest: &[u8], src: &[u8], len: usize, first_is_half_byte: bool) {
    let needed_src = packed_bytes_needed(len, first_is_half_byte);
    let needed_dest = expanded_len(len, first_is_half_byte);
    assert!(
        src.len() >= needed_src,
        "packed source too small: {} < {}",
        src.len(),
        needed_src
    );
    assert!(
        dest.len() >= needed_dest,
        "expansion buffer too small: {} < {}",
        dest.len(),
        needed_dest
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lcg_bytes(len: usize, seed: u64) -> Vec<u8> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                (state >> 56) as u8
            })
            .collect()
    }

    #[test]
    fn marker_fast_path_matches_scalar_at_every_offset() {
        let mut data = lcg_bytes(700, 7);
        for (idx, byte) in data.iter_mut().enumerate() {
            if idx % 13 == 0 {
                *byte = EOL_MARKER;
            }
        }
        for offset in 0..VECTOR_BYTES {
            let slice = &data[offset..];
            assert_eq!(count_marker(slice), scalar::count_marker(slice));
        }
    }

    #[test]
    fn mismatches_match_scalar_for_partial_tail() {
        let a = lcg_bytes(83, 1);
        let mut b = a.clone();
        b[0] ^= 1;
        b[40] ^= 1;
        b[82] ^= 1;
        assert_eq!(count_mismatches(&a, &b), 3);
        assert_eq!(count_mismatches(&a[1..], &b[1..]), 2);
    }

    #[test]
    fn expansion_crosses_vector_blocks() {
        let src = lcg_bytes(48, 3);
        let mut fast = vec![0u8; 97];
        let mut slow = vec![0u8; 97];
        let written = expand_packed(&mut fast, &src, 95, true);
        let expected = scalar::expand_packed(&mut slow, &src, 95, true);
        assert_eq!(written, expected);
        assert_eq!(fast[..written], slow[..written]);
    }

    #[test]
    fn zero_length_expansion_writes_nothing() {
        let mut dest = [9u8; 2];
        assert_eq!(expand_packed(&mut dest, &[], 0, true), 0);
        assert_eq!(dest, [9, 9]);
    }

    #[test]
    #[should_panic(expected = "packed source too small")]
    fn short_source_is_rejected() {
        let mut dest = [0u8; 8];
        expand_packed(&mut dest, &[0x11], 4, false);
    }
}
