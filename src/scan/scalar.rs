//! Byte-at-a-time versions of the scan primitives.
//!
//! These are the ground truth for the vectorized paths and are also used for
//! short buffers and unaligned heads/tails.

use super::EOL_MARKER;

/// Count occurrences of [`EOL_MARKER`] in `buffer`.
pub fn count_marker(buffer: &[u8]) -> usize {
    buffer.iter().filter(|&&byte| byte == EOL_MARKER).count()
}

/// Count positions where `a` and `b` differ over their common prefix.
pub fn count_mismatches(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).filter(|(x, y)| x != y).count()
}

/// Expand a 4-bit packed stream into one code per byte without any vector
/// blocks. Semantics match [`super::expand_packed`].
pub fn expand_packed(dest: &mut [u8], src: &[u8], len: usize, first_is_half_byte: bool) -> usize {
    let written = super::expanded_len(len, first_is_half_byte);
    super::check_expand_buffers(dest, src, len, first_is_half_byte);

    let mut out = 0;
    let mut src_pos = 0;
    if first_is_half_byte && len > 0 {
        dest[0] = src[0] & 0x0f;
        out = 1;
        src_pos = 1;
    }

    let whole = written - out;
    expand_whole_bytes(&mut dest[out..written], &src[src_pos..src_pos + whole / 2]);
    written
}

/// Expand every byte of `src` into its high and low nibble.
///
/// `dest` must hold exactly `2 * src.len()` bytes.
pub(crate) fn expand_whole_bytes(dest: &mut [u8], src: &[u8]) {
    debug_assert_eq!(dest.len(), src.len() * 2);
    for (pair, &byte) in dest.chunks_exact_mut(2).zip(src.iter()) {
        pair[0] = byte >> 4;
        pair[1] = byte & 0x0f;
    }
}
