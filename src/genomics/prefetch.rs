use crate::genomics::{PackedDna, NO_SYMBOL};
use crate::scan;

/// Bytes past the window that a prefetch may touch: one even-padding byte
/// from [`scan::expand_packed`] plus one spare.
const OVERRUN: usize = 2;

/// Reusable scratch buffer holding one unpacked reference window.
///
/// Layout: `lead` sentinel bytes, the window (one code per byte), then
/// sentinel padding. Positions of the window past the end of the reference
/// also read as the sentinel, so the DP can index a fixed number of columns
/// without checking the reference length.
#[derive(Debug, Clone)]
pub struct PrefetchBuffer {
    buf: Vec<u8>,
    lead: usize,
    capacity: usize,
    window_len: usize,
}

impl PrefetchBuffer {
    /// Allocate a buffer for windows of up to `capacity` symbols with `lead`
    /// leading sentinels.
    pub fn new(capacity: usize, lead: usize) -> Self {
        Self {
            buf: vec![NO_SYMBOL; Self::buffer_len(capacity, lead)],
            lead,
            capacity,
            window_len: 0,
        }
    }

    fn buffer_len(capacity: usize, lead: usize) -> usize {
        lead + capacity + lead + OVERRUN
    }

    /// Largest window this buffer can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of leading sentinels.
    pub fn lead(&self) -> usize {
        self.lead
    }

    /// Grow to hold windows of up to `capacity` symbols. Never shrinks.
    pub fn reserve(&mut self, capacity: usize) {
        if capacity > self.capacity {
            self.buf.resize(Self::buffer_len(capacity, self.lead), NO_SYMBOL);
            self.capacity = capacity;
        }
    }

    /// Unpack `window_len` symbols of `genome` starting at symbol `start`.
    ///
    /// An odd `start` begins mid-byte; the low nibble of the first packed byte
    /// becomes the first window symbol.
    ///
    /// # Panics
    /// Panics if `window_len` exceeds [`Self::capacity`].
    pub fn prefetch(&mut self, genome: &PackedDna, start: usize, window_len: usize) {
        assert!(
            window_len <= self.capacity,
            "window {} exceeds prefetch capacity {}",
            window_len,
            self.capacity
        );

        let lead = self.lead;
        self.buf[..lead].fill(NO_SYMBOL);

        let available = genome.len().saturating_sub(start).min(window_len);
        if available > 0 {
            let first_is_half_byte = start & 1 == 1;
            let src = &genome.bytes()[start / 2..];
            scan::expand_packed(&mut self.buf[lead..], src, available, first_is_half_byte);
        }

        // Clears the expansion's even-padding byte as well as anything past
        // the reference end.
        let end = lead + window_len + lead + OVERRUN;
        self.buf[lead + available..end].fill(NO_SYMBOL);
        self.window_len = window_len;
    }

    /// The most recently prefetched window.
    pub fn window(&self) -> &[u8] {
        &self.buf[self.lead..self.lead + self.window_len]
    }

    /// The full buffer: leading sentinels, window, trailing sentinels.
    pub fn symbols(&self) -> &[u8] {
        &self.buf[..self.lead + self.window_len + self.lead + OVERRUN]
    }
}
