/// Contiguous run of LEDs sharing one set of effect parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentBounds {
    pub start: usize,
    pub stop: usize,
}

impl SegmentBounds {
    pub const fn new(start: usize, stop: usize) -> Self {
        Self { start, stop }
    }

    /// Segment covering a whole strip of `len` LEDs
    pub const fn full(len: usize) -> Self {
        Self { start: 0, stop: len }
    }

    /// Get the number of LEDs in the segment
    pub const fn len(self) -> usize {
        self.stop.saturating_sub(self.start)
    }

    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Clamp the segment to a strip of `len` LEDs
    #[must_use]
    pub const fn clamped(self, len: usize) -> Self {
        let stop = if self.stop > len { len } else { self.stop };
        let start = if self.start > stop { stop } else { self.start };
        Self { start, stop }
    }
}
