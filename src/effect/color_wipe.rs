//! Color wipe and sweep
//!
//! A colored edge runs along the segment, then a dark edge follows it.
//! The wipe clears from the start, the sweep clears back from the end.

use super::{Effect, FrameContext, spread8};
use crate::canvas::Canvas;
use crate::color::{BLACK, scale_color};

const SLOWEST_CYCLE_MS: u64 = 20_000;
const FASTEST_CYCLE_MS: u64 = 750;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WipeMode {
    /// Fill forward, then clear forward
    Wipe,
    /// Fill forward, then clear backward
    Sweep,
}

#[derive(Debug, Clone, Copy)]
pub struct ColorWipeEffect {
    mode: WipeMode,
}

impl ColorWipeEffect {
    pub const fn new(mode: WipeMode) -> Self {
        Self { mode }
    }
}

impl Effect for ColorWipeEffect {
    fn render(&mut self, ctx: &FrameContext, canvas: &mut Canvas<'_>) {
        let len = canvas.len();
        if len == 0 {
            return;
        }

        let cycle = ctx.cycle_ms(SLOWEST_CYCLE_MS, FASTEST_CYCLE_MS);
        let t = ctx.now.as_millis() % (cycle * 2);
        let clearing = t >= cycle;
        let t = t % cycle;

        // Edge position in 1/256 pixel units
        let edge = usize::try_from(t * (len as u64) * 256 / cycle).unwrap_or(usize::MAX);
        let full = edge >> 8;
        #[allow(clippy::cast_possible_truncation)]
        let partial = (edge & 0xFF) as u8;

        for i in 0..len {
            // Distance of this pixel along the travel direction
            let step = if clearing && self.mode == WipeMode::Sweep {
                len - 1 - i
            } else {
                i
            };
            let coverage = if step < full {
                255
            } else if step == full {
                partial
            } else {
                0
            };
            let level = if clearing { 255 - coverage } else { coverage };

            let color = if level == 0 {
                BLACK
            } else {
                scale_color(ctx.palette.color_at(spread8(i, len), 255), level)
            };
            canvas.set(i, color);
        }
    }
}
