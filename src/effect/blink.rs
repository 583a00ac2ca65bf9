//! Blink between the palette and black
//!
//! `intensity` is the share of the cycle spent lit.

use super::{Effect, FrameContext};
use crate::canvas::Canvas;
use crate::color::BLACK;

const SLOWEST_CYCLE_MS: u64 = 5_100;
const FASTEST_CYCLE_MS: u64 = 100;

#[derive(Debug, Clone, Copy, Default)]
pub struct BlinkEffect {
    lit: bool,
}

impl BlinkEffect {
    /// Whether the last rendered frame was the lit phase
    pub const fn is_lit(&self) -> bool {
        self.lit
    }
}

impl Effect for BlinkEffect {
    fn render(&mut self, ctx: &FrameContext, canvas: &mut Canvas<'_>) {
        let cycle = ctx.cycle_ms(SLOWEST_CYCLE_MS, FASTEST_CYCLE_MS);
        let on_time = cycle * (u64::from(ctx.intensity) + 1) / 256;
        self.lit = ctx.now.as_millis() % cycle < on_time;

        let len = canvas.len();
        for i in 0..len {
            let color = if self.lit {
                ctx.palette_color(i, len)
            } else {
                BLACK
            };
            canvas.set(i, color);
        }
    }

    fn reset(&mut self) {
        self.lit = false;
    }
}
