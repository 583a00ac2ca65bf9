//! Slow brightness pulse over the palette colors

use super::{Effect, FrameContext};
use crate::canvas::Canvas;
use crate::math8::{quadwave8, scale8};

const SLOWEST_CYCLE_MS: u64 = 10_000;
const FASTEST_CYCLE_MS: u64 = 1_000;
/// Floor of the pulse, the strip never goes fully dark
const MIN_LEVEL: u8 = 30;

#[derive(Debug, Clone, Copy, Default)]
pub struct BreathEffect;

impl Effect for BreathEffect {
    #[allow(clippy::cast_possible_truncation)]
    fn render(&mut self, ctx: &FrameContext, canvas: &mut Canvas<'_>) {
        let cycle = ctx.cycle_ms(SLOWEST_CYCLE_MS, FASTEST_CYCLE_MS);
        let phase = ((ctx.now.as_millis() % cycle) * 256 / cycle) as u8;
        let level = MIN_LEVEL + scale8(quadwave8(phase), 255 - MIN_LEVEL);

        let len = canvas.len();
        for i in 0..len {
            canvas.set(i, ctx.palette.color_at(super::spread8(i, len), level));
        }
    }
}
