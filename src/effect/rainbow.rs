//! Rainbow effects
//!
//! - `RainbowEffect`: the whole segment cycles through the hue wheel
//! - `RainbowCycleEffect`: the palette is stretched along the segment and
//!   scrolls over time

use super::{Effect, FrameContext, spread8};
use crate::canvas::Canvas;
use crate::color::{Hsv, hsv2rgb};

const SLOWEST_CYCLE_MS: u64 = 30_000;
const FASTEST_CYCLE_MS: u64 = 1_000;

#[allow(clippy::cast_possible_truncation)]
fn base_hue(ctx: &FrameContext) -> u8 {
    let cycle = ctx.cycle_ms(SLOWEST_CYCLE_MS, FASTEST_CYCLE_MS);
    ((ctx.now.as_millis() % cycle) * 256 / cycle) as u8
}

/// Solid color moving around the hue wheel
///
/// `intensity` sets the saturation, from pastel to fully saturated.
#[derive(Debug, Clone, Copy, Default)]
pub struct RainbowEffect;

impl Effect for RainbowEffect {
    const PALETTE_LOCKED: bool = true;

    fn render(&mut self, ctx: &FrameContext, canvas: &mut Canvas<'_>) {
        let color = hsv2rgb(Hsv {
            hue: base_hue(ctx),
            sat: 128 + (ctx.intensity >> 1),
            val: 255,
        });
        canvas.fill(color);
    }
}

/// Palette gradient scrolling along the segment
///
/// `intensity` sets how many palette repeats fit on the segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct RainbowCycleEffect;

impl Effect for RainbowCycleEffect {
    fn render(&mut self, ctx: &FrameContext, canvas: &mut Canvas<'_>) {
        let len = canvas.len();
        let hue = base_hue(ctx);
        let repeats = (ctx.intensity >> 6) + 1;

        for i in 0..len {
            let index = spread8(i, len).wrapping_mul(repeats).wrapping_add(hue);
            canvas.set(i, ctx.palette.color_at(index, 255));
        }
    }
}
