//! Larson scanner
//!
//! A single dot bounces between the segment ends and leaves a fading trail.
//! `intensity` sets the trail length, higher means longer.

use super::{Effect, FrameContext, spread8};
use crate::canvas::Canvas;
use crate::math8::triwave8;

const SLOWEST_CYCLE_MS: u64 = 12_000;
const FASTEST_CYCLE_MS: u64 = 600;

#[derive(Debug, Clone, Copy, Default)]
pub struct ScannerEffect;

impl Effect for ScannerEffect {
    #[allow(clippy::cast_possible_truncation)]
    fn render(&mut self, ctx: &FrameContext, canvas: &mut Canvas<'_>) {
        let len = canvas.len();
        if len == 0 {
            return;
        }

        canvas.fade_to_black_by(128 - ctx.intensity.max(16) / 2);

        let cycle = ctx.cycle_ms(SLOWEST_CYCLE_MS, FASTEST_CYCLE_MS);
        let phase = ((ctx.now.as_millis() % cycle) * 256 / cycle) as u8;
        // triwave8 peaks at 254
        let position = usize::from(triwave8(phase)) * (len - 1) / 254;
        canvas.set(position, ctx.palette.color_at(spread8(position, len), 255));
    }
}
