//! Static fill effect
//!
//! Fills the segment from the palette. With the solid palette every pixel
//! gets the segment color.

use super::{Effect, FrameContext};
use crate::canvas::Canvas;

#[derive(Debug, Clone, Copy, Default)]
pub struct StaticColorEffect;

impl Effect for StaticColorEffect {
    fn render(&mut self, ctx: &FrameContext, canvas: &mut Canvas<'_>) {
        let len = canvas.len();
        for i in 0..len {
            canvas.set(i, ctx.palette_color(i, len));
        }
    }
}
