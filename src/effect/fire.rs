//! Fire 2012
//!
//! Per-pixel heat lives in the auxiliary bytes. Heat cools every frame,
//! drifts away from the segment start and new sparks ignite near it.
//! `intensity` is the spark probability per step.

use super::{Effect, FrameContext};
use crate::canvas::Canvas;
use crate::math8::{Prng, qadd8, qsub8};
use crate::palette::ResolvedPalette;

const SEED: u32 = 0x00F1_2E01;
/// Simulation advances once per 32 ms tick
const STEP_SHIFT: u32 = 5;
const MAX_HEAT_INDEX: u8 = 240;

#[derive(Debug, Clone)]
pub struct FireEffect {
    rng: Prng,
    last_step: Option<u64>,
}

impl Default for FireEffect {
    fn default() -> Self {
        Self {
            rng: Prng::new(SEED),
            last_step: None,
        }
    }
}

/// Rescale the speed slider so its midpoint matches the classic cooling rate
#[allow(clippy::cast_possible_truncation)]
fn cooling_speed(speed: u8) -> u16 {
    let speed = u16::from(speed);
    if speed <= 128 {
        speed * 83 / 128
    } else {
        83 + (speed - 128) * 172 / 127
    }
}

fn heat_color(palette: &ResolvedPalette, heat: u8) -> crate::color::Rgb {
    let heat = heat.min(MAX_HEAT_INDEX);
    match palette {
        ResolvedPalette::Solid(_) => palette.color_at(0, heat),
        ResolvedPalette::Table(_) => palette.color_at(heat, 255),
    }
}

impl Effect for FireEffect {
    #[allow(clippy::cast_possible_truncation)]
    fn render(&mut self, ctx: &FrameContext, canvas: &mut Canvas<'_>) {
        let len = canvas.len();
        if len <= 1 {
            canvas.fill(heat_color(&ctx.palette, MAX_HEAT_INDEX));
            return;
        }

        let step = ctx.now.as_millis() >> STEP_SHIFT;
        let advance = self.last_step != Some(step);
        let ignition = (len / 10).clamp(3, 255) as u8;
        let ignition_len = usize::from(ignition).min(len);

        // Cool down every cell a little
        let cooling = ((20 + cooling_speed(ctx.speed) / 3) * 10) as usize / len + 2;
        for i in 0..len {
            let cool = if advance {
                self.rng.below(cooling.min(255) as u16) as u8
            } else {
                self.rng.below(4) as u8
            };
            let min_heat = if i < ignition_len {
                (ignition - i as u8) / 4 + 16
            } else {
                0
            };
            let heat = qsub8(canvas.aux(i), cool).max(min_heat);
            canvas.set_aux(i, heat);
        }

        if advance {
            // Heat drifts away from the start and diffuses
            for k in (2..len).rev() {
                let below = u16::from(canvas.aux(k - 1));
                let further = u16::from(canvas.aux(k - 2));
                canvas.set_aux(k, ((below + (further << 1)) / 3) as u8);
            }

            // Ignite new sparks near the start
            if self.rng.next_u8() <= ctx.intensity {
                let y = self.rng.below(u16::from(ignition)) as u8;
                let boost = (17 * u16::from(ignition - y / 2) / u16::from(ignition)) as u8;
                let spark = self.rng.range8(96 + 2 * boost, 207 + boost);
                let index = usize::from(y).min(len - 1);
                canvas.set_aux(index, qadd8(canvas.aux(index), spark));
            }
            self.last_step = Some(step);
        }

        for i in 0..len {
            canvas.set(i, heat_color(&ctx.palette, canvas.aux(i)));
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
