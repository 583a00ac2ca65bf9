//! Random dissolve
//!
//! Pixels light up in random order until the segment is full, hold, then go
//! dark in random order and hold again. The on/off state of each pixel is
//! kept in its auxiliary byte. `intensity` sets how many pixels change per
//! frame.

use embassy_time::Instant;

use super::{Effect, FrameContext};
use crate::canvas::Canvas;
use crate::color::BLACK;
use crate::math8::Prng;

const SEED: u32 = 0x0D15_501E;
const PIXEL_ON: u8 = 1;
const PIXEL_OFF: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Filling,
    HoldOn,
    Clearing,
    HoldOff,
}

#[derive(Debug, Clone)]
pub struct DissolveEffect {
    rng: Prng,
    phase: Phase,
    phase_start: Option<Instant>,
}

impl Default for DissolveEffect {
    fn default() -> Self {
        Self {
            rng: Prng::new(SEED),
            phase: Phase::Filling,
            phase_start: None,
        }
    }
}

impl DissolveEffect {
    /// Flip one random pixel to `target`, scanning forward from a random start
    #[allow(clippy::cast_possible_truncation)]
    fn flip_random(&mut self, canvas: &mut Canvas<'_>, target: u8) -> bool {
        let len = canvas.len();
        let start = usize::from(self.rng.below(len.min(usize::from(u16::MAX)) as u16));
        for offset in 0..len {
            let i = (start + offset) % len;
            if canvas.aux(i) != target {
                canvas.set_aux(i, target);
                return true;
            }
        }
        false
    }

    fn enter(&mut self, phase: Phase, now: Instant) {
        self.phase = phase;
        self.phase_start = Some(now);
    }
}

impl Effect for DissolveEffect {
    fn render(&mut self, ctx: &FrameContext, canvas: &mut Canvas<'_>) {
        let len = canvas.len();
        if len == 0 {
            return;
        }

        let now = ctx.now;
        let phase_start = *self.phase_start.get_or_insert(now);
        let per_frame = 1 + usize::from(ctx.intensity >> 5);
        let hold_ms = 500 + u64::from(255 - ctx.speed) * 10;
        let held = now.saturating_duration_since(phase_start).as_millis() >= hold_ms;
        // Counted from the aux bytes so a resized segment cannot stall a phase
        let mut lit = (0..len).filter(|&i| canvas.aux(i) == PIXEL_ON).count();

        match self.phase {
            Phase::Filling => {
                for _ in 0..per_frame {
                    if lit >= len || !self.flip_random(canvas, PIXEL_ON) {
                        break;
                    }
                    lit += 1;
                }
                if lit >= len {
                    self.enter(Phase::HoldOn, now);
                }
            }
            Phase::HoldOn if held => self.enter(Phase::Clearing, now),
            Phase::Clearing => {
                for _ in 0..per_frame {
                    if lit == 0 || !self.flip_random(canvas, PIXEL_OFF) {
                        break;
                    }
                    lit -= 1;
                }
                if lit == 0 {
                    self.enter(Phase::HoldOff, now);
                }
            }
            Phase::HoldOff if held => self.enter(Phase::Filling, now),
            Phase::HoldOn | Phase::HoldOff => {}
        }

        for i in 0..len {
            let color = if canvas.aux(i) == PIXEL_ON {
                ctx.palette_color(i, len)
            } else {
                BLACK
            };
            canvas.set(i, color);
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
