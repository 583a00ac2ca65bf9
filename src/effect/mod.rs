//! Effect system with compile-time known effect variants
//!
//! All effects are stored in an enum to avoid heap allocations.
//! Each effect implements the `Effect` trait and draws through a [`Canvas`],
//! which takes care of segment bounds and mirroring.
//!
//! `intensity` means something different for every effect (duty cycle,
//! trail length, spawn rate, spark density); each effect documents its own.

mod blink;
mod breath;
mod color_wipe;
mod dissolve;
mod fire;
mod rainbow;
mod scanner;
mod static_color;

use embassy_time::{Duration, Instant};

pub use blink::BlinkEffect;
pub use breath::BreathEffect;
pub use color_wipe::{ColorWipeEffect, WipeMode};
pub use dissolve::DissolveEffect;
pub use fire::FireEffect;
pub use rainbow::{RainbowCycleEffect, RainbowEffect};
pub use scanner::ScannerEffect;
pub use static_color::StaticColorEffect;

use crate::canvas::Canvas;
use crate::color::Rgb;
use crate::palette::{PALETTE_FIRE, PALETTE_RAINBOW, PALETTE_SOLID, ResolvedPalette};

const EFFECT_NAME_STATIC: &str = "static";
const EFFECT_NAME_BLINK: &str = "blink";
const EFFECT_NAME_BREATH: &str = "breath";
const EFFECT_NAME_COLOR_WIPE: &str = "color_wipe";
const EFFECT_NAME_COLOR_SWEEP: &str = "color_sweep";
const EFFECT_NAME_RAINBOW: &str = "rainbow";
const EFFECT_NAME_RAINBOW_CYCLE: &str = "rainbow_cycle";
const EFFECT_NAME_DISSOLVE: &str = "dissolve";
const EFFECT_NAME_SCANNER: &str = "scanner";
const EFFECT_NAME_FIRE: &str = "fire_2012";

const EFFECT_ID_STATIC: u8 = 0;
const EFFECT_ID_BLINK: u8 = 1;
const EFFECT_ID_BREATH: u8 = 2;
const EFFECT_ID_COLOR_WIPE: u8 = 3;
const EFFECT_ID_COLOR_SWEEP: u8 = 6;
const EFFECT_ID_RAINBOW: u8 = 8;
const EFFECT_ID_RAINBOW_CYCLE: u8 = 9;
const EFFECT_ID_DISSOLVE: u8 = 18;
const EFFECT_ID_SCANNER: u8 = 40;
const EFFECT_ID_FIRE: u8 = 66;

/// Speed and intensity used when no curated value exists
pub const DEFAULT_SPEED: u8 = 128;
pub const DEFAULT_INTENSITY: u8 = 128;

/// Inputs of one rendered frame
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    pub now: Instant,
    /// Time since the previous frame of the same effect
    pub frame_time: Duration,
    /// Frames rendered since the effect was activated
    pub call: u32,
    pub speed: u8,
    pub intensity: u8,
    pub palette: ResolvedPalette,
    /// Primary segment color
    pub color: Rgb,
}

impl FrameContext {
    /// Palette color for logical pixel `i` spread over `len` pixels
    pub fn palette_color(&self, i: usize, len: usize) -> Rgb {
        self.palette.color_at(spread8(i, len), 255)
    }

    /// Period of an animation cycle, from `slowest` at speed 0 to `fastest` at 255
    pub fn cycle_ms(&self, slowest: u64, fastest: u64) -> u64 {
        let span = slowest.saturating_sub(fastest);
        slowest - span * u64::from(self.speed) / 255
    }
}

/// Map `i` in `0..len` onto `0..=255`
#[allow(clippy::cast_possible_truncation)]
pub fn spread8(i: usize, len: usize) -> u8 {
    if len == 0 {
        return 0;
    }
    ((i * 256) / len).min(255) as u8
}

pub trait Effect {
    /// Effect draws its own colors and ignores the palette
    const PALETTE_LOCKED: bool = false;

    /// Render a single frame
    fn render(&mut self, ctx: &FrameContext, canvas: &mut Canvas<'_>);

    /// Reset effect state
    fn reset(&mut self) {}
}

/// Curated parameters of an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectDefaults {
    pub speed: u8,
    pub intensity: u8,
    pub palette: u8,
}

/// Known effect ids that can be requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EffectId {
    Static = EFFECT_ID_STATIC,
    Blink = EFFECT_ID_BLINK,
    Breath = EFFECT_ID_BREATH,
    ColorWipe = EFFECT_ID_COLOR_WIPE,
    ColorSweep = EFFECT_ID_COLOR_SWEEP,
    Rainbow = EFFECT_ID_RAINBOW,
    RainbowCycle = EFFECT_ID_RAINBOW_CYCLE,
    Dissolve = EFFECT_ID_DISSOLVE,
    Scanner = EFFECT_ID_SCANNER,
    Fire = EFFECT_ID_FIRE,
}

impl EffectId {
    pub const ALL: [Self; 10] = [
        Self::Static,
        Self::Blink,
        Self::Breath,
        Self::ColorWipe,
        Self::ColorSweep,
        Self::Rainbow,
        Self::RainbowCycle,
        Self::Dissolve,
        Self::Scanner,
        Self::Fire,
    ];

    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            EFFECT_ID_STATIC => Self::Static,
            EFFECT_ID_BLINK => Self::Blink,
            EFFECT_ID_BREATH => Self::Breath,
            EFFECT_ID_COLOR_WIPE => Self::ColorWipe,
            EFFECT_ID_COLOR_SWEEP => Self::ColorSweep,
            EFFECT_ID_RAINBOW => Self::Rainbow,
            EFFECT_ID_RAINBOW_CYCLE => Self::RainbowCycle,
            EFFECT_ID_DISSOLVE => Self::Dissolve,
            EFFECT_ID_SCANNER => Self::Scanner,
            EFFECT_ID_FIRE => Self::Fire,
            _ => return None,
        })
    }

    /// Map a raw id, rendering unknown ids as [`EffectId::Static`]
    pub fn from_raw_or_static(value: u8) -> Self {
        Self::from_raw(value).unwrap_or(Self::Static)
    }

    pub fn to_slot(self) -> EffectSlot {
        match self {
            Self::Static => EffectSlot::Static(StaticColorEffect),
            Self::Blink => EffectSlot::Blink(BlinkEffect::default()),
            Self::Breath => EffectSlot::Breath(BreathEffect),
            Self::ColorWipe => EffectSlot::ColorWipe(ColorWipeEffect::new(WipeMode::Wipe)),
            Self::ColorSweep => EffectSlot::ColorSweep(ColorWipeEffect::new(WipeMode::Sweep)),
            Self::Rainbow => EffectSlot::Rainbow(RainbowEffect),
            Self::RainbowCycle => EffectSlot::RainbowCycle(RainbowCycleEffect),
            Self::Dissolve => EffectSlot::Dissolve(DissolveEffect::default()),
            Self::Scanner => EffectSlot::Scanner(ScannerEffect),
            Self::Fire => EffectSlot::Fire(FireEffect::default()),
        }
    }

    /// Curated speed, intensity and palette of this effect
    pub const fn defaults(self) -> EffectDefaults {
        match self {
            Self::Fire => EffectDefaults {
                speed: 64,
                intensity: 160,
                palette: PALETTE_FIRE,
            },
            Self::Rainbow | Self::RainbowCycle => EffectDefaults {
                speed: DEFAULT_SPEED,
                intensity: DEFAULT_INTENSITY,
                palette: PALETTE_RAINBOW,
            },
            Self::Static
            | Self::Blink
            | Self::Breath
            | Self::ColorWipe
            | Self::ColorSweep
            | Self::Dissolve
            | Self::Scanner => EffectDefaults {
                speed: DEFAULT_SPEED,
                intensity: DEFAULT_INTENSITY,
                palette: PALETTE_SOLID,
            },
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Static => EFFECT_NAME_STATIC,
            Self::Blink => EFFECT_NAME_BLINK,
            Self::Breath => EFFECT_NAME_BREATH,
            Self::ColorWipe => EFFECT_NAME_COLOR_WIPE,
            Self::ColorSweep => EFFECT_NAME_COLOR_SWEEP,
            Self::Rainbow => EFFECT_NAME_RAINBOW,
            Self::RainbowCycle => EFFECT_NAME_RAINBOW_CYCLE,
            Self::Dissolve => EFFECT_NAME_DISSOLVE,
            Self::Scanner => EFFECT_NAME_SCANNER,
            Self::Fire => EFFECT_NAME_FIRE,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == s)
    }
}

/// Effect slot - enum containing all possible effects
#[derive(Debug, Clone)]
pub enum EffectSlot {
    Static(StaticColorEffect),
    Blink(BlinkEffect),
    Breath(BreathEffect),
    ColorWipe(ColorWipeEffect),
    ColorSweep(ColorWipeEffect),
    Rainbow(RainbowEffect),
    RainbowCycle(RainbowCycleEffect),
    Dissolve(DissolveEffect),
    Scanner(ScannerEffect),
    Fire(FireEffect),
}

impl Default for EffectSlot {
    fn default() -> Self {
        Self::Static(StaticColorEffect)
    }
}

impl EffectSlot {
    /// Returns if the effect ignores the palette
    ///
    /// Derived from each effect's `Effect::PALETTE_LOCKED` constant.
    pub fn is_palette_locked(&self) -> bool {
        match self {
            Self::Static(_) => StaticColorEffect::PALETTE_LOCKED,
            Self::Blink(_) => BlinkEffect::PALETTE_LOCKED,
            Self::Breath(_) => BreathEffect::PALETTE_LOCKED,
            Self::ColorWipe(_) | Self::ColorSweep(_) => ColorWipeEffect::PALETTE_LOCKED,
            Self::Rainbow(_) => RainbowEffect::PALETTE_LOCKED,
            Self::RainbowCycle(_) => RainbowCycleEffect::PALETTE_LOCKED,
            Self::Dissolve(_) => DissolveEffect::PALETTE_LOCKED,
            Self::Scanner(_) => ScannerEffect::PALETTE_LOCKED,
            Self::Fire(_) => FireEffect::PALETTE_LOCKED,
        }
    }

    /// Render the current effect
    pub fn render(&mut self, ctx: &FrameContext, canvas: &mut Canvas<'_>) {
        match self {
            Self::Static(effect) => effect.render(ctx, canvas),
            Self::Blink(effect) => effect.render(ctx, canvas),
            Self::Breath(effect) => effect.render(ctx, canvas),
            Self::ColorWipe(effect) | Self::ColorSweep(effect) => effect.render(ctx, canvas),
            Self::Rainbow(effect) => effect.render(ctx, canvas),
            Self::RainbowCycle(effect) => effect.render(ctx, canvas),
            Self::Dissolve(effect) => effect.render(ctx, canvas),
            Self::Scanner(effect) => effect.render(ctx, canvas),
            Self::Fire(effect) => effect.render(ctx, canvas),
        }
    }

    /// Reset the effect state
    pub fn reset(&mut self) {
        match self {
            Self::Static(effect) => Effect::reset(effect),
            Self::Blink(effect) => Effect::reset(effect),
            Self::Breath(effect) => Effect::reset(effect),
            Self::ColorWipe(effect) | Self::ColorSweep(effect) => Effect::reset(effect),
            Self::Rainbow(effect) => Effect::reset(effect),
            Self::RainbowCycle(effect) => Effect::reset(effect),
            Self::Dissolve(effect) => Effect::reset(effect),
            Self::Scanner(effect) => Effect::reset(effect),
            Self::Fire(effect) => Effect::reset(effect),
        }
    }

    /// Get the effect ID for external observation
    pub fn id(&self) -> EffectId {
        match self {
            Self::Static(_) => EffectId::Static,
            Self::Blink(_) => EffectId::Blink,
            Self::Breath(_) => EffectId::Breath,
            Self::ColorWipe(_) => EffectId::ColorWipe,
            Self::ColorSweep(_) => EffectId::ColorSweep,
            Self::Rainbow(_) => EffectId::Rainbow,
            Self::RainbowCycle(_) => EffectId::RainbowCycle,
            Self::Dissolve(_) => EffectId::Dissolve,
            Self::Scanner(_) => EffectId::Scanner,
            Self::Fire(_) => EffectId::Fire,
        }
    }
}
