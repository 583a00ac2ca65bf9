//! Effect engine
//!
//! Holds the segment parameters and the active effect, and renders it into
//! the pixel buffer once per frame.

use embassy_time::{Duration, Instant};
#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::autotune::{AutotuneMode, AutotuneResolver, EffectPresets};
use crate::bounds::SegmentBounds;
use crate::canvas::Canvas;
use crate::color::{Rgb, WHITE};
use crate::effect::{DEFAULT_INTENSITY, DEFAULT_SPEED, EffectId, EffectSlot, FrameContext};
use crate::layout::PixelBuffer;
use crate::palette::{PALETTE_DEFAULT, ResolvedPalette};

/// Parameters shared by every LED of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentParams {
    /// Raw effect id, unknown ids render as static
    pub effect: u8,
    pub speed: u8,
    pub intensity: u8,
    pub palette: u8,
    pub mirror: bool,
    pub autotune: bool,
    pub color: Rgb,
    /// White channel level on RGBW strips
    pub white: u8,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            effect: EffectId::Static as u8,
            speed: DEFAULT_SPEED,
            intensity: DEFAULT_INTENSITY,
            palette: PALETTE_DEFAULT,
            mirror: false,
            autotune: true,
            color: WHITE,
            white: 0,
        }
    }
}

/// Configuration for the effect engine
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    pub params: SegmentParams,
    /// Segment bounds, whole strip when unset
    pub bounds: Option<SegmentBounds>,
    pub autotune: AutotuneMode,
    pub presets: EffectPresets,
}

pub struct EffectEngine {
    params: SegmentParams,
    presets: EffectPresets,
    bounds: Option<SegmentBounds>,
    slot: EffectSlot,
    autotune: AutotuneResolver,
    last_render: Option<Instant>,
    call: u32,
    /// Auxiliary bytes belong to the previous effect
    clear_pending: bool,
}

impl EffectEngine {
    pub fn new(config: &EngineConfig) -> Self {
        let id = EffectId::from_raw_or_static(config.params.effect);
        let mut engine = Self {
            params: config.params,
            presets: config.presets,
            bounds: config.bounds,
            slot: id.to_slot(),
            autotune: AutotuneResolver::new(config.autotune),
            last_render: None,
            call: 0,
            clear_pending: true,
        };
        engine
            .autotune
            .activate(id, &engine.presets, &mut engine.params);
        engine
    }

    pub const fn params(&self) -> &SegmentParams {
        &self.params
    }

    pub fn effect_id(&self) -> EffectId {
        self.slot.id()
    }

    pub const fn bounds(&self) -> Option<SegmentBounds> {
        self.bounds
    }

    /// Move the segment
    ///
    /// A change restarts the active effect with cleared auxiliary bytes, since
    /// its state describes the old geometry.
    pub fn set_bounds(&mut self, bounds: Option<SegmentBounds>) {
        if bounds == self.bounds {
            return;
        }
        self.bounds = bounds;
        self.slot.reset();
        self.clear_pending = true;
    }

    /// Segment bounds resolved against a strip of `len` LEDs
    pub fn segment(&self, len: usize) -> SegmentBounds {
        self.bounds
            .unwrap_or(SegmentBounds::full(len))
            .clamped(len)
    }

    /// Presets used by the next activation
    pub fn set_presets(&mut self, presets: EffectPresets) {
        self.presets = presets;
    }

    /// Activate an effect by raw id
    ///
    /// Switching to a different effect clears the auxiliary bytes before its
    /// first frame; re-activating the current effect keeps them.
    pub fn activate(&mut self, effect: u8) {
        let id = EffectId::from_raw_or_static(effect);
        self.params.effect = effect;
        if id != self.slot.id() {
            #[cfg(feature = "esp32-log")]
            println!("[EffectEngine.activate] switching to {}", id.as_str());
            self.slot = id.to_slot();
            self.clear_pending = true;
            self.call = 0;
            self.last_render = None;
        }
        self.autotune.activate(id, &self.presets, &mut self.params);
    }

    pub fn set_speed(&mut self, speed: u8) {
        self.params.speed = speed;
        self.autotune.observe(&mut self.params);
    }

    pub fn set_intensity(&mut self, intensity: u8) {
        self.params.intensity = intensity;
        self.autotune.observe(&mut self.params);
    }

    pub fn set_palette(&mut self, palette: u8) {
        self.params.palette = palette;
        self.autotune.observe(&mut self.params);
    }

    pub fn set_mirror(&mut self, mirror: bool) {
        self.params.mirror = mirror;
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.params.color = color;
    }

    pub fn set_white(&mut self, white: u8) {
        self.params.white = white;
    }

    pub fn set_autotune(&mut self, enabled: bool) {
        let id = self.slot.id();
        self.autotune
            .set_enabled(enabled, id, &self.presets, &mut self.params);
    }

    /// Palette the active effect sees this frame
    pub fn palette(&self) -> ResolvedPalette {
        let defaults = self.slot.id().defaults();
        let id = if self.slot.is_palette_locked() {
            defaults.palette
        } else {
            self.params.palette
        };
        ResolvedPalette::resolve(id, defaults.palette, self.params.color)
    }

    /// Render the active effect into its segment of `pixels`
    pub fn render(&mut self, now: Instant, pixels: &mut PixelBuffer) {
        if self.clear_pending {
            pixels.clear_effect_data();
            self.clear_pending = false;
        }

        let frame_time = self
            .last_render
            .map_or(Duration::from_millis(0), |last| now.saturating_duration_since(last));
        let ctx = FrameContext {
            now,
            frame_time,
            call: self.call,
            speed: self.params.speed,
            intensity: self.params.intensity,
            palette: self.palette(),
            color: self.params.color,
        };

        let segment = self.segment(pixels.len());
        let mut canvas = Canvas::new(pixels, segment, self.params.mirror);
        self.slot.render(&ctx, &mut canvas);
        canvas.fill_white(self.params.white);

        self.last_render = Some(now);
        self.call = self.call.wrapping_add(1);
    }
}
