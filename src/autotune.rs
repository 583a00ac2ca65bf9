//! Autotune: snap effect parameters to curated defaults
//!
//! While autotune is enabled, activating an effect sets speed, intensity and
//! palette to the values curated for that effect. Any later change that
//! diverges from those values counts as manual control and turns autotune off
//! until it is enabled again.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::effect::EffectId;
use crate::engine::SegmentParams;

/// Whether the autotune control exists at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutotuneMode {
    /// Autotune can be toggled and tracks manual changes
    #[default]
    Available,
    /// Defaults seed the parameters once and are never re-applied
    Unavailable,
}

/// Explicit per-effect parameters that take precedence over curated defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EffectPresets {
    pub speed: Option<u8>,
    pub intensity: Option<u8>,
    pub palette: Option<u8>,
    pub mirror: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Expected {
    speed: u8,
    intensity: u8,
    palette: u8,
}

impl Expected {
    const fn of(params: &SegmentParams) -> Self {
        Self {
            speed: params.speed,
            intensity: params.intensity,
            palette: params.palette,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AutotuneResolver {
    mode: AutotuneMode,
    /// Values set by the last snap, compared against on every change
    expected: Option<Expected>,
    seeded: bool,
}

impl AutotuneResolver {
    pub const fn new(mode: AutotuneMode) -> Self {
        Self {
            mode,
            expected: None,
            seeded: false,
        }
    }

    pub const fn mode(&self) -> AutotuneMode {
        self.mode
    }

    /// Resolve parameters for a freshly activated effect
    ///
    /// Presets always apply. Curated defaults fill the remaining parameters
    /// when autotune is enabled, or once on the first activation when the
    /// autotune control is unavailable.
    pub fn activate(&mut self, effect: EffectId, presets: &EffectPresets, params: &mut SegmentParams) {
        if let Some(mirror) = presets.mirror {
            params.mirror = mirror;
        }

        let snap = match self.mode {
            AutotuneMode::Available => params.autotune,
            AutotuneMode::Unavailable => !self.seeded,
        };
        if snap {
            self.snap(effect, presets, params);
            self.seeded = true;
        } else {
            apply_presets(presets, params);
        }
    }

    /// Check parameters after an external change
    ///
    /// Returns `true` when the change disabled autotune.
    pub fn observe(&mut self, params: &mut SegmentParams) -> bool {
        if self.mode == AutotuneMode::Unavailable || !params.autotune {
            return false;
        }
        let Some(expected) = self.expected else {
            return false;
        };
        if expected == Expected::of(params) {
            return false;
        }

        #[cfg(feature = "esp32-log")]
        println!("[AutotuneResolver.observe] manual change detected, autotune disabled");
        params.autotune = false;
        self.expected = None;
        true
    }

    /// Toggle autotune, re-snapping when it is turned back on
    pub fn set_enabled(
        &mut self,
        enabled: bool,
        effect: EffectId,
        presets: &EffectPresets,
        params: &mut SegmentParams,
    ) {
        if self.mode == AutotuneMode::Unavailable {
            return;
        }
        let was_enabled = params.autotune;
        params.autotune = enabled;
        if !enabled {
            self.expected = None;
        } else if !was_enabled || self.expected.is_none() {
            #[cfg(feature = "esp32-log")]
            println!("[AutotuneResolver.set_enabled] autotune enabled, snapping {}", effect.as_str());
            self.snap(effect, presets, params);
        }
    }

    fn snap(&mut self, effect: EffectId, presets: &EffectPresets, params: &mut SegmentParams) {
        let defaults = effect.defaults();
        params.speed = presets.speed.unwrap_or(defaults.speed);
        params.intensity = presets.intensity.unwrap_or(defaults.intensity);
        params.palette = presets.palette.unwrap_or(defaults.palette);
        self.expected = Some(Expected::of(params));
    }
}

fn apply_presets(presets: &EffectPresets, params: &mut SegmentParams) {
    if let Some(speed) = presets.speed {
        params.speed = speed;
    }
    if let Some(intensity) = presets.intensity {
        params.intensity = intensity;
    }
    if let Some(palette) = presets.palette {
        params.palette = palette;
    }
}
