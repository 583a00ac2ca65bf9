//! Brightness envelope
//!
//! The transmit path sends raw buffer bytes, so the user brightness is
//! applied here, after the effect and the transition have drawn the frame.
//! Also provides the power-on ramp used when no intro is configured.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use super::Filter;
use crate::layout::PixelBuffer;
use crate::math8::{U8Adjuster, scale8};
use crate::transition::ValueTransition;

/// Output range the user brightness is mapped into
#[derive(Debug, Clone, Copy)]
pub struct BrightnessRange {
    /// Lowest non-zero output brightness
    pub min_brightness: u8,
    /// Scale factor (0-255 = 0.0-1.0)
    pub scale: u8,
    /// Optional perceptual correction
    pub adjust: Option<U8Adjuster>,
}

impl Default for BrightnessRange {
    fn default() -> Self {
        Self {
            min_brightness: 0,
            scale: 255,
            adjust: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BrightnessFilter {
    range: BrightnessRange,
    brightness: ValueTransition<u8>,
}

impl BrightnessFilter {
    pub const fn new(brightness: u8, range: BrightnessRange) -> Self {
        Self {
            range,
            brightness: ValueTransition::new_u8(brightness),
        }
    }

    pub fn set_range(&mut self, range: BrightnessRange) {
        self.range = range;
    }

    /// Move to `brightness`, mapped into the configured range
    pub fn set(&mut self, brightness: u8, duration: Duration, now: Instant) {
        let corrected = if brightness == 0 {
            0
        } else {
            let span = 255 - self.range.min_brightness;
            scale8(scale8(brightness, self.range.scale), span).saturating_add(self.range.min_brightness)
        };
        #[cfg(feature = "esp32-log")]
        println!(
            "[BrightnessFilter.set] setting brightness to {:?} ({:?})",
            brightness, corrected
        );
        self.brightness.set(corrected, duration, now);
    }

    /// Move to `brightness` as is
    pub fn set_uncorrected(&mut self, brightness: u8, duration: Duration, now: Instant) {
        self.brightness.set(brightness, duration, now);
    }

    /// Current output brightness
    pub const fn current(&self) -> u8 {
        self.brightness.current()
    }

    pub const fn is_transitioning(&self) -> bool {
        self.brightness.is_transitioning()
    }
}

impl Filter for BrightnessFilter {
    fn apply(&mut self, frame: &mut PixelBuffer) {
        let mut current = self.brightness.current();
        if current == 255 {
            return;
        }
        if current == 0 {
            frame.fill_black();
            return;
        }
        if let Some(adjust) = self.range.adjust {
            current = adjust(current);
        }

        for byte in frame.as_bytes_mut() {
            *byte = scale8(*byte, current);
        }
    }

    fn tick(&mut self, now: Instant) {
        self.brightness.tick(now);
    }
}
