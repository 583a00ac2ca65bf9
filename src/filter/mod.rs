//! Output filters applied to a rendered frame before transmission

use embassy_time::Instant;

use crate::layout::PixelBuffer;

mod brightness;

pub use brightness::{BrightnessFilter, BrightnessRange};

pub trait Filter {
    /// Apply the filter to a frame
    fn apply(&mut self, frame: &mut PixelBuffer);

    fn tick(&mut self, _now: Instant) {}
}
