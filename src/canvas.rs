//! Segment view handed to effects
//!
//! Effects address pixels by logical index `0..len`. The canvas maps that to
//! the physical strip index, reflecting it when the segment is mirrored, so
//! mirroring needs no support from the effects themselves.

use crate::bounds::SegmentBounds;
use crate::color::Rgb;
use crate::layout::PixelBuffer;
use crate::math8::scale8;

pub struct Canvas<'a> {
    pixels: &'a mut PixelBuffer,
    bounds: SegmentBounds,
    mirror: bool,
}

impl<'a> Canvas<'a> {
    /// View over `bounds` of `pixels`, clamped to the strip length
    pub fn new(pixels: &'a mut PixelBuffer, bounds: SegmentBounds, mirror: bool) -> Self {
        let bounds = bounds.clamped(pixels.len());
        Self {
            pixels,
            bounds,
            mirror,
        }
    }

    pub const fn len(&self) -> usize {
        self.bounds.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    pub const fn is_mirrored(&self) -> bool {
        self.mirror
    }

    pub const fn has_white(&self) -> bool {
        self.pixels.has_white()
    }

    /// Physical strip index of logical index `i`
    #[inline]
    pub const fn physical(&self, i: usize) -> usize {
        if self.mirror {
            self.bounds.start + self.bounds.len() - 1 - i
        } else {
            self.bounds.start + i
        }
    }

    #[inline]
    pub fn get(&self, i: usize) -> Rgb {
        self.pixels.color(self.physical(i))
    }

    #[inline]
    pub fn set(&mut self, i: usize, color: Rgb) {
        let index = self.physical(i);
        self.pixels.pixel(index).set(color);
    }

    #[inline]
    pub fn white(&self, i: usize) -> u8 {
        self.pixels.white(self.physical(i))
    }

    #[inline]
    pub fn set_white(&mut self, i: usize, white: u8) {
        let index = self.physical(i);
        self.pixels.pixel(index).set_white(white);
    }

    #[inline]
    pub fn aux(&self, i: usize) -> u8 {
        self.pixels.aux(self.physical(i))
    }

    #[inline]
    pub fn set_aux(&mut self, i: usize, value: u8) {
        let index = self.physical(i);
        self.pixels.pixel(index).set_aux(value);
    }

    pub fn fill(&mut self, color: Rgb) {
        for i in 0..self.len() {
            self.set(i, color);
        }
    }

    /// Fill the white byte of every pixel; no-op on RGB strips
    pub fn fill_white(&mut self, white: u8) {
        if !self.has_white() {
            return;
        }
        for i in 0..self.len() {
            self.set_white(i, white);
        }
    }

    /// Dim every pixel by `amount` (255 = black)
    pub fn fade_to_black_by(&mut self, amount: u8) {
        let keep = 255 - amount;
        for i in 0..self.len() {
            let color = self.get(i);
            self.set(
                i,
                Rgb {
                    r: scale8(color.r, keep),
                    g: scale8(color.g, keep),
                    b: scale8(color.b, keep),
                },
            );
        }
    }
}
