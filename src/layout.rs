//! Pixel buffer and channel mapping
//!
//! Translates a logical pixel index into byte offsets of the wire-order
//! buffer. The layout is resolved once into a [`ChannelOffsets`] table, so
//! pixel access never branches on the byte order.

use alloc::vec::Vec;

use crate::color::Rgb;
use crate::error::StripError;

/// Order in which the color bytes of one pixel go on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Rgb,
    Rbg,
    Grb,
    Gbr,
    Bgr,
    Brg,
}

impl ByteOrder {
    /// All supported orderings
    pub const ALL: [Self; 6] = [
        Self::Rgb,
        Self::Rbg,
        Self::Grb,
        Self::Gbr,
        Self::Bgr,
        Self::Brg,
    ];

    /// Position of (red, green, blue) inside the color bytes
    pub const fn positions(self) -> (u8, u8, u8) {
        match self {
            Self::Rgb => (0, 1, 2),
            Self::Rbg => (0, 2, 1),
            Self::Grb => (1, 0, 2),
            Self::Gbr => (2, 0, 1),
            Self::Bgr => (2, 1, 0),
            Self::Brg => (1, 2, 0),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rgb => "RGB",
            Self::Rbg => "RBG",
            Self::Grb => "GRB",
            Self::Gbr => "GBR",
            Self::Bgr => "BGR",
            Self::Brg => "BRG",
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|order| order.as_str().eq_ignore_ascii_case(s))
    }
}

/// Presence and position of the white byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhiteChannel {
    /// Plain RGB strip
    #[default]
    None,
    /// White byte after the color bytes (RGBW)
    Back,
    /// White byte before the color bytes (WRGB)
    Front,
}

/// Immutable channel layout of a strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelLayout {
    pub order: ByteOrder,
    pub white: WhiteChannel,
}

impl ChannelLayout {
    pub const fn new(order: ByteOrder, white: WhiteChannel) -> Self {
        Self { order, white }
    }

    pub const fn bytes_per_pixel(self) -> usize {
        match self.white {
            WhiteChannel::None => 3,
            WhiteChannel::Back | WhiteChannel::Front => 4,
        }
    }

    /// Resolve the layout into per-pixel byte offsets
    pub const fn offsets(self) -> ChannelOffsets {
        let (r, g, b) = self.order.positions();
        let shift = match self.white {
            WhiteChannel::Front => 1,
            WhiteChannel::None | WhiteChannel::Back => 0,
        };
        let white = match self.white {
            WhiteChannel::None => None,
            WhiteChannel::Back => Some(3),
            WhiteChannel::Front => Some(0),
        };
        ChannelOffsets {
            red: r + shift,
            green: g + shift,
            blue: b + shift,
            white,
            stride: self.bytes_per_pixel(),
        }
    }
}

/// Byte offsets of every channel inside one pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelOffsets {
    red: u8,
    green: u8,
    blue: u8,
    white: Option<u8>,
    stride: usize,
}

/// Absolute offsets of one pixel's channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelOffsets {
    /// Offsets into the color buffer
    pub red: usize,
    pub green: usize,
    pub blue: usize,
    pub white: Option<usize>,
    /// Offset into the auxiliary buffer
    pub aux: usize,
}

/// Wire-order pixel bytes plus one scratch byte per LED
#[derive(Debug)]
pub struct PixelBuffer {
    bytes: Vec<u8>,
    aux: Vec<u8>,
    offsets: ChannelOffsets,
    num_leds: usize,
}

impl PixelBuffer {
    /// Allocate a zeroed buffer for `num_leds` pixels
    pub fn new(num_leds: usize, layout: ChannelLayout) -> Result<Self, StripError> {
        let size = num_leds * layout.bytes_per_pixel();
        let bytes = zeroed(size)?;
        let aux = zeroed(num_leds)?;

        Ok(Self {
            bytes,
            aux,
            offsets: layout.offsets(),
            num_leds,
        })
    }

    pub const fn len(&self) -> usize {
        self.num_leds
    }

    pub const fn is_empty(&self) -> bool {
        self.num_leds == 0
    }

    pub const fn bytes_per_pixel(&self) -> usize {
        self.offsets.stride
    }

    pub const fn has_white(&self) -> bool {
        self.offsets.white.is_some()
    }

    /// Raw wire-order bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Bytes allocated for color and auxiliary data
    pub fn allocated_bytes(&self) -> usize {
        self.bytes.capacity() + self.aux.capacity()
    }

    /// Channel offsets of the pixel at `index`
    ///
    /// `index` must be below [`Self::len`].
    #[inline]
    pub fn offsets(&self, index: usize) -> PixelOffsets {
        debug_assert!(index < self.num_leds, "pixel index out of range");
        let base = index * self.offsets.stride;
        PixelOffsets {
            red: base + usize::from(self.offsets.red),
            green: base + usize::from(self.offsets.green),
            blue: base + usize::from(self.offsets.blue),
            white: self.offsets.white.map(|w| base + usize::from(w)),
            aux: index,
        }
    }

    /// Mutable view of the pixel at `index`
    #[inline]
    pub fn pixel(&mut self, index: usize) -> PixelView<'_> {
        let offsets = self.offsets(index);
        PixelView {
            bytes: &mut self.bytes,
            aux: &mut self.aux,
            offsets,
        }
    }

    /// Color of the pixel at `index`
    #[inline]
    pub fn color(&self, index: usize) -> Rgb {
        let o = self.offsets(index);
        Rgb {
            r: self.bytes[o.red],
            g: self.bytes[o.green],
            b: self.bytes[o.blue],
        }
    }

    /// White level of the pixel at `index` (0 without a white channel)
    #[inline]
    pub fn white(&self, index: usize) -> u8 {
        self.offsets(index).white.map_or(0, |w| self.bytes[w])
    }

    #[inline]
    pub fn aux(&self, index: usize) -> u8 {
        self.aux[index]
    }

    /// Set every pixel to black
    pub fn fill_black(&mut self) {
        self.bytes.fill(0);
    }

    /// Reset every auxiliary byte
    pub fn clear_effect_data(&mut self) {
        self.aux.fill(0);
    }
}

/// Mutable access to one pixel's channels
pub struct PixelView<'a> {
    bytes: &'a mut [u8],
    aux: &'a mut [u8],
    offsets: PixelOffsets,
}

impl PixelView<'_> {
    pub const fn offsets(&self) -> PixelOffsets {
        self.offsets
    }

    pub fn get(&self) -> Rgb {
        Rgb {
            r: self.bytes[self.offsets.red],
            g: self.bytes[self.offsets.green],
            b: self.bytes[self.offsets.blue],
        }
    }

    pub fn set(&mut self, color: Rgb) {
        self.bytes[self.offsets.red] = color.r;
        self.bytes[self.offsets.green] = color.g;
        self.bytes[self.offsets.blue] = color.b;
    }

    pub fn white(&self) -> u8 {
        self.offsets.white.map_or(0, |w| self.bytes[w])
    }

    /// Set the white byte; ignored on RGB strips
    pub fn set_white(&mut self, white: u8) {
        if let Some(w) = self.offsets.white {
            self.bytes[w] = white;
        }
    }

    pub fn aux(&self) -> u8 {
        self.aux[self.offsets.aux]
    }

    pub fn set_aux(&mut self, value: u8) {
        self.aux[self.offsets.aux] = value;
    }
}

fn zeroed(size: usize) -> Result<Vec<u8>, StripError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(size)
        .map_err(|_| StripError::AllocationFailure { bytes: size })?;
    buf.resize(size, 0);
    Ok(buf)
}
