use embassy_time::Duration;

/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// Uses integer math for efficiency on embedded systems.
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Blend two 8-bit values
#[inline]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub const fn blend8(a: u8, b: u8, amount_of_b: u8) -> u8 {
    let delta = b as i16 - a as i16;

    let mut partial: u32 = (a as u32) << 16; // a * 65536
    partial = partial.wrapping_add(
        (delta as u32)
            .wrapping_mul(amount_of_b as u32)
            .wrapping_mul(257),
    ); // (b - a) * amount_of_b * 257
    partial = partial.wrapping_add(0x8000); // + 32768 for rounding

    (partial >> 16) as u8
}

/// Saturating 8-bit add
#[inline]
pub const fn qadd8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Saturating 8-bit subtract
#[inline]
pub const fn qsub8(a: u8, b: u8) -> u8 {
    a.saturating_sub(b)
}

/// Calculate progress (0-255) based on elapsed time and duration
#[allow(clippy::cast_possible_truncation)]
#[inline]
pub const fn progress8(elapsed: Duration, duration: Duration) -> u8 {
    if duration.as_millis() == 0 {
        return 255;
    }
    if elapsed.as_millis() >= duration.as_millis() {
        return 255;
    }

    ((elapsed.as_millis() * 255) / duration.as_millis()) as u8
}

/// Triangle wave: 0 → 254 → 0 over one 0-255 input period
#[inline]
pub const fn triwave8(i: u8) -> u8 {
    let j = if i & 0x80 != 0 { 255 - i } else { i };
    j << 1
}

/// Ease in out quadratic
pub const fn ease_in_out_quad(i: u8) -> u8 {
    let j = if i & 0x80 != 0 { 255 - i } else { i };
    let jj = scale8(j, j);
    let jj2 = jj << 1;
    if i & 0x80 == 0 { jj2 } else { 255 - jj2 }
}

/// Quadratic-eased triangle wave, a cheap sine approximation
#[inline]
pub const fn quadwave8(i: u8) -> u8 {
    ease_in_out_quad(triwave8(i))
}

/// Sine wave mapped to 0-255 for a 0-255 phase
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn sin8(phase: u8) -> u8 {
    let radians = f32::from(phase) * (core::f32::consts::TAU / 256.0);
    let value = (libm::sinf(radians) + 1.0) * 127.5;
    libm::roundf(value).clamp(0.0, 255.0) as u8
}

/// Integer avalanche hash used for stable per-pixel thresholds
#[inline]
pub const fn hash32(x: u32) -> u32 {
    let mut h = x;
    h = ((h >> 16) ^ h).wrapping_mul(0x045d_9f3b);
    h = ((h >> 16) ^ h).wrapping_mul(0x045d_9f3b);
    (h >> 16) ^ h
}

/// Small xorshift generator for effects that need randomness
///
/// Deterministic for a given seed, so effect output is reproducible.
#[derive(Debug, Clone, Copy)]
pub struct Prng {
    state: u32,
}

impl Prng {
    pub const fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x2545_f491 } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn next_u8(&mut self) -> u8 {
        (self.next_u32() >> 24) as u8
    }

    /// Random value in `0..upper` (returns 0 when `upper` is 0)
    #[allow(clippy::cast_possible_truncation)]
    pub fn below(&mut self, upper: u16) -> u16 {
        if upper == 0 {
            return 0;
        }
        ((u32::from(self.next_u32() as u16) * u32::from(upper)) >> 16) as u16
    }

    /// Random value in `low..high`
    pub fn range8(&mut self, low: u8, high: u8) -> u8 {
        if high <= low {
            return low;
        }
        #[allow(clippy::cast_possible_truncation)]
        let span = self.below(u16::from(high - low)) as u8;
        low + span
    }
}

/// Type alias for a function that adjusts a u8 value
pub type U8Adjuster = fn(value: u8) -> u8;
