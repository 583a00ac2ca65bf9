//! Per-chipset pulse timings
//!
//! Nanosecond timing constants are converted to transmit symbols once, from
//! the tick resolution of the transmit peripheral.

use crate::layout::{ByteOrder, WhiteChannel};

/// Largest value the 15-bit symbol duration field can hold
pub const MAX_SYMBOL_DURATION: u16 = 0x7FFF;

const CHIPSET_ID_WS2812X: u8 = 0;
const CHIPSET_ID_WS2813: u8 = 1;
const CHIPSET_ID_SK6812: u8 = 2;
const CHIPSET_ID_WS2811: u8 = 3;

/// Supported single-wire LED driver families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Chipset {
    /// WS2812B / WS2812C and compatible clones
    #[default]
    Ws2812x = CHIPSET_ID_WS2812X,
    Ws2813 = CHIPSET_ID_WS2813,
    Sk6812 = CHIPSET_ID_SK6812,
    Ws2811 = CHIPSET_ID_WS2811,
}

/// Pulse widths of one chipset in nanoseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseProfile {
    pub t0h: u32,
    pub t0l: u32,
    pub t1h: u32,
    pub t1l: u32,
    pub reset: u32,
}

const PROFILE_WS2812X: PulseProfile = PulseProfile {
    t0h: 400,
    t0l: 850,
    t1h: 800,
    t1l: 450,
    reset: 280_000,
};

const PROFILE_SK6812: PulseProfile = PulseProfile {
    t0h: 300,
    t0l: 900,
    t1h: 600,
    t1l: 600,
    reset: 80_000,
};

const PROFILE_WS2811: PulseProfile = PulseProfile {
    t0h: 500,
    t0l: 2000,
    t1h: 1200,
    t1l: 1300,
    reset: 280_000,
};

impl Chipset {
    /// Map a raw id, falling back to the WS2812X profile
    pub const fn from_raw(value: u8) -> Self {
        match value {
            CHIPSET_ID_WS2813 => Self::Ws2813,
            CHIPSET_ID_SK6812 => Self::Sk6812,
            CHIPSET_ID_WS2811 => Self::Ws2811,
            _ => Self::Ws2812x,
        }
    }

    /// Parse a chipset name, falling back to the WS2812X profile
    pub fn from_name(name: &str) -> Self {
        const NAMES: [(&str, Chipset); 7] = [
            ("WS2812X", Chipset::Ws2812x),
            ("WS2812", Chipset::Ws2812x),
            ("WS2812B", Chipset::Ws2812x),
            ("WS2812C", Chipset::Ws2812x),
            ("WS2813", Chipset::Ws2813),
            ("SK6812", Chipset::Sk6812),
            ("WS2811", Chipset::Ws2811),
        ];
        NAMES
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map_or(Self::Ws2812x, |(_, chipset)| *chipset)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ws2812x => "WS2812X",
            Self::Ws2813 => "WS2813",
            Self::Sk6812 => "SK6812",
            Self::Ws2811 => "WS2811",
        }
    }

    pub const fn profile(self) -> PulseProfile {
        match self {
            Self::Ws2812x | Self::Ws2813 => PROFILE_WS2812X,
            Self::Sk6812 => PROFILE_SK6812,
            Self::Ws2811 => PROFILE_WS2811,
        }
    }

    /// Byte order used when the configuration leaves it unset
    pub const fn default_order(self) -> ByteOrder {
        match self {
            Self::Ws2811 => ByteOrder::Rgb,
            Self::Ws2812x | Self::Ws2813 | Self::Sk6812 => ByteOrder::Grb,
        }
    }

    /// White channel used when the configuration leaves it unset
    pub const fn default_white(self) -> WhiteChannel {
        match self {
            Self::Sk6812 => WhiteChannel::Back,
            Self::Ws2812x | Self::Ws2813 | Self::Ws2811 => WhiteChannel::None,
        }
    }
}

/// One transmit unit: two (duration, level) halves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Symbol {
    pub duration0: u16,
    pub level0: bool,
    pub duration1: u16,
    pub level1: bool,
}

impl Symbol {
    pub const ZERO: Self = Self {
        duration0: 0,
        level0: false,
        duration1: 0,
        level1: false,
    };

    /// Symbol with durations clamped to the 15-bit field
    pub const fn new(duration0: u32, level0: bool, duration1: u32, level1: bool) -> Self {
        Self {
            duration0: clamp_duration(duration0),
            level0,
            duration1: clamp_duration(duration1),
            level1,
        }
    }

    pub const fn is_zero(self) -> bool {
        self.duration0 == 0 && self.duration1 == 0 && !self.level0 && !self.level1
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn clamp_duration(ticks: u32) -> u16 {
    if ticks > MAX_SYMBOL_DURATION as u32 {
        MAX_SYMBOL_DURATION
    } else {
        ticks as u16
    }
}

/// Symbols for a zero bit, a one bit and the end-of-frame reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedTimings {
    pub bit0: Symbol,
    pub bit1: Symbol,
    pub reset: Symbol,
}

impl LedTimings {
    /// Convert the chipset profile to ticks of a `resolution_hz` clock
    pub fn for_chipset(chipset: Chipset, resolution_hz: u32) -> Self {
        Self::from_profile(chipset.profile(), resolution_hz)
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn from_profile(profile: PulseProfile, resolution_hz: u32) -> Self {
        let ratio = f64::from(resolution_hz) / 1e9;
        let ticks = |ns: u32| (ratio * f64::from(ns)) as u32;

        Self {
            bit0: Symbol::new(ticks(profile.t0h), true, ticks(profile.t0l), false),
            bit1: Symbol::new(ticks(profile.t1h), true, ticks(profile.t1l), false),
            reset: Symbol::new(ticks(profile.reset), false, 0, false),
        }
    }

    /// Symbol for one data bit
    #[inline]
    pub const fn bit(&self, set: bool) -> Symbol {
        if set { self.bit1 } else { self.bit0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws2812x_at_ten_megahertz() {
        let timings = LedTimings::for_chipset(Chipset::Ws2812x, 10_000_000);
        assert_eq!(timings.bit0, Symbol::new(4, true, 8, false));
        assert_eq!(timings.bit1, Symbol::new(8, true, 4, false));
        assert_eq!(timings.reset.duration0, 2800);
        assert_eq!(timings.reset.duration1, 0);
    }

    #[test]
    fn reset_is_clamped_to_symbol_field() {
        let timings = LedTimings::for_chipset(Chipset::Ws2811, 1_000_000_000);
        assert_eq!(timings.reset.duration0, MAX_SYMBOL_DURATION);
    }

    #[test]
    fn unknown_chipset_falls_back() {
        assert_eq!(Chipset::from_name("APA102"), Chipset::Ws2812x);
        assert_eq!(Chipset::from_raw(200), Chipset::Ws2812x);
        assert_eq!(Chipset::from_name("sk6812"), Chipset::Sk6812);
    }
}
