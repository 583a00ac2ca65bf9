//! Built-in 16-entry palettes
//!
//! A palette maps an 8-bit index to a color by linear interpolation between
//! sixteen entries. The upper nibble selects the entry, the lower nibble the
//! blend toward the next one; the last entry wraps to the first.

use crate::color::{Rgb, blend_colors, rgb_from_u32, scale_color};

/// Palette id asking for the active effect's own default
pub const PALETTE_DEFAULT: u8 = 0;
/// Palette id painting with the segment color
pub const PALETTE_SOLID: u8 = 255;
/// Selector position of the solid palette
const PALETTE_SOLID_SELECTOR: u8 = 21;

pub const PALETTE_AURORA: u8 = 1;
pub const PALETTE_FOREST: u8 = 2;
pub const PALETTE_OCEAN: u8 = 3;
pub const PALETTE_RAINBOW: u8 = 4;
pub const PALETTE_FIRE: u8 = 5;
pub const PALETTE_SUNSET: u8 = 6;
pub const PALETTE_ICE: u8 = 7;
pub const PALETTE_PARTY: u8 = 8;
pub const PALETTE_LAVA: u8 = 9;
pub const PALETTE_PASTEL: u8 = 10;
pub const PALETTE_PACIFICA: u8 = 11;
pub const PALETTE_HEAT: u8 = 12;

pub type PaletteTable = [Rgb; 16];

macro_rules! hex_palette {
    ($($color:expr),*) => {
        [
            $(rgb_from_u32($color)),*
        ]
    };
}

#[allow(clippy::unreadable_literal)]
const AURORA: PaletteTable = hex_palette![
    0x00FF1E, 0x00FF1E, 0x00FF1E, 0x00FF1E, 0x00FF1E, 0x00FF1E, 0x00FF1E, 0x00FF28, 0x00FF3C,
    0x00FF5A, 0x00FF82, 0x00FFB4, 0x00FFDC, 0x32FFFF, 0x64FFFF, 0x96FFFF
];

#[allow(clippy::unreadable_literal)]
const FOREST: PaletteTable = hex_palette![
    0x003200, 0x005014, 0x006400, 0x147814, 0x009600, 0x32B41E, 0x50C832, 0x649600, 0x967800,
    0x646400, 0x32B41E, 0x009600, 0x007814, 0x006400, 0x005014, 0x003C0A
];

#[allow(clippy::unreadable_literal)]
const OCEAN: PaletteTable = hex_palette![
    0x000032, 0x000050, 0x001464, 0x003296, 0x0050C8, 0x0078DC, 0x0096FF, 0x32C8FF, 0x64DCFF,
    0x96F0FF, 0x64DCFF, 0x32C8FF, 0x0096FF, 0x0064C8, 0x003296, 0x001464
];

#[allow(clippy::unreadable_literal)]
const RAINBOW: PaletteTable = hex_palette![
    0xFF0000, 0xFF5000, 0xFF9600, 0xFFFF00, 0x96FF00, 0x00FF00, 0x00FF96, 0x00FFFF, 0x0096FF,
    0x0000FF, 0x5000FF, 0x9600FF, 0xFF00FF, 0xFF0096, 0xFF0050, 0xFF0000
];

#[allow(clippy::unreadable_literal)]
const FIRE: PaletteTable = hex_palette![
    0x320000, 0x640000, 0x960000, 0xC80000, 0xFF0000, 0xFF3200, 0xFF6400, 0xFF9600, 0xFFC800,
    0xFFFF00, 0xFFFF64, 0xFFC800, 0xFF9600, 0xFF6400, 0xFF3200, 0xC80000
];

#[allow(clippy::unreadable_literal)]
const SUNSET: PaletteTable = hex_palette![
    0x780082, 0xB40078, 0xDC143C, 0xFF3C28, 0xFF6414, 0xFF8C00, 0xFFB400, 0xFFDC64, 0xFFB400,
    0xFF8C00, 0xFF6414, 0xFF3C28, 0xDC143C, 0xB40078, 0x8C008C, 0x780082
];

#[allow(clippy::unreadable_literal)]
const ICE: PaletteTable = hex_palette![
    0xC8F0FF, 0xB4DCFF, 0x96C8FF, 0x78B4FF, 0x64A0FF, 0x508CFF, 0xC8F0FF, 0xDCFAFF, 0xFFFFFF,
    0xDCFAFF, 0xC8F0FF, 0xB4DCFF, 0x96C8FF, 0x78B4FF, 0xB4DCFF, 0xC8F0FF
];

#[allow(clippy::unreadable_literal)]
const PARTY: PaletteTable = hex_palette![
    0xFF00FF, 0xFF0000, 0xFF8000, 0xFFFF00, 0x00FF00, 0x00FFFF, 0x0080FF, 0x8000FF, 0xFF0080,
    0xFF0000, 0xFFC800, 0x00FF80, 0x00C8FF, 0xC800FF, 0xFF00C8, 0xFF6400
];

#[allow(clippy::unreadable_literal)]
const LAVA: PaletteTable = hex_palette![
    0x000000, 0x320000, 0x640000, 0x960000, 0xC80000, 0xFF1400, 0xFF3C00, 0xFF6400, 0xFF8C00,
    0xFFB400, 0xFFDC00, 0xFFFF64, 0xFFDC00, 0xFF8C00, 0xFF3C00, 0x960000
];

#[allow(clippy::unreadable_literal)]
const PASTEL: PaletteTable = hex_palette![
    0xFFB4B4, 0xFFC896, 0xFFFFB4, 0xC8FFB4, 0xB4FFC8, 0xB4E6FF, 0xC8B4FF, 0xFFB4F0, 0xFFC8C8,
    0xFFE6B4, 0xE6FFB4, 0xB4FFE6, 0xB4C8FF, 0xE6B4FF, 0xFFB4DC, 0xFFBEBE
];

#[allow(clippy::unreadable_literal)]
const PACIFICA: PaletteTable = hex_palette![
    0x000212, 0x000F1E, 0x001937, 0x002850, 0x004678, 0x0064B4, 0x148CF0, 0x28C8FF, 0x50DCFF,
    0x96E6FF, 0xC8F0FF, 0xC8F0FF, 0x96E6FF, 0x28C8FF, 0x004678, 0x000212
];

#[allow(clippy::unreadable_literal)]
const HEAT: PaletteTable = hex_palette![
    0x000000, 0x330000, 0x660000, 0x990000, 0xCC0000, 0xFF0000, 0xFF3300, 0xFF6600, 0xFF9900,
    0xFFCC00, 0xFFFF00, 0xFFFF33, 0xFFFF66, 0xFFFF99, 0xFFFFCC, 0xFFFFFF
];

/// Table for a palette id; unknown ids fall back to the rainbow
pub const fn table(id: u8) -> &'static PaletteTable {
    match id {
        PALETTE_AURORA => &AURORA,
        PALETTE_FOREST => &FOREST,
        PALETTE_OCEAN => &OCEAN,
        PALETTE_FIRE => &FIRE,
        PALETTE_SUNSET => &SUNSET,
        PALETTE_ICE => &ICE,
        PALETTE_PARTY => &PARTY,
        PALETTE_LAVA => &LAVA,
        PALETTE_PASTEL => &PASTEL,
        PALETTE_PACIFICA => &PACIFICA,
        PALETTE_HEAT => &HEAT,
        _ => &RAINBOW,
    }
}

/// Palette as seen by an effect for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedPalette {
    Table(&'static PaletteTable),
    /// Every index maps to the segment color
    Solid(Rgb),
}

impl ResolvedPalette {
    /// Resolve a palette id against the effect default and segment color
    ///
    /// `effect_default` is consulted when `id` is [`PALETTE_DEFAULT`]; a
    /// default of [`PALETTE_DEFAULT`] itself means solid color.
    pub const fn resolve(id: u8, effect_default: u8, color: Rgb) -> Self {
        let id = if id == PALETTE_DEFAULT { effect_default } else { id };
        match id {
            PALETTE_DEFAULT | PALETTE_SOLID | PALETTE_SOLID_SELECTOR => Self::Solid(color),
            _ => Self::Table(table(id)),
        }
    }

    pub const fn is_solid(&self) -> bool {
        matches!(self, Self::Solid(_))
    }

    /// Interpolated color at `index`, scaled by `brightness`
    pub fn color_at(&self, index: u8, brightness: u8) -> Rgb {
        let color = match self {
            Self::Solid(color) => *color,
            Self::Table(entries) => {
                let entry = usize::from(index >> 4);
                let fraction = (index & 0x0F) << 4;
                blend_colors(entries[entry], entries[(entry + 1) & 15], fraction)
            }
        };
        if brightness == 255 {
            color
        } else {
            scale_color(color, brightness)
        }
    }
}
