mod utils;

use smart_leds::{RGB8, hsv::Hsv as HSV};
pub use utils::{blend_colors, hsv2rgb, rgb_from_u32, scale_color};

pub type Rgb = RGB8;
pub type Hsv = HSV;

/// Fully off pixel
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

/// Fully on pixel
pub const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};
