//! Color helpers

use smart_leds::RGB8;

pub type Rgb = RGB8;

/// Create an RGB color from a u32 value (0xRRGGBB format)
///
/// Bits above the lower 24 are ignored.
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}

/// Pack a color into a u32 value (0xRRGGBB format)
pub const fn rgb_to_u32(color: Rgb) -> u32 {
    ((color.r as u32) << 16) | ((color.g as u32) << 8) | color.b as u32
}

/// Scale a channel by a percentage, rounding down
///
/// Percentages above 100 are treated as 100.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn scale_percent(value: u8, percent: u8) -> u8 {
    let percent = if percent > 100 { 100 } else { percent };
    (value as u16 * percent as u16 / 100) as u8
}

/// Scale every channel of a color by a percentage
pub const fn dim(color: Rgb, percent: u8) -> Rgb {
    Rgb {
        r: scale_percent(color.r, percent),
        g: scale_percent(color.g, percent),
        b: scale_percent(color.b, percent),
    }
}
