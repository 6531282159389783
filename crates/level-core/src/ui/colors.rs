//! Color definitions
//!
//! All colors are RGB565, the native format of small SPI panels and of the
//! framebuffer. To convert from 8-bit RGB: R>>3, G>>2, B>>3

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

// ============================================================================
// Base Colors
// ============================================================================

/// Screen background - very dark gray-blue
pub const COLOR_BACKGROUND: Rgb565 = Rgb565::new(18 >> 3, 23 >> 2, 24 >> 3);

/// Gauge ring and tube outline - light steel gray
pub const COLOR_GAUGE_OUTLINE: Rgb565 = Rgb565::new(176 >> 3, 190 >> 2, 197 >> 3);

/// Faint outer border around the ring and degree tick marks
pub const COLOR_GAUGE_BORDER: Rgb565 = Rgb565::new(84 >> 3, 110 >> 2, 122 >> 3);

/// Crosshair, center dot and tube center line
pub const COLOR_CENTER_INDICATOR: Rgb565 = Rgb565::new(255 >> 3, 255 >> 2, 255 >> 3);

// ============================================================================
// Status Colors
// ============================================================================

/// Level - green
pub const COLOR_LEVEL: Rgb565 = Rgb565::new(76 >> 3, 175 >> 2, 80 >> 3);

/// Slightly tilted - orange
pub const COLOR_SLIGHTLY_TILTED: Rgb565 = Rgb565::new(255 >> 3, 152 >> 2, 0 >> 3);

/// Tilted - red
pub const COLOR_TILTED: Rgb565 = Rgb565::new(244 >> 3, 67 >> 2, 54 >> 3);

// ============================================================================
// Text Colors
// ============================================================================

/// Pure white - maximum brightness in RGB565
pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);

/// Light gray - for secondary text
pub const LIGHT_GRAY: Rgb565 = Rgb565::new(21, 42, 21);

/// Opacity (out of 255) of the white highlight painted on bubbles.
pub const HIGHLIGHT_ALPHA: u8 = 100;

/// Blend `overlay` onto `base` with the given opacity (0 = base, 255 = overlay).
///
/// RGB565 has no alpha channel, so translucent highlights are pre-mixed.
pub fn blend(base: Rgb565, overlay: Rgb565, alpha: u8) -> Rgb565 {
    let mix = |b: u8, o: u8| -> u8 {
        let a = alpha as u16;
        ((b as u16 * (255 - a) + o as u16 * a + 127) / 255) as u8
    };

    Rgb565::new(
        mix(base.r(), overlay.r()),
        mix(base.g(), overlay.g()),
        mix(base.b(), overlay.b()),
    )
}
