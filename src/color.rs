//! Packed color decoding

use image::Rgba;

/// An 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Background of the realistic style
pub const BACKGROUND: Color = Color::rgba(0, 0, 0, 255);

/// Outline drawn over every disc. The alpha is carried into the output as-is;
/// it is never composited.
pub const STROKE: Color = Color::rgba(50, 50, 50, 185);

/// Decode a packed `0x??RRGGBB` value. Bits above 23 are ignored and the
/// result is always fully opaque.
pub fn decode(value: u32) -> Color {
    Color {
        r: (value >> 16) as u8,
        g: (value >> 8) as u8,
        b: value as u8,
        a: 255,
    }
}

impl From<Color> for Rgba<u8> {
    fn from(c: Color) -> Self {
        Rgba([c.r, c.g, c.b, c.a])
    }
}

impl From<Rgba<u8>> for Color {
    fn from(p: Rgba<u8>) -> Self {
        let [r, g, b, a] = p.0;
        Color { r, g, b, a }
    }
}
