//! PNG encoding of rendered bitmaps
//!
//! Translucent pixels in a rendered bitmap carry premultiplied channels (the
//! stroke is written as `(50, 50, 50, 185)` verbatim). PNG stores straight
//! alpha, so those pixels are un-premultiplied on the way out, with the same
//! 16-bit integer arithmetic the reference renderer's encoder used.

use crate::rendering::RenderedImage;
use crate::Result;
use image::{ImageFormat, Rgba, RgbaImage};
use std::borrow::Cow;
use std::io::Cursor;

/// Encode `bitmap` as an RGBA PNG.
pub fn encode_png(bitmap: &RgbaImage) -> Result<Vec<u8>> {
    let straight = to_straight_alpha(bitmap);
    let mut png_data = Vec::new();
    straight.write_to(&mut Cursor::new(&mut png_data), ImageFormat::Png)?;
    Ok(png_data)
}

/// Convert premultiplied translucent pixels to straight alpha. Opaque
/// bitmaps are passed through without copying.
pub fn to_straight_alpha(bitmap: &RgbaImage) -> Cow<'_, RgbaImage> {
    if bitmap.pixels().all(|p| p.0[3] == 255) {
        return Cow::Borrowed(bitmap);
    }
    let mut out = bitmap.clone();
    for p in out.pixels_mut() {
        *p = unpremultiply(*p);
    }
    Cow::Owned(out)
}

fn unpremultiply(p: Rgba<u8>) -> Rgba<u8> {
    let [r, g, b, a] = p.0;
    match a {
        255 => p,
        0 => Rgba([0, 0, 0, 0]),
        _ => {
            let a16 = a as u32 * 0x101;
            // truncation to u8 matches the reference encoder for channels > alpha
            let channel = |c: u8| (((c as u32 * 0x101) * 0xffff / a16) >> 8) as u8;
            Rgba([channel(r), channel(g), channel(b), a])
        }
    }
}

impl RenderedImage {
    pub fn from_bitmap(bitmap: &RgbaImage) -> Result<Self> {
        Ok(Self {
            width: bitmap.width(),
            height: bitmap.height(),
            png_data: encode_png(bitmap)?,
        })
    }
}
