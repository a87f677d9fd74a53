//! Paint commands executed against an RGBA canvas
//!
//! Every write replaces the destination pixel, alpha included. Nothing is
//! composited, so a translucent stroke stays translucent in the output.
//! Writes outside the canvas are dropped.

use crate::color::Color;
use crate::rendering::layout::Rect;
use image::RgbaImage;
use std::f64::consts::FRAC_PI_4;

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    /// Solid axis-aligned rectangle
    SolidRect { rect: Rect, color: Color },
    /// Every pixel with `dx² + dy² <= radius²` around the center
    FillDisc {
        cx: i64,
        cy: i64,
        radius: u32,
        color: Color,
    },
    /// Circle outline traced from the first octant and mirrored eight ways
    StrokeCircle {
        cx: i64,
        cy: i64,
        radius: u32,
        color: Color,
    },
}

impl PaintCommand {
    pub fn apply(&self, canvas: &mut RgbaImage) {
        match *self {
            PaintCommand::SolidRect { rect, color } => fill_rect(canvas, rect, color),
            PaintCommand::FillDisc {
                cx,
                cy,
                radius,
                color,
            } => fill_disc(canvas, cx, cy, radius, color),
            PaintCommand::StrokeCircle {
                cx,
                cy,
                radius,
                color,
            } => stroke_circle(canvas, cx, cy, radius, color),
        }
    }
}

/// Overwrite one pixel, ignoring coordinates outside the canvas.
pub fn put(canvas: &mut RgbaImage, x: i64, y: i64, color: Color) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    canvas.put_pixel(x as u32, y as u32, color.into());
}

fn fill_rect(canvas: &mut RgbaImage, rect: Rect, color: Color) {
    for dx in 0..rect.width as i64 {
        for dy in 0..rect.height as i64 {
            put(canvas, rect.x + dx, rect.y + dy, color);
        }
    }
}

// Brute-force membership over the bounding square; O(r²) per disc, which is
// fine for radii bounded by the pixel size limit.
fn fill_disc(canvas: &mut RgbaImage, cx: i64, cy: i64, radius: u32, color: Color) {
    let r = radius as i64;
    let r2 = r * r;
    for dx in -r..=r {
        for dy in -r..=r {
            if dx * dx + dy * dy <= r2 {
                put(canvas, cx + dx, cy + dy, color);
            }
        }
    }
}

fn stroke_circle(canvas: &mut RgbaImage, cx: i64, cy: i64, radius: u32, color: Color) {
    let r = radius as i64;
    let limit = (radius as f64 * FRAC_PI_4.cos()) as i64;
    for x in 0..=limit {
        let y = ((r * r - x * x) as f64).sqrt() as i64;
        put(canvas, cx + x, cy + y, color);
        put(canvas, cx + x, cy - y, color);
        put(canvas, cx - x, cy + y, color);
        put(canvas, cx - x, cy - y, color);

        put(canvas, cx + y, cy + x, color);
        put(canvas, cx + y, cy - x, color);
        put(canvas, cx - y, cy + x, color);
        put(canvas, cx - y, cy - x, color);
    }
}
