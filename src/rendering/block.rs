//! Block style: every cell becomes a solid square

use crate::color;
use crate::matrix::{Matrix, PixelSize};
use crate::rendering::layout::{cells, CellLayout};
use crate::rendering::paint::PaintCommand;
use crate::{Renderer, Result};
use image::RgbaImage;

#[derive(Debug, Clone, Copy, Default)]
pub struct BlockRenderer;

impl Renderer for BlockRenderer {
    fn name(&self) -> &'static str {
        "block"
    }

    fn render(&self, matrix: &Matrix, pixel_size: PixelSize) -> Result<RgbaImage> {
        let layout = CellLayout::blocks(pixel_size);
        let (width, height) = layout.canvas_size(matrix)?;
        log::debug!(
            "block render: {}x{} cells, pixel size {}, canvas {}x{}",
            matrix.columns(),
            matrix.rows(),
            pixel_size,
            width,
            height
        );

        // every output pixel belongs to exactly one block, no background pass
        let mut canvas = RgbaImage::new(width, height);
        for (x, y) in cells(matrix) {
            let color = color::decode(matrix.pixel_at(x, y)?);
            PaintCommand::SolidRect {
                rect: layout.cell_rect(x, y),
                color,
            }
            .apply(&mut canvas);
        }
        Ok(canvas)
    }
}
