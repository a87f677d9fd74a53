//! Realistic style: every cell becomes a filled disc with a grey outline
//! on a black background

use crate::color::{self, BACKGROUND, STROKE};
use crate::matrix::{Matrix, PixelSize};
use crate::rendering::layout::{cells, CellLayout};
use crate::rendering::paint::PaintCommand;
use crate::{Renderer, Result};
use image::RgbaImage;

#[derive(Debug, Clone, Copy, Default)]
pub struct CircleRenderer;

impl Renderer for CircleRenderer {
    fn name(&self) -> &'static str {
        "realistic"
    }

    fn render(&self, matrix: &Matrix, pixel_size: PixelSize) -> Result<RgbaImage> {
        // even sizes are bumped to the next odd value
        let layout = CellLayout::discs(pixel_size);
        let radius = layout.radius();
        let (width, height) = layout.canvas_size(matrix)?;
        log::debug!(
            "realistic render: {}x{} cells, pixel size {} (cell {}, radius {}), canvas {}x{}",
            matrix.columns(),
            matrix.rows(),
            pixel_size,
            layout.cell_size(),
            radius,
            width,
            height
        );

        let mut canvas = RgbaImage::from_pixel(width, height, BACKGROUND.into());
        for (x, y) in cells(matrix) {
            let color = color::decode(matrix.pixel_at(x, y)?);
            let (cx, cy) = layout.cell_center(x, y);
            // stroke after fill: outline pixels always end up STROKE
            PaintCommand::FillDisc {
                cx,
                cy,
                radius,
                color,
            }
            .apply(&mut canvas);
            PaintCommand::StrokeCircle {
                cx,
                cy,
                radius,
                color: STROKE,
            }
            .apply(&mut canvas);
        }
        Ok(canvas)
    }
}
