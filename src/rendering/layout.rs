//! Cell geometry shared by the block and realistic styles

use crate::matrix::{Matrix, PixelSize};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// Maps matrix coordinates to output pixels for one pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellLayout {
    cell: u32,
}

impl CellLayout {
    /// Square cells of exactly `pixel_size`.
    pub fn blocks(pixel_size: PixelSize) -> Self {
        Self {
            cell: pixel_size.get(),
        }
    }

    /// Cells forced to an odd size so each disc has a center pixel.
    pub fn discs(pixel_size: PixelSize) -> Self {
        Self {
            cell: pixel_size.odd(),
        }
    }

    pub fn cell_size(&self) -> u32 {
        self.cell
    }

    pub fn radius(&self) -> u32 {
        self.cell / 2
    }

    /// Output dimensions `(columns * cell, rows * cell)`.
    pub fn canvas_size(&self, matrix: &Matrix) -> Result<(u32, u32)> {
        let too_large = || {
            Error::InvalidInput(format!(
                "Rendered image too large: {}x{} cells at {} px",
                matrix.columns(),
                matrix.rows(),
                self.cell
            ))
        };
        let width = u32::try_from(matrix.columns())
            .ok()
            .and_then(|c| c.checked_mul(self.cell))
            .ok_or_else(too_large)?;
        let height = u32::try_from(matrix.rows())
            .ok()
            .and_then(|r| r.checked_mul(self.cell))
            .ok_or_else(too_large)?;
        // RGBA buffer length must fit in memory addressing
        (width as u64)
            .checked_mul(height as u64)
            .and_then(|px| px.checked_mul(4))
            .and_then(|len| usize::try_from(len).ok())
            .ok_or_else(too_large)?;
        Ok((width, height))
    }

    /// Pixel area covered by cell `(x, y)`.
    pub fn cell_rect(&self, x: usize, y: usize) -> Rect {
        Rect {
            x: x as i64 * self.cell as i64,
            y: y as i64 * self.cell as i64,
            width: self.cell,
            height: self.cell,
        }
    }

    /// Center pixel of the disc drawn for cell `(x, y)`.
    pub fn cell_center(&self, x: usize, y: usize) -> (i64, i64) {
        let rect = self.cell_rect(x, y);
        let r = self.radius() as i64;
        (rect.x + r, rect.y + r)
    }
}

/// Every cell of `matrix`, columns outer and rows inner.
pub fn cells(matrix: &Matrix) -> impl Iterator<Item = (usize, usize)> {
    let rows = matrix.rows();
    (0..matrix.columns()).flat_map(move |x| (0..rows).map(move |y| (x, y)))
}
