//! The input data model: a validated matrix of packed colors and the pixel
//! size it is rendered with.

use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// A `rows x columns` matrix of packed colors.
///
/// The bitmap is addressed as `bitmap[x * rows + y]`. Existing fixtures are
/// built against that layout, so it is kept even though `y * columns + x`
/// would be the usual row-major order.
///
/// A `Matrix` can only be obtained through [`Matrix::new`] or through serde,
/// both of which reject non-positive dimensions and a bitmap whose length is
/// not `rows * columns`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct Matrix {
    rows: usize,
    columns: usize,
    bitmap: Vec<u32>,
}

/// Unvalidated wire form. Dimensions are signed so that `-1` is reported as
/// an invalid dimension rather than a type error.
#[derive(Deserialize)]
struct RawMatrix {
    rows: i64,
    columns: i64,
    bitmap: Vec<u32>,
}

impl TryFrom<RawMatrix> for Matrix {
    type Error = Error;

    fn try_from(raw: RawMatrix) -> Result<Self> {
        let rows = positive_dimension("rows", raw.rows)?;
        let columns = positive_dimension("columns", raw.columns)?;
        Matrix::new(rows, columns, raw.bitmap)
    }
}

fn positive_dimension(name: &str, value: i64) -> Result<usize> {
    if value <= 0 {
        return Err(Error::InvalidInput(format!(
            "Invalid matrix: {} must be positive, got {}",
            name, value
        )));
    }
    usize::try_from(value)
        .map_err(|_| Error::InvalidInput(format!("Invalid matrix: {} is too large", name)))
}

impl Matrix {
    /// Build a matrix, checking dimensions and bitmap length up front.
    pub fn new(rows: usize, columns: usize, bitmap: Vec<u32>) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(Error::InvalidInput(format!(
                "Invalid matrix: dimensions must be positive, got {}x{}",
                columns, rows
            )));
        }
        let expected = rows
            .checked_mul(columns)
            .ok_or_else(|| Error::InvalidInput("Invalid matrix: too many cells".into()))?;
        if bitmap.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: bitmap.len(),
            });
        }
        Ok(Self {
            rows,
            columns,
            bitmap,
        })
    }

    /// Parse the `{"rows", "columns", "bitmap"}` JSON form.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let raw: RawMatrix = serde_json::from_slice(bytes)?;
        Matrix::try_from(raw)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn bitmap(&self) -> &[u32] {
        &self.bitmap
    }

    /// Packed color at cell `(x, y)`.
    pub fn pixel_at(&self, x: usize, y: usize) -> Result<u32> {
        if x >= self.columns || y >= self.rows {
            return Err(Error::IndexOutOfRange {
                x,
                y,
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(self.bitmap[x * self.rows + y])
    }
}

/// Edge length, in output pixels, of one matrix cell.
///
/// Valid values are `1..=29`; 4 when the caller does not pick one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PixelSize(u32);

impl PixelSize {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 29;
    pub const DEFAULT: PixelSize = PixelSize(4);

    pub fn new(value: i64) -> Result<Self> {
        if value < Self::MIN as i64 || value > Self::MAX as i64 {
            return Err(invalid_pixel_size(&value.to_string()));
        }
        Ok(PixelSize(value as u32))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// The size rounded up to the next odd value so a disc can be centered
    /// on a whole pixel.
    pub fn odd(self) -> u32 {
        if self.0 % 2 == 0 {
            self.0 + 1
        } else {
            self.0
        }
    }
}

impl Default for PixelSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for PixelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PixelSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.parse::<i64>().map_err(|_| invalid_pixel_size(s))?;
        PixelSize::new(value).map_err(|_| invalid_pixel_size(s))
    }
}

fn invalid_pixel_size(param: &str) -> Error {
    Error::InvalidInput(format!(
        "Invalid parameter (should be an int between {} and {}): {}",
        PixelSize::MIN,
        PixelSize::MAX,
        param
    ))
}
