//! Rendering: cell layout, paint commands, the two styles and PNG output

pub mod block;
pub mod circle;
pub mod encode;
pub mod layout;
pub mod paint;

use crate::matrix::PixelSize;
use crate::{Error, Renderer};
use layout::CellLayout;
use std::fmt;
use std::str::FromStr;

pub use block::BlockRenderer;
pub use circle::CircleRenderer;

/// A rendered bitmap after PNG encoding.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

/// Visual style of the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderMode {
    /// One solid square per cell
    #[default]
    Block,
    /// One filled, outlined disc per cell on black
    Realistic,
}

impl RenderMode {
    pub fn renderer(self) -> &'static dyn Renderer {
        match self {
            RenderMode::Block => &BlockRenderer,
            RenderMode::Realistic => &CircleRenderer,
        }
    }

    /// Cell geometry this style uses at `pixel_size`.
    pub fn layout(self, pixel_size: PixelSize) -> CellLayout {
        match self {
            RenderMode::Block => CellLayout::blocks(pixel_size),
            RenderMode::Realistic => CellLayout::discs(pixel_size),
        }
    }

    pub fn as_str(self) -> &'static str {
        self.renderer().name()
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block" => Ok(RenderMode::Block),
            "realistic" => Ok(RenderMode::Realistic),
            other => Err(Error::InvalidInput(format!(
                "Unknown render mode '{}' (expected 'block' or 'realistic')",
                other
            ))),
        }
    }
}
