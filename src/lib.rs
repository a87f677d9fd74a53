//! imgrender
//!
//! Turns a rectangular matrix of packed `0xRRGGBB` colors into an image.
//!
//! # Styles
//!
//! - **Block**: every cell becomes a solid `pixel_size` square
//! - **Realistic**: every cell becomes a filled disc with a grey outline on a
//!   black background
//!
//! The renderers are pure functions of `(Matrix, PixelSize)`. PNG encoding and
//! the HTTP service (feature `server`, on by default) are layered on top.
//!
//! # Example
//!
//! ```
//! use imgrender::{Matrix, PixelSize, RenderMode};
//!
//! # fn main() -> imgrender::Result<()> {
//! let matrix = Matrix::new(1, 1, vec![0xFF0000])?;
//! let bitmap = imgrender::render(&matrix, RenderMode::Block, PixelSize::new(2)?)?;
//! assert_eq!(bitmap.dimensions(), (2, 2));
//! # Ok(())
//! # }
//! ```

pub mod color;
pub mod error;
pub mod matrix;
pub mod rendering;

// HTTP surface on top of the renderers
#[cfg(feature = "server")]
pub mod service;

pub use color::Color;
pub use error::{Error, Result};
pub use matrix::{Matrix, PixelSize};
pub use rendering::{RenderMode, RenderedImage};

use image::RgbaImage;

/// A rendering style.
///
/// Implementations hold no state; the same input always yields the same
/// bitmap, and a single instance can be shared across threads.
pub trait Renderer: Send + Sync {
    /// Short name used in logs and on the command line
    fn name(&self) -> &'static str;

    /// Rasterize `matrix` into a freshly allocated RGBA bitmap
    fn render(&self, matrix: &Matrix, pixel_size: PixelSize) -> Result<RgbaImage>;
}

/// Render `matrix` in the given style.
pub fn render(matrix: &Matrix, mode: RenderMode, pixel_size: PixelSize) -> Result<RgbaImage> {
    mode.renderer().render(matrix, pixel_size)
}

/// Render `matrix` and encode the result as PNG.
pub fn render_png(
    matrix: &Matrix,
    mode: RenderMode,
    pixel_size: PixelSize,
) -> Result<RenderedImage> {
    let bitmap = render(matrix, mode, pixel_size)?;
    RenderedImage::from_bitmap(&bitmap)
}

/// Configuration for the HTTP service
///
/// The defaults bind to loopback only and size the worker pool to the
/// machine.
///
/// # Examples
///
/// ```
/// let cfg = imgrender::ServiceConfig::default();
/// assert_eq!(cfg.default_pixel_size.get(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Listen address, `host:port`
    pub addr: String,
    /// Number of request-handling threads
    pub workers: usize,
    /// Pixel size used when a request has no `pixSize` parameter
    pub default_pixel_size: PixelSize,
    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
    /// Largest output canvas, in pixels, a request may ask for
    pub max_canvas_pixels: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".to_string(),
            workers: num_cpus::get(),
            default_pixel_size: PixelSize::DEFAULT,
            max_body_bytes: 4 * 1024 * 1024,
            // 4096 x 4096, 64 MiB of RGBA
            max_canvas_pixels: 4096 * 4096,
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::ConfigError("workers must be at least 1".into()));
        }
        if self.max_body_bytes == 0 {
            return Err(Error::ConfigError("max_body_bytes must be positive".into()));
        }
        if self.max_canvas_pixels == 0 {
            return Err(Error::ConfigError("max_canvas_pixels must be positive".into()));
        }
        if self.addr.trim().is_empty() {
            return Err(Error::ConfigError("listen address is empty".into()));
        }
        Ok(())
    }
}

/// Bind a render service with the given configuration.
#[cfg(feature = "server")]
pub fn new_service(config: ServiceConfig) -> Result<service::RenderService> {
    service::RenderService::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.addr, "127.0.0.1:8080");
        assert!(config.workers >= 1);
        assert_eq!(config.default_pixel_size, PixelSize::DEFAULT);
        assert_eq!(config.max_canvas_pixels, 16_777_216);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let config = ServiceConfig {
            workers: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));

        let config = ServiceConfig {
            max_canvas_pixels: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_render_dispatch() {
        let m = Matrix::new(1, 1, vec![0xFF0000]).unwrap();
        let px = PixelSize::new(2).unwrap();
        assert_eq!(render(&m, RenderMode::Block, px).unwrap().dimensions(), (2, 2));
        assert_eq!(
            render(&m, RenderMode::Realistic, px).unwrap().dimensions(),
            (3, 3)
        );
    }

    #[test]
    fn test_render_png() {
        let m = Matrix::new(2, 3, vec![0x00FF00; 6]).unwrap();
        let out = render_png(&m, RenderMode::Block, PixelSize::default()).unwrap();
        assert_eq!((out.width, out.height), (12, 8));
        assert_eq!(&out.png_data[0..8], b"\x89PNG\r\n\x1a\n");
    }
}
