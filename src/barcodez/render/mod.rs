//! # Barcode Rendering
//!
//! The renderer is a delegate: it turns a value and a format token into PNG
//! bytes, or refuses the value. The rest of barcodez never looks inside the
//! symbol; it only stores and re-exports the bytes.
//!
//! - [`Renderer`]: the delegate contract.
//! - [`encoder::BarcodersRenderer`]: production renderer. Symbol encoding is
//!   done by the `barcoders` crate, rasterisation by `image`.
//! - [`checksum`]: GS1 mod-10 check digit used to validate EAN-13 and ITF-14
//!   input before encoding.
//! - [`raster`]: module pattern → grayscale PNG, with the human-readable text
//!   line underneath.

use thiserror::Error;

pub mod checksum;
pub mod encoder;
pub mod raster;

pub use encoder::BarcodersRenderer;

/// Parameters for one render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions<'a> {
    /// Renderer format token (`ean13`, `itf14`, `databar`).
    pub format: &'a str,
    /// Width of the narrowest bar, in pixels.
    pub width: u32,
    /// Bar height, in pixels.
    pub height: u32,
    /// Print the value as text below the bars.
    pub display_value: bool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("{0}")]
    InvalidValue(String),

    #[error("unsupported barcode format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to encode image: {0}")]
    Encoding(String),
}

/// Renders a barcode value to image bytes.
pub trait Renderer {
    fn render(&self, value: &str, options: &RenderOptions<'_>) -> Result<Vec<u8>, RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for &R {
    fn render(&self, value: &str, options: &RenderOptions<'_>) -> Result<Vec<u8>, RenderError> {
        (**self).render(value, options)
    }
}
