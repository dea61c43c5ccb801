use super::checksum::complete_gs1;
use super::raster::rasterize;
use super::{RenderError, RenderOptions, Renderer};
use ::barcoders::sym::ean13::EAN13;
use ::barcoders::sym::tf::TF;

/// Production renderer backed by the `barcoders` symbol encoders.
///
/// Supported tokens are `ean13` and `itf14`. Both accept the number with or
/// without its check digit; a check digit that is present must be correct.
/// `databar` is recognised but no encoder is bound for it, so it is refused
/// like any other unsupported token.
#[derive(Debug, Clone, Copy, Default)]
pub struct BarcodersRenderer;

impl BarcodersRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Returns the module pattern and the human-readable text for `value`.
    fn encode(&self, value: &str, format: &str) -> Result<(Vec<u8>, String), RenderError> {
        match format {
            "ean13" => {
                let number = complete_gs1(value, 13).map_err(RenderError::InvalidValue)?;
                // barcoders appends the check digit itself
                let payload = to_text(&number[..12]);
                let symbol = EAN13::new(payload.as_str())
                    .map_err(|e| RenderError::InvalidValue(format!("{:?}", e)))?;
                Ok((symbol.encode(), to_text(&number)))
            }
            "itf14" => {
                let number = complete_gs1(value, 14).map_err(RenderError::InvalidValue)?;
                let text = to_text(&number);
                let symbol = TF::interleaved(text.as_str())
                    .map_err(|e| RenderError::InvalidValue(format!("{:?}", e)))?;
                Ok((symbol.encode(), text))
            }
            other => Err(RenderError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl Renderer for BarcodersRenderer {
    fn render(&self, value: &str, options: &RenderOptions<'_>) -> Result<Vec<u8>, RenderError> {
        let (modules, text) = self.encode(value.trim(), options.format)?;
        let text = options.display_value.then_some(text.as_str());
        rasterize(&modules, text, options.width, options.height)
    }
}

fn to_text(digits: &[u8]) -> String {
    digits.iter().map(|d| char::from(b'0' + d)).collect()
}
