use super::RenderError;
use barcoders::generators::image::{Color, Image, Rotation};
use image::{imageops, DynamicImage, GrayImage, ImageFormat, Luma};
use std::io::Cursor;

/// Quiet zone on each side of the symbol, in modules.
pub const QUIET_ZONE_MODULES: u32 = 10;
/// Blank border above the bars and below the text, in pixels.
pub const MARGIN: u32 = 10;

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;

const BLACK: Luma<u8> = Luma([0]);
const WHITE: Luma<u8> = Luma([255]);

// 5x7 digit glyphs, one byte per row, bit 4 is the leftmost column.
const DIGIT_GLYPHS: [[u8; 7]; 10] = [
    [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
    [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
    [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
    [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
    [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
    [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
    [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
    [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
    [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
];

/// Draws a module pattern (1 = bar, 0 = space) and optional text as a PNG.
///
/// The bars come from the `barcoders` image generator; this module only adds
/// the quiet zone, margins and the text line. `module_width` is the pixel
/// width of one module; `bar_height` the pixel height of the bars. Text is
/// drawn with a built-in digit font scaled to the module width; characters
/// without a glyph leave a blank cell.
pub fn rasterize(
    modules: &[u8],
    text: Option<&str>,
    module_width: u32,
    bar_height: u32,
) -> Result<Vec<u8>, RenderError> {
    let module_width = module_width.max(1);
    let scale = module_width;

    let bars = draw_bars(modules, module_width, bar_height)?;
    let bars_width = bars.width();
    let quiet = QUIET_ZONE_MODULES * module_width;
    let text_width = text
        .map(|t| t.chars().count() as u32 * (GLYPH_WIDTH + 1) * scale)
        .unwrap_or(0);
    let text_height = text.map(|_| (GLYPH_HEIGHT + 2) * scale).unwrap_or(0);

    let image_width = (bars_width + 2 * quiet).max(text_width + 2 * MARGIN);
    let image_height = MARGIN + bar_height + text_height + MARGIN;

    let mut img = GrayImage::from_pixel(image_width, image_height, WHITE);

    let left = (image_width - bars_width) / 2;
    imageops::replace(&mut img, &bars, i64::from(left), i64::from(MARGIN));

    if let Some(text) = text {
        let top = MARGIN + bar_height + 2 * scale;
        let start = (image_width - text_width) / 2;
        draw_text(&mut img, text, start, top, scale);
    }

    encode_png(img)
}

fn draw_bars(modules: &[u8], module_width: u32, bar_height: u32) -> Result<GrayImage, RenderError> {
    let generator = Image::PNG {
        height: bar_height,
        xdim: module_width,
        rotation: Rotation::Zero,
        foreground: Color::new([0, 0, 0, 255]),
        background: Color::new([255, 255, 255, 255]),
    };
    let png = generator
        .generate(modules)
        .map_err(|e| RenderError::Encoding(format!("{:?}", e)))?;
    let bars = image::load_from_memory(&png)
        .map_err(|e| RenderError::Encoding(e.to_string()))?
        .to_luma8();
    Ok(bars)
}

fn fill_rect(img: &mut GrayImage, x0: u32, y0: u32, width: u32, height: u32) {
    for x in x0..x0 + width {
        for y in y0..y0 + height {
            img.put_pixel(x, y, BLACK);
        }
    }
}

fn draw_text(img: &mut GrayImage, text: &str, left: u32, top: u32, scale: u32) {
    for (n, c) in text.chars().enumerate() {
        let Some(glyph) = c.to_digit(10).map(|d| &DIGIT_GLYPHS[d as usize]) else {
            continue;
        };
        let cell_x = left + n as u32 * (GLYPH_WIDTH + 1) * scale;
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                    fill_rect(
                        img,
                        cell_x + col * scale,
                        top + row as u32 * scale,
                        scale,
                        scale,
                    );
                }
            }
        }
    }
}

fn encode_png(img: GrayImage) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| RenderError::Encoding(e.to_string()))?;
    Ok(bytes)
}
