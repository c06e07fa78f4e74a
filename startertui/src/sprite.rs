use image::imageops::FilterType;
use image::GenericImageView;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const ALPHA_CUTOFF: u8 = 128;

/// Downsampled RGBA pixels, row-major.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SpriteData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 4]>,
}

#[derive(thiserror::Error, Debug)]
pub enum SpriteError {
    #[error("failed to decode sprite: {0}")]
    Image(#[from] image::ImageError),
    #[error("sprite has no visible pixels")]
    Empty,
}

impl SpriteData {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    fn visible(&self, x: u32, y: u32) -> Option<Color> {
        self.pixel(x, y)
            .filter(|[_, _, _, a]| *a >= ALPHA_CUTOFF)
            .map(|[r, g, b, _]| Color::Rgb(r, g, b))
    }

    /// Terminal rows needed at one pixel per half cell.
    pub fn rows(&self) -> u16 {
        self.height.div_ceil(2) as u16
    }

    /// Renders two pixel rows per line with upper/lower half blocks.
    pub fn to_lines(&self) -> Vec<Line<'static>> {
        (0..self.height)
            .step_by(2)
            .map(|y| {
                let spans: Vec<Span<'static>> = (0..self.width)
                    .map(|x| match (self.visible(x, y), self.visible(x, y + 1)) {
                        (Some(top), Some(bottom)) => {
                            Span::styled("▀", Style::default().fg(top).bg(bottom))
                        }
                        (Some(top), None) => Span::styled("▀", Style::default().fg(top)),
                        (None, Some(bottom)) => Span::styled("▄", Style::default().fg(bottom)),
                        (None, None) => Span::raw(" "),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

/// Decodes a PNG, crops the transparent border and scales it to fit
/// `max_width` x `max_height` pixels.
pub fn decode_sprite(bytes: &[u8], max_width: u32, max_height: u32) -> Result<SpriteData, SpriteError> {
    let image = image::load_from_memory(bytes)?;
    let rgba = image.to_rgba8();

    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in rgba.enumerate_pixels() {
        if pixel.0[3] < ALPHA_CUTOFF {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    let (x0, y0, x1, y1) = bounds.ok_or(SpriteError::Empty)?;

    let cropped = image.crop_imm(x0, y0, x1 - x0 + 1, y1 - y0 + 1);
    let scaled = if cropped.width() > max_width || cropped.height() > max_height {
        cropped.resize(max_width.max(1), max_height.max(1), FilterType::Nearest)
    } else {
        cropped
    };

    let (width, height) = scaled.dimensions();
    let pixels = scaled.to_rgba8().pixels().map(|pixel| pixel.0).collect();
    Ok(SpriteData {
        width,
        height,
        pixels,
    })
}
