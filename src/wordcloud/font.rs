// Font-backed measuring and drawing of words
use ab_glyph::{point, Font, FontVec, Glyph, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::path::Path;

use super::PlacedWord;
use crate::error::{Result, StatsError};

/// A TrueType/OpenType font used to size and rasterize cloud words.
pub struct GlyphFont {
    font: FontVec,
}

impl GlyphFont {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| StatsError::io(path, e))?;
        let font = FontVec::try_from_vec(data).map_err(|e| StatsError::Font {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self { font })
    }

    /// Pixel box of `word` rendered at `font_size`.
    pub fn measure(&self, word: &str, font_size: u32) -> (u32, u32) {
        let (_, advance) = self.layout(word, font_size, 0.0, 0.0);
        let height = self.font.as_scaled(PxScale::from(font_size as f32)).height();
        (advance.ceil().max(1.0) as u32, height.ceil().max(1.0) as u32)
    }

    /// Draw `word` into `image` with its box's top-left at (`word.x`, `word.y`).
    pub fn draw(&self, image: &mut RgbaImage, word: &PlacedWord, color: Rgba<u8>) {
        let (glyphs, _) = self.layout(&word.word, word.font_size, word.x as f32, word.y as f32);
        let (width, height) = image.dimensions();

        for glyph in glyphs {
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let x = bounds.min.x as i64 + gx as i64;
                let y = bounds.min.y as i64 + gy as i64;
                if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                    return;
                }
                blend(image.get_pixel_mut(x as u32, y as u32), color, coverage);
            });
        }
    }

    /// Positioned glyphs in visual order and the total advance.
    fn layout(&self, word: &str, font_size: u32, x: f32, top: f32) -> (Vec<Glyph>, f32) {
        let scaled = self.font.as_scaled(PxScale::from(font_size as f32));
        let baseline = top + scaled.ascent();
        let mut cursor = x;
        let mut previous = None;
        let mut glyphs = Vec::new();

        for c in visual_order(word) {
            let mut glyph = scaled.scaled_glyph(c);
            if let Some(prev) = previous {
                cursor += scaled.kern(prev, glyph.id);
            }
            glyph.position = point(cursor, baseline);
            cursor += scaled.h_advance(glyph.id);
            previous = Some(glyph.id);
            glyphs.push(glyph);
        }

        (glyphs, cursor - x)
    }
}

/// Right-to-left words (Arabic script) are drawn with their characters reversed.
fn visual_order(word: &str) -> Vec<char> {
    let rtl = word.chars().any(|c| {
        matches!(c, '\u{0600}'..='\u{06FF}' | '\u{FB50}'..='\u{FDFF}' | '\u{FE70}'..='\u{FEFF}')
    });
    if rtl {
        word.chars().rev().collect()
    } else {
        word.chars().collect()
    }
}

fn blend(pixel: &mut Rgba<u8>, color: Rgba<u8>, coverage: f32) {
    let alpha = coverage.clamp(0.0, 1.0);
    for i in 0..3 {
        let mixed = pixel.0[i] as f32 * (1.0 - alpha) + color.0[i] as f32 * alpha;
        pixel.0[i] = mixed.round() as u8;
    }
}
