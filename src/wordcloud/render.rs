// Word cloud export (SVG and PNG images, JSON placement data)
use image::{ImageFormat, Rgba, RgbaImage};
use std::path::Path;

use super::{GlyphFont, WordCloud};
use crate::error::{Result, StatsError};

impl WordCloud {
    /// Render as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();

        svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = self.width,
            h = self.height
        ));

        let family = match &self.font_path {
            Some(path) => {
                svg.push_str("  <defs>\n    <style>\n");
                svg.push_str(&format!(
                    "      @font-face {{ font-family: 'WordCloud'; src: url('{}'); }}\n",
                    escape_xml(&path.display().to_string())
                ));
                svg.push_str("    </style>\n  </defs>\n");
                "WordCloud, sans-serif"
            }
            None => "sans-serif",
        };

        svg.push_str(&format!(
            "  <rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
            escape_xml(&self.background_color)
        ));

        for word in &self.words {
            svg.push_str(&format!(
                "  <text x=\"{}\" y=\"{}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\" text-anchor=\"middle\" dominant-baseline=\"central\">{}</text>\n",
                word.x + word.width / 2,
                word.y + word.height / 2,
                family,
                word.font_size,
                word.color,
                escape_xml(&word.word)
            ));
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Placement data as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rasterize with the cloud's font. Words are drawn at their laid-out
    /// boxes, so the cloud must have been generated with the same font.
    pub fn to_png(&self) -> Result<RgbaImage> {
        let font_path = self
            .font_path
            .as_deref()
            .ok_or_else(|| StatsError::Config("PNG export needs a font_path".to_string()))?;
        let font = GlyphFont::load(font_path)?;

        let mut image = RgbaImage::from_pixel(self.width, self.height, parse_color(&self.background_color)?);
        for word in &self.words {
            font.draw(&mut image, word, parse_color(&word.color)?);
        }
        Ok(image)
    }

    /// Write the cloud to `path`; the extension picks the format
    /// (`svg`, `png` or `json`).
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase);

        let content = match extension.as_deref() {
            Some("svg") => self.to_svg(),
            Some("json") => self.to_json()?,
            Some("png") => {
                return self
                    .to_png()?
                    .save_with_format(path, ImageFormat::Png)
                    .map_err(StatsError::from);
            }
            other => {
                return Err(StatsError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        std::fs::write(path, content).map_err(|e| StatsError::io(path, e))
    }
}

/// `#RRGGBB`, `#RGB`, `white` or `black`.
fn parse_color(color: &str) -> Result<Rgba<u8>> {
    let invalid = || StatsError::Config(format!("unsupported color {color:?}"));
    match color.to_ascii_lowercase().as_str() {
        "white" => return Ok(Rgba([255, 255, 255, 255])),
        "black" => return Ok(Rgba([0, 0, 0, 255])),
        _ => {}
    }

    let hex = color.strip_prefix('#').ok_or_else(invalid)?;
    if !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    let (r, g, b) = match hex.len() {
        6 => (channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?),
        3 => (
            channel(&hex[0..1])? * 17,
            channel(&hex[1..2])? * 17,
            channel(&hex[2..3])? * 17,
        ),
        _ => return Err(invalid()),
    };
    Ok(Rgba([r, g, b, 255]))
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
