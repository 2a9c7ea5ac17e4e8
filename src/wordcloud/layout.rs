// Deterministic word cloud layout
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};
use unicode_segmentation::UnicodeSegmentation;

use super::font::GlyphFont;
use super::WordCloudConfig;
use crate::error::Result;

/// Side of one occupancy cell in pixels.
const CELL_SIZE: u32 = 4;
/// Estimated glyph advance relative to the font size (no font configured).
const GLYPH_WIDTH_RATIO: f32 = 0.6;
/// Estimated line height relative to the font size.
const LINE_HEIGHT_RATIO: f32 = 1.2;

const PALETTE: [&str; 8] = [
    "#440154", "#46327E", "#365C8D", "#277F8E", "#1FA187", "#4AC16D", "#9FDA3A", "#C8A800",
];

/// One word with its position on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedWord {
    pub word: String,
    pub frequency: usize,
    pub font_size: u32,
    /// Left edge in pixels
    pub x: u32,
    /// Top edge in pixels
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub color: String,
}

/// A laid-out word cloud, ready to be exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCloud {
    pub width: u32,
    pub height: u32,
    pub background_color: String,
    pub font_path: Option<PathBuf>,
    /// Placed words, most frequent first
    pub words: Vec<PlacedWord>,
    /// Words that did not fit on the canvas
    pub dropped: usize,
}

impl WordCloud {
    /// Lay out `(word, frequency)` pairs ranked from most to least frequent.
    ///
    /// The first word starts at the configured maximum size. Each following
    /// word is scaled against the previous one by `relative_scaling`, then
    /// shrunk by `font_step` until a free spot turns up. Spots are tried
    /// from the canvas center outwards. Once a word cannot fit even at
    /// `min_font_size` the layout stops.
    ///
    /// With a `font_path` words are measured with the font's glyph metrics;
    /// without one their size is estimated from the glyph count.
    pub fn generate(frequencies: &[(String, usize)], config: &WordCloudConfig) -> Result<Self> {
        config.validate()?;
        let font = match &config.font_path {
            Some(path) => Some(GlyphFont::load(path)?),
            None => None,
        };
        let measure = |word: &str, size: u32| match &font {
            Some(font) => font.measure(word, size),
            None => estimate_box(word, size),
        };

        let mut grid = Occupancy::new(config.width, config.height);
        let mut words = Vec::new();
        let mut font_size = config.initial_font_size();
        let mut last_frequency: Option<usize> = None;
        let rs = config.relative_scaling;

        let candidates: Vec<&(String, usize)> = frequencies
            .iter()
            .filter(|(_, freq)| *freq > 0)
            .take(config.max_words)
            .collect();

        for (index, (word, frequency)) in candidates.iter().enumerate() {
            if let Some(last) = last_frequency {
                let ratio = *frequency as f32 / last as f32;
                font_size = ((rs * ratio + (1.0 - rs)) * font_size as f32).round() as u32;
            }

            let mut placed = None;
            while font_size >= config.min_font_size {
                let (width, height) = measure(word.as_str(), font_size);
                if let Some((x, y)) = grid.place(width + 2 * config.margin, height + 2 * config.margin) {
                    placed = Some(PlacedWord {
                        word: word.clone(),
                        frequency: *frequency,
                        font_size,
                        x: x + config.margin,
                        y: y + config.margin,
                        width,
                        height,
                        color: color_for(word).to_string(),
                    });
                    break;
                }
                font_size = font_size.saturating_sub(config.font_step);
            }

            match placed {
                Some(word) => words.push(word),
                None => {
                    let dropped = candidates.len() - index;
                    warn!(
                        "Word cloud canvas full: dropped {} of {} words",
                        dropped,
                        candidates.len()
                    );
                    return Ok(Self::finish(words, dropped, config));
                }
            }

            last_frequency = Some(*frequency);
        }

        Ok(Self::finish(words, 0, config))
    }

    fn finish(words: Vec<PlacedWord>, dropped: usize, config: &WordCloudConfig) -> Self {
        debug!("Word cloud laid out: {} words placed", words.len());
        Self {
            width: config.width,
            height: config.height,
            background_color: config.background_color.clone(),
            font_path: config.font_path.clone(),
            words,
            dropped,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Rough text box for `word` at `font_size`, in pixels.
fn estimate_box(word: &str, font_size: u32) -> (u32, u32) {
    let glyphs = word.graphemes(true).count().max(1) as f32;
    let width = (glyphs * font_size as f32 * GLYPH_WIDTH_RATIO).ceil() as u32;
    let height = (font_size as f32 * LINE_HEIGHT_RATIO).ceil() as u32;
    (width.max(1), height.max(1))
}

/// Stable palette pick (FNV-1a over the word's bytes).
fn color_for(word: &str) -> &'static str {
    let hash = word
        .bytes()
        .fold(0xcbf29ce484222325u64, |h, b| (h ^ b as u64).wrapping_mul(0x100000001b3));
    PALETTE[(hash % PALETTE.len() as u64) as usize]
}

/// Coarse occupancy grid with a summed-area table for O(1) free checks.
struct Occupancy {
    cols: usize,
    rows: usize,
    cells: Vec<bool>,
    sums: Vec<u32>,
    /// Cell coordinates ordered by distance from the canvas center
    order: Vec<(usize, usize)>,
}

impl Occupancy {
    fn new(width: u32, height: u32) -> Self {
        let cols = width.div_ceil(CELL_SIZE) as usize;
        let rows = height.div_ceil(CELL_SIZE) as usize;

        let (cx, cy) = (cols as i64 / 2, rows as i64 / 2);
        let mut order: Vec<(usize, usize)> = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| (c, r)))
            .collect();
        order.sort_by_key(|&(c, r)| {
            let (dx, dy) = (c as i64 - cx, r as i64 - cy);
            (dx * dx + dy * dy, r, c)
        });

        Self {
            cols,
            rows,
            cells: vec![false; cols * rows],
            sums: vec![0; (cols + 1) * (rows + 1)],
            order,
        }
    }

    /// Reserve a `width`×`height` pixel box as close to the center as
    /// possible. Returns its top-left corner in pixels.
    fn place(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        let w = width.div_ceil(CELL_SIZE) as usize;
        let h = height.div_ceil(CELL_SIZE) as usize;
        if w > self.cols || h > self.rows {
            return None;
        }

        let spot = self.order.iter().find_map(|&(c, r)| {
            let left = c.checked_sub(w / 2)?;
            let top = r.checked_sub(h / 2)?;
            if left + w > self.cols || top + h > self.rows {
                return None;
            }
            self.is_free(left, top, w, h).then_some((left, top))
        })?;

        self.mark(spot.0, spot.1, w, h);
        Some((spot.0 as u32 * CELL_SIZE, spot.1 as u32 * CELL_SIZE))
    }

    fn is_free(&self, left: usize, top: usize, w: usize, h: usize) -> bool {
        let stride = self.cols + 1;
        let at = |c: usize, r: usize| self.sums[r * stride + c];
        let (right, bottom) = (left + w, top + h);
        at(right, bottom) + at(left, top) == at(left, bottom) + at(right, top)
    }

    fn mark(&mut self, left: usize, top: usize, w: usize, h: usize) {
        for r in top..top + h {
            for c in left..left + w {
                self.cells[r * self.cols + c] = true;
            }
        }

        let stride = self.cols + 1;
        for r in 0..self.rows {
            let mut row_sum = 0;
            for c in 0..self.cols {
                row_sum += self.cells[r * self.cols + c] as u32;
                self.sums[(r + 1) * stride + c + 1] = self.sums[r * stride + c + 1] + row_sum;
            }
        }
    }
}
