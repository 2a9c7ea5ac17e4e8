use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, StatsError};

/// Word cloud layout parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WordCloudConfig {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Size of the most frequent word; `None` uses the canvas height
    pub max_font_size: Option<u32>,
    pub min_font_size: u32,
    /// How much to shrink a word each time it does not fit
    pub font_step: u32,
    /// 0.0 sizes words by rank only, 1.0 strictly by frequency
    pub relative_scaling: f32,
    pub max_words: usize,
    /// Blank space kept around each word, in pixels
    pub margin: u32,
    pub background_color: String,
    /// TrueType/OpenType font: measures words, draws the PNG export and is
    /// referenced by the SVG export
    pub font_path: Option<PathBuf>,
}

impl Default for WordCloudConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            max_font_size: Some(200),
            min_font_size: 4,
            font_step: 1,
            relative_scaling: 0.5,
            max_words: 200,
            margin: 2,
            background_color: "#E5FFCC".to_string(),
            font_path: None,
        }
    }
}

impl WordCloudConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(StatsError::Config(format!(
                "word cloud canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.min_font_size == 0 {
            return Err(StatsError::Config("min_font_size must be at least 1".to_string()));
        }
        if self.font_step == 0 {
            return Err(StatsError::Config("font_step must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.relative_scaling) {
            return Err(StatsError::Config(format!(
                "relative_scaling must be within 0..=1, got {}",
                self.relative_scaling
            )));
        }
        if self.initial_font_size() < self.min_font_size {
            return Err(StatsError::Config(format!(
                "max_font_size ({}) is smaller than min_font_size ({})",
                self.initial_font_size(),
                self.min_font_size
            )));
        }
        Ok(())
    }

    /// Font size given to the most frequent word.
    pub fn initial_font_size(&self) -> u32 {
        self.max_font_size.unwrap_or(self.height)
    }
}
