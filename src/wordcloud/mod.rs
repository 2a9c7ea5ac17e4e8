// Word cloud generation and export

pub mod config;
pub mod font;
pub mod layout;
pub mod render;

pub use config::WordCloudConfig;
pub use font::GlyphFont;
pub use layout::{PlacedWord, WordCloud};
