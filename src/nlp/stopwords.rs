use std::collections::HashSet;
use std::path::Path;

use super::Normalizer;
use crate::error::{Result, StatsError};

/// Persian stop-word list shipped with the crate.
const BUNDLED_PERSIAN: &str = include_str!("../../data/persian.txt");

/// Words excluded from frequency ranking and the word cloud.
///
/// Entries are normalized on load so they compare equal to tokens.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// The bundled Persian list.
    pub fn bundled(normalizer: &Normalizer) -> Self {
        Self::parse(BUNDLED_PERSIAN, normalizer)
    }

    /// Load a newline-delimited list from disk.
    pub fn from_file(path: &Path, normalizer: &Normalizer) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| StatsError::io(path, e))?;
        Ok(Self::parse(&content, normalizer))
    }

    /// One word per line; blank lines are ignored and duplicates collapse.
    pub fn parse(content: &str, normalizer: &Normalizer) -> Self {
        let mut stop_words = Self::default();
        stop_words.extend(content.lines(), normalizer);
        stop_words
    }

    pub fn extend<'a, I>(&mut self, words: I, normalizer: &Normalizer)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.words.extend(
            words
                .into_iter()
                .map(|w| normalizer.normalize(w))
                .filter(|w| !w.is_empty()),
        );
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
