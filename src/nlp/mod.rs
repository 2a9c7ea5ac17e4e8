// Text processing: normalization, stemming, segmentation, stop words

pub mod normalizer;
pub mod stemmer;
pub mod stopwords;
pub mod tokenizer;

pub use normalizer::Normalizer;
pub use stemmer::Stemmer;
pub use stopwords::StopWords;
pub use tokenizer::{is_question, sentence_tokenize, word_tokenize, QUESTION_MARKS};

use crate::error::Result;

/// Normalize → tokenize → stem, as applied to the whole chat.
pub struct TextPipeline {
    normalizer: Normalizer,
    stemmer: Option<Stemmer>,
}

impl TextPipeline {
    pub fn new(stem: bool) -> Result<Self> {
        Ok(Self {
            normalizer: Normalizer::new()?,
            stemmer: stem.then(Stemmer::new),
        })
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Token stream for `text`. Stop words are kept verbatim (never stemmed)
    /// so that later filtering still recognizes them.
    pub fn tokens(&self, text: &str, stop_words: &StopWords) -> Vec<String> {
        let normalized = self.normalizer.normalize(text);

        word_tokenize(&normalized)
            .into_iter()
            .map(|token| match &self.stemmer {
                Some(stemmer) if !stop_words.contains(&token) => stemmer.stem(&token),
                _ => token,
            })
            .collect()
    }
}
