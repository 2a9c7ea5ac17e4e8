use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{Result, StatsError};
use crate::nlp::{Normalizer, StopWords};
use crate::wordcloud::WordCloudConfig;

/// Resources and tuning for one analysis run.
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```json
/// { "stem": false, "word_cloud": { "width": 1200, "background_color": "white" } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Newline-delimited stop-word file used instead of the bundled list.
    pub stop_words: Option<PathBuf>,
    /// Added on top of whichever list is loaded.
    pub extra_stop_words: Vec<String>,
    pub stem: bool,
    pub word_cloud: WordCloudConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            stop_words: None,
            extra_stop_words: Vec::new(),
            stem: true,
            word_cloud: WordCloudConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Read a JSON config file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| StatsError::io(path, e))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| StatsError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.word_cloud.validate()
    }

    /// Load the configured stop-word set (file or bundled) plus extras.
    pub fn load_stop_words(&self, normalizer: &Normalizer) -> Result<StopWords> {
        let mut stop_words = match &self.stop_words {
            Some(path) => StopWords::from_file(path, normalizer)?,
            None => StopWords::bundled(normalizer),
        };
        stop_words.extend(self.extra_stop_words.iter().map(String::as_str), normalizer);
        if stop_words.is_empty() {
            warn!("Stop-word list is empty: every token will be counted");
        }
        Ok(stop_words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalyzerConfig::default();
        assert!(config.stem);
        assert!(config.stop_words.is_none());
        assert_eq!(config.word_cloud.width, 800);
        assert_eq!(config.word_cloud.height, 800);
        assert_eq!(config.word_cloud.max_font_size, Some(200));
        assert_eq!(config.word_cloud.background_color, "#E5FFCC");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"stem": false, "extra_stop_words": ["lol"], "word_cloud": {"width": 400}}"#,
        )
        .unwrap();

        let config = AnalyzerConfig::load(&path).unwrap();
        assert!(!config.stem);
        assert_eq!(config.word_cloud.width, 400);
        assert_eq!(config.word_cloud.height, 800);
        assert_eq!(config.extra_stop_words, vec!["lol".to_string()]);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"word_cloud": {"relative_scaling": 2.0}}"#).unwrap();
        assert!(matches!(
            AnalyzerConfig::load(&path),
            Err(StatsError::Config(_))
        ));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            AnalyzerConfig::load(&path),
            Err(StatsError::Config(_))
        ));
    }

    #[test]
    fn test_load_stop_words_from_file_with_extras() {
        let normalizer = Normalizer::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stop.txt");
        std::fs::write(&path, "foo\nbar\n").unwrap();

        let config = AnalyzerConfig {
            stop_words: Some(path),
            extra_stop_words: vec!["Baz".to_string()],
            ..Default::default()
        };
        let stop_words = config.load_stop_words(&normalizer).unwrap();
        assert_eq!(stop_words.len(), 3);
        assert!(stop_words.contains("baz"));
        assert!(!stop_words.contains("از"));
    }

    #[test]
    fn test_empty_stop_word_file_is_allowed() {
        let normalizer = Normalizer::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "\n  \n").unwrap();

        let config = AnalyzerConfig {
            stop_words: Some(path),
            ..Default::default()
        };
        let stop_words = config.load_stop_words(&normalizer).unwrap();
        assert!(stop_words.is_empty());
    }
}
