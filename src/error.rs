use std::path::PathBuf;

use thiserror::Error;

/// Result type for analyzer operations.
pub type Result<T> = std::result::Result<T, StatsError>;

/// Errors that can occur while loading or analyzing a chat export.
#[derive(Debug, Error)]
pub enum StatsError {
    /// The input document is not valid JSON (or a value could not be serialized).
    #[error("invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// The document parsed but does not have the shape of a chat export.
    #[error("malformed chat export: {0}")]
    MalformedInput(String),

    /// Reading a resource or writing an output file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// An export was requested in a format the word cloud cannot produce.
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// A font file could not be parsed.
    #[error("invalid font {}: {message}", .path.display())]
    Font { path: PathBuf, message: String },

    /// Encoding or writing a raster image failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// A built-in text pattern failed to compile.
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

impl StatsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by the input document rather than the environment.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::MalformedInput(_))
    }
}
