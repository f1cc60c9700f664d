//! Error types for highlighting and configuration loading.
use std::path::PathBuf;
use thiserror::Error;

/// Failure while turning source text into highlighted HTML.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HighlightError {
    #[error("can't tokenize code with {grammar}: {message}")]
    Tokenize { grammar: String, message: String },

    #[error("can't format code: {message}")]
    Format { message: String },
}

impl From<std::fmt::Error> for HighlightError {
    fn from(value: std::fmt::Error) -> Self {
        Self::Format {
            message: value.to_string(),
        }
    }
}

/// Failure while loading highlight settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
