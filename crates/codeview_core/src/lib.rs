//! Core library for codeview: grammar resolution, highlighting, and
//! plain-text fallback rendering.

/// Highlight settings loading.
pub mod config;
/// Shared limits, markers, and environment variable names.
pub mod constants;
/// Content-based language classification.
pub mod detection;
/// Error types for highlighting and configuration.
pub mod error;
/// Grammar resolution, caching, and HTML rendering.
pub mod highlight;

pub use config::{ExtensionOverrideMap, HighlightConfig};
pub use constants::{RESOLUTION_CACHE_CAPACITY, SIZE_LIMIT};
pub use detection::{ContentClassifier, LanguageClassifier, NoClassifier};
pub use error::{ConfigError, HighlightError};
pub use highlight::{
    plain_text, Classification, GrammarEngine, GrammarHandle, Highlighter, HtmlOptions,
    ResolutionCache, ResolutionSource, SyntectEngine, TokenStream,
};

/// Highlight a diff or blame snippet with the process-wide [`Highlighter`].
pub fn highlight(filename: &str, hint: &str, code: &str) -> String {
    Highlighter::global().highlight(filename, hint, code)
}

/// Highlight a whole file with the process-wide [`Highlighter`].
///
/// # Errors
/// Returns [`HighlightError`] when tokenizing or formatting fails; fall back to
/// [`plain_text`].
pub fn highlight_file(
    filename: &str,
    hint: &str,
    code: &[u8],
) -> Result<Vec<String>, HighlightError> {
    Highlighter::global().highlight_file(filename, hint, code)
}
