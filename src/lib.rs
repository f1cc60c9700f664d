//! Root crate facade: re-exports the highlighting core for embedders.

pub use codeview_core::{
    config, constants, detection, error, highlight, highlight_file, plain_text, Classification,
    ConfigError, ContentClassifier, ExtensionOverrideMap, GrammarEngine, GrammarHandle,
    HighlightConfig, HighlightError, Highlighter, HtmlOptions, LanguageClassifier, NoClassifier,
    ResolutionCache, ResolutionSource, SyntectEngine, TokenStream, RESOLUTION_CACHE_CAPACITY,
    SIZE_LIMIT,
};
