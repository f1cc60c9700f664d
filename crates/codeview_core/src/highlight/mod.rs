//! Source highlighting to class-annotated HTML for file, diff, and blame views.

mod cache;
mod engine;
mod format;
mod lines;
mod plain;
mod resolver;
mod syntect_engine;

pub use cache::{CacheStats, ResolutionCache, TwoQueueCache};
pub use engine::{GrammarEngine, GrammarHandle, Token, TokenStream};
pub use format::{escape_html, format_tokens, HtmlOptions};
pub use lines::split_highlighted_lines;
pub use plain::plain_text;
pub use resolver::{Classification, LexerResolver, ResolutionSource};
pub use syntect_engine::SyntectEngine;

use crate::config::{ExtensionOverrideMap, HighlightConfig};
use crate::constants::{RESOLUTION_CACHE_CAPACITY, SIZE_LIMIT, TRACE_TARGET};
use crate::detection::{ContentClassifier, LanguageClassifier};
use crate::error::HighlightError;
use lines::strip_line_terminator;
use std::num::NonZeroUsize;
use std::sync::OnceLock;
use std::time::Instant;
use tracing::info;

/// State built once on first use and shared by every caller afterwards.
struct SharedState {
    overrides: ExtensionOverrideMap,
    cache: ResolutionCache,
}

/// Grammar resolution, tokenizing, and HTML rendering behind one handle.
///
/// Share one instance across request threads (see [`Highlighter::global`]):
/// the resolution cache only pays off when every caller sees it.
pub struct Highlighter<E = SyntectEngine, C = ContentClassifier> {
    engine: E,
    classifier: C,
    config: HighlightConfig,
    state: OnceLock<SharedState>,
}

impl Highlighter {
    /// Process-wide highlighter configured from the environment.
    pub fn global() -> &'static Highlighter {
        static GLOBAL: OnceLock<Highlighter> = OnceLock::new();
        GLOBAL.get_or_init(Highlighter::from_env)
    }

    /// Syntect engine and content classifier with environment configuration.
    pub fn from_env() -> Self {
        Self::with_config(HighlightConfig::from_env())
    }

    pub fn with_config(config: HighlightConfig) -> Self {
        Self::new(SyntectEngine::new(), ContentClassifier, config)
    }
}

impl<E, C> Highlighter<E, C>
where
    E: GrammarEngine,
    C: LanguageClassifier,
{
    pub fn new(engine: E, classifier: C, config: HighlightConfig) -> Self {
        Self {
            engine,
            classifier,
            config,
            state: OnceLock::new(),
        }
    }

    /// Build the override map and resolution cache.
    ///
    /// Idempotent: concurrent first calls race safely and the work runs once.
    /// Every entry point calls this before doing anything else.
    pub fn initialize(&self) {
        let _ = self.state();
    }

    fn state(&self) -> &SharedState {
        self.state.get_or_init(|| {
            let overrides = ExtensionOverrideMap::from_config(&self.config);
            let capacity =
                NonZeroUsize::new(RESOLUTION_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
            info!(
                target: TRACE_TARGET,
                overrides = overrides.len(),
                cache_capacity = capacity.get(),
                "highlighter initialized"
            );
            SharedState {
                overrides,
                cache: ResolutionCache::new(capacity),
            }
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    pub fn overrides(&self) -> &ExtensionOverrideMap {
        &self.state().overrides
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.state().cache
    }

    fn resolver(&self) -> LexerResolver<'_, E, C> {
        let state = self.state();
        LexerResolver::new(
            &self.engine,
            &self.classifier,
            &state.overrides,
            &state.cache,
        )
    }

    /// Resolve the grammar a render of `filename` would use.
    pub fn resolve(
        &self,
        filename: &str,
        hint: &str,
        code: &[u8],
        classification: Classification,
    ) -> (GrammarHandle, ResolutionSource) {
        self.resolver()
            .resolve_with_source(filename, hint, code, classification)
    }

    fn render(
        &self,
        grammar: &GrammarHandle,
        code: &str,
        options: &HtmlOptions,
    ) -> Result<String, HighlightError> {
        let tokens = self.engine.tokenize(grammar, code)?;
        self.engine.format(&tokens, options)
    }

    fn trace_pass(
        &self,
        event: &str,
        filename: &str,
        grammar: &GrammarHandle,
        bytes: usize,
        started: Instant,
    ) {
        if !self.config.trace {
            return;
        }
        let elapsed_ms = started.elapsed().as_secs_f32() * 1000.0;
        info!(
            target: TRACE_TARGET,
            event,
            filename,
            grammar = grammar.name(),
            bytes,
            elapsed_ms,
            "highlight pass"
        );
    }

    /// Highlight a short snippet (diff or blame cell) into one HTML string.
    ///
    /// Never fails: an empty snippet or lone newline comes back as `"\n"`,
    /// oversized input comes back unmodified (not escaped), and tokenize or
    /// format failures return the original text after logging. Content
    /// classification is not used.
    pub fn highlight(&self, filename: &str, hint: &str, code: &str) -> String {
        self.initialize();

        // Blank diff lines must still copy as a newline.
        if code.is_empty() || code == "\n" {
            return "\n".to_string();
        }
        if code.len() > SIZE_LIMIT {
            return code.to_string();
        }

        let started = Instant::now();
        let grammar = self
            .resolver()
            .resolve(filename, hint, code.as_bytes(), Classification::Disabled);
        let html = self.highlight_with(&grammar, code);
        self.trace_pass("highlight", filename, &grammar, code.len(), started);
        html
    }

    /// Highlight a snippet with an already resolved grammar.
    ///
    /// The trailing newline a tokenizer adds is stripped; tokenize or format
    /// failures are logged and return `code` unchanged. No size or blank-input
    /// handling happens here; see [`Highlighter::highlight`].
    pub fn highlight_with(&self, grammar: &GrammarHandle, code: &str) -> String {
        match self.render(grammar, code, &HtmlOptions::inline()) {
            // Tokenizers may add a trailing newline; it must not reach the page.
            Ok(html) => strip_line_terminator(&html).to_string(),
            Err(err) => {
                tracing::error!("highlight with {} failed: {}", grammar.name(), err);
                code.to_string()
            }
        }
    }

    /// Highlight a whole file into one HTML fragment per source line.
    ///
    /// Oversized input is rendered with [`plain_text`] instead. Fragments carry
    /// no line wrapper and no trailing line terminator.
    ///
    /// # Errors
    /// Returns [`HighlightError`] when tokenizing or formatting fails; callers
    /// should fall back to [`Highlighter::plain_text`].
    pub fn highlight_file(
        &self,
        filename: &str,
        hint: &str,
        code: &[u8],
    ) -> Result<Vec<String>, HighlightError> {
        self.initialize();

        if code.len() > SIZE_LIMIT {
            return Ok(plain_text(code));
        }

        let started = Instant::now();
        let grammar = self
            .resolver()
            .resolve(filename, hint, code, Classification::Enabled);
        let text = String::from_utf8_lossy(code);
        let html = self
            .render(&grammar, &text, &HtmlOptions::lines())
            .inspect_err(|err| {
                tracing::error!("highlight of file {:?} failed: {}", filename, err);
            })?;
        let lines = split_highlighted_lines(&html);
        self.trace_pass("highlight_file", filename, &grammar, code.len(), started);
        Ok(lines)
    }

    /// Escaped, unhighlighted lines; see [`plain_text`].
    pub fn plain_text(&self, code: &[u8]) -> Vec<String> {
        plain_text(code)
    }
}
