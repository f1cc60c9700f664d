//! Grammar selection cascade.

use super::cache::ResolutionCache;
use super::engine::{GrammarEngine, GrammarHandle};
use crate::config::ExtensionOverrideMap;
use crate::detection::LanguageClassifier;

/// Whether content classification may run during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Enabled,
    Disabled,
}

/// Which cascade step produced the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// The language hint named a grammar.
    Hint,
    /// The hint matched after dropping everything from the first `?`.
    HintPrefix,
    /// The configured extension override matched.
    Override,
    /// A memoized filename-pattern match.
    Cache,
    /// The content classifier's guess named a grammar.
    Classifier,
    /// The registry matched the filename.
    Pattern,
    /// Nothing matched; identity grammar.
    Fallback,
}

/// Applies the selection cascade against shared, initialized state.
pub struct LexerResolver<'a, E: ?Sized, C: ?Sized> {
    engine: &'a E,
    classifier: &'a C,
    overrides: &'a ExtensionOverrideMap,
    cache: &'a ResolutionCache,
}

impl<'a, E, C> LexerResolver<'a, E, C>
where
    E: GrammarEngine + ?Sized,
    C: LanguageClassifier + ?Sized,
{
    pub fn new(
        engine: &'a E,
        classifier: &'a C,
        overrides: &'a ExtensionOverrideMap,
        cache: &'a ResolutionCache,
    ) -> Self {
        Self {
            engine,
            classifier,
            overrides,
            cache,
        }
    }

    /// Pick exactly one grammar for `filename`.
    pub fn resolve(
        &self,
        filename: &str,
        hint: &str,
        code: &[u8],
        classification: Classification,
    ) -> GrammarHandle {
        self.resolve_with_source(filename, hint, code, classification)
            .0
    }

    /// Like [`LexerResolver::resolve`], also reporting the winning step.
    ///
    /// Only filename-pattern matches are memoized: hint and override results
    /// are request-specific, and the fallback must not block a later content
    /// guess for the same filename.
    pub fn resolve_with_source(
        &self,
        filename: &str,
        hint: &str,
        code: &[u8],
        classification: Classification,
    ) -> (GrammarHandle, ResolutionSource) {
        let (grammar, source) = self.cascade(filename, hint, code, classification);
        tracing::debug!(
            filename,
            hint,
            grammar = grammar.name(),
            source = ?source,
            "resolved grammar"
        );
        (grammar, source)
    }

    fn cascade(
        &self,
        filename: &str,
        hint: &str,
        code: &[u8],
        classification: Classification,
    ) -> (GrammarHandle, ResolutionSource) {
        if !hint.is_empty() {
            if let Some(grammar) = self.engine.resolve_by_name(hint) {
                return (grammar, ResolutionSource::Hint);
            }
            // Hints may carry metadata after `?` (for example `go?tabs=4`).
            if let Some(idx) = hint.find('?').filter(|idx| *idx > 0) {
                if let Some(grammar) = self.engine.resolve_by_name(&hint[..idx]) {
                    return (grammar, ResolutionSource::HintPrefix);
                }
            }
        }

        if let Some(name) = self.overrides.lookup(filename) {
            match self.engine.resolve_by_name(name) {
                Some(grammar) => return (grammar, ResolutionSource::Override),
                None => tracing::warn!(
                    "highlight mapping for {:?} names unknown grammar {:?}",
                    filename,
                    name
                ),
            }
        }

        if let Some(grammar) = self.cache.get(filename) {
            return (grammar, ResolutionSource::Cache);
        }

        if classification == Classification::Enabled {
            let guess = self.classifier.classify(filename, code);
            if let Some(grammar) = guess
                .as_deref()
                .and_then(|name| self.engine.resolve_by_name(name))
            {
                return (grammar, ResolutionSource::Classifier);
            }
        }

        if let Some(grammar) = self.engine.resolve_by_filename(filename) {
            self.cache.insert(filename, grammar.clone());
            return (grammar, ResolutionSource::Pattern);
        }

        (self.engine.fallback(), ResolutionSource::Fallback)
    }
}
