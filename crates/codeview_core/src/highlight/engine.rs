//! Grammar registry, tokenizer, and formatter capability.

use super::format::{format_tokens, HtmlOptions};
use crate::error::HighlightError;
use std::fmt;
use std::sync::Arc;

/// Reference to a grammar resolved by a [`GrammarEngine`].
///
/// Handles are cheap to clone and compare by registry id.
#[derive(Clone)]
pub struct GrammarHandle {
    id: usize,
    name: Arc<str>,
}

impl GrammarHandle {
    pub fn new(id: usize, name: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Registry-specific identifier.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Display name of the grammar (for example `Go` or `Plain Text`).
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for GrammarHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for GrammarHandle {}

impl fmt::Debug for GrammarHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GrammarHandle({}: {})", self.id, self.name)
    }
}

/// One classified run of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Space-separated CSS classes; empty for unclassified text.
    pub class: String,
    pub text: String,
}

impl Token {
    pub fn new(class: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            text: text.into(),
        }
    }
}

/// Ordered tokens covering the tokenized text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Append a token, merging it into the previous one when classes match.
    pub fn push(&mut self, class: &str, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.tokens.last_mut() {
            if last.class == class {
                last.text.push_str(text);
                return;
            }
        }
        self.tokens.push(Token::new(class, text));
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Grammar lookup plus tokenize/format operations used by the highlighter.
///
/// Implementations are shared across request threads and must not hold
/// per-call mutable state.
pub trait GrammarEngine: Send + Sync {
    /// Resolve a grammar by (possibly aliased) name.
    fn resolve_by_name(&self, name: &str) -> Option<GrammarHandle>;

    /// Resolve a grammar from the filename alone (extension or well-known name).
    fn resolve_by_filename(&self, filename: &str) -> Option<GrammarHandle>;

    /// Identity grammar used when nothing else matches.
    fn fallback(&self) -> GrammarHandle;

    /// Split `code` into classified tokens.
    ///
    /// # Errors
    /// Returns [`HighlightError::Tokenize`] when the grammar rejects the input.
    fn tokenize(&self, grammar: &GrammarHandle, code: &str) -> Result<TokenStream, HighlightError>;

    /// Render tokens to class-annotated HTML.
    ///
    /// # Errors
    /// Returns [`HighlightError::Format`] when rendering fails.
    fn format(&self, tokens: &TokenStream, options: &HtmlOptions) -> Result<String, HighlightError> {
        format_tokens(tokens, options)
    }
}
