//! Syntect-backed grammar registry and tokenizer.

use super::engine::{GrammarEngine, GrammarHandle, TokenStream};
use super::format::HtmlOptions;
use crate::config::extension_of;
use crate::constants::DEFAULT_STYLE;
use crate::detection::canonical::canonicalize;
use crate::error::HighlightError;
use syntect::easy::ScopeRangeIterator;
use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle};
use syntect::parsing::{ParseState, Scope, ScopeStack, SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Grammar engine over syntect's bundled syntaxes and themes.
pub struct SyntectEngine {
    ps: SyntaxSet,
    ts: ThemeSet,
}

impl Default for SyntectEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntectEngine {
    /// Load the bundled newline-terminated syntaxes and default themes.
    pub fn new() -> Self {
        Self::with_sets(SyntaxSet::load_defaults_newlines(), ThemeSet::load_defaults())
    }

    /// Build an engine from custom sets. Syntaxes must be the newline variant.
    pub fn with_sets(ps: SyntaxSet, ts: ThemeSet) -> Self {
        Self { ps, ts }
    }

    pub fn syntax_set(&self) -> &SyntaxSet {
        &self.ps
    }

    /// CSS rules for `options.style`, keyed by the classes this engine emits.
    ///
    /// Unknown style names fall back to [`DEFAULT_STYLE`]. Selectors carry no
    /// class prefix.
    ///
    /// # Errors
    /// Returns [`HighlightError::Format`] when no theme is loaded or the theme
    /// cannot be rendered.
    pub fn stylesheet(&self, options: &HtmlOptions) -> Result<String, HighlightError> {
        let theme = self
            .ts
            .themes
            .get(options.style.as_str())
            .or_else(|| {
                tracing::warn!("unknown highlight style {:?}; using default", options.style);
                self.ts.themes.get(DEFAULT_STYLE)
            })
            .or_else(|| self.ts.themes.values().next())
            .ok_or_else(|| HighlightError::Format {
                message: "no themes loaded".to_string(),
            })?;
        css_for_theme_with_class_style(theme, ClassStyle::Spaced).map_err(|err| {
            HighlightError::Format {
                message: err.to_string(),
            }
        })
    }

    fn handle(&self, syntax: &SyntaxReference) -> GrammarHandle {
        let id = self
            .ps
            .syntaxes()
            .iter()
            .position(|candidate| std::ptr::eq(candidate, syntax))
            .unwrap_or_default();
        GrammarHandle::new(id, syntax.name.as_str())
    }

    fn syntax_by_extension_ignore_case(&self, token: &str) -> Option<&SyntaxReference> {
        self.ps.find_syntax_by_extension(token).or_else(|| {
            self.ps.syntaxes().iter().find(|syntax| {
                syntax
                    .file_extensions
                    .iter()
                    .any(|ext| ext.eq_ignore_ascii_case(token))
            })
        })
    }
}

fn normalized_syntax_key(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

fn try_resolve_syntax_candidate<'a>(
    ps: &'a SyntaxSet,
    candidate: &str,
) -> Option<&'a SyntaxReference> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(syntax) = ps.find_syntax_by_name(trimmed) {
        return Some(syntax);
    }
    if let Some(syntax) = ps.find_syntax_by_extension(trimmed) {
        return Some(syntax);
    }
    if let Some(syntax) = ps
        .syntaxes()
        .iter()
        .find(|syntax| syntax.name.eq_ignore_ascii_case(trimmed))
    {
        return Some(syntax);
    }

    let normalized = normalized_syntax_key(trimmed);
    if normalized.is_empty() {
        return None;
    }
    ps.syntaxes()
        .iter()
        .find(|syntax| normalized_syntax_key(syntax.name.as_str()) == normalized)
}

/// Syntect names for canonical labels that the bundled set spells differently.
fn alias_candidates(canonical: &str) -> &'static [&'static str] {
    match canonical {
        "cs" => &["C#", "cs"],
        "shell" => &["Bourne Again Shell (bash)", "bash", "sh"],
        "cpp" => &["C++", "cpp", "cc"],
        "objectivec" => &["Objective-C", "m"],
        "makefile" => &["Makefile", "make"],
        "latex" => &["LaTeX", "tex"],
        "typescript" => &["JavaScript", "js"],
        "ruby" => &["Ruby", "rb"],
        _ => &[],
    }
}

fn scope_class(scope: &Scope) -> String {
    scope.build_string().replace('.', " ")
}

impl GrammarEngine for SyntectEngine {
    fn resolve_by_name(&self, name: &str) -> Option<GrammarHandle> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return None;
        }
        let canonical = canonicalize(trimmed);
        if canonical == "text" {
            return Some(self.fallback());
        }
        if let Some(syntax) = try_resolve_syntax_candidate(&self.ps, trimmed) {
            return Some(self.handle(syntax));
        }
        if canonical != trimmed {
            if let Some(syntax) = try_resolve_syntax_candidate(&self.ps, &canonical) {
                return Some(self.handle(syntax));
            }
        }
        alias_candidates(&canonical)
            .iter()
            .find_map(|candidate| try_resolve_syntax_candidate(&self.ps, candidate))
            .map(|syntax| self.handle(syntax))
    }

    fn resolve_by_filename(&self, filename: &str) -> Option<GrammarHandle> {
        let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
        if name.is_empty() {
            return None;
        }
        if let Some(syntax) = self.syntax_by_extension_ignore_case(name) {
            return Some(self.handle(syntax));
        }
        let ext = extension_of(name).trim_start_matches('.');
        if ext.is_empty() {
            return None;
        }
        self.syntax_by_extension_ignore_case(ext)
            .map(|syntax| self.handle(syntax))
    }

    fn fallback(&self) -> GrammarHandle {
        self.handle(self.ps.find_syntax_plain_text())
    }

    fn tokenize(&self, grammar: &GrammarHandle, code: &str) -> Result<TokenStream, HighlightError> {
        let tokenize_error = |message: String| HighlightError::Tokenize {
            grammar: grammar.name().to_string(),
            message,
        };
        let syntax = self
            .ps
            .syntaxes()
            .get(grammar.id())
            .ok_or_else(|| tokenize_error(format!("unknown grammar id {}", grammar.id())))?;

        // Newline syntaxes expect every line to be terminated.
        let owned;
        let text = if code.is_empty() || code.ends_with('\n') {
            code
        } else {
            owned = format!("{}\n", code);
            owned.as_str()
        };

        let mut state = ParseState::new(syntax);
        let mut stack = ScopeStack::new();
        let mut tokens = TokenStream::default();
        for line in LinesWithEndings::from(text) {
            let ops = state
                .parse_line(line, &self.ps)
                .map_err(|err| tokenize_error(err.to_string()))?;
            for (range, op) in ScopeRangeIterator::new(&ops, line) {
                // Each op takes effect at the start of its range.
                stack
                    .apply(op)
                    .map_err(|err| tokenize_error(format!("{:?}", err)))?;
                if range.is_empty() {
                    continue;
                }
                // The root scope (`source.go`, `text.plain`) carries no styling.
                let scopes = stack.as_slice();
                let class = match scopes.last() {
                    Some(scope) if scopes.len() > 1 => scope_class(scope),
                    _ => String::new(),
                };
                tokens.push(&class, &line[range]);
            }
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    fn engine() -> &'static SyntectEngine {
        static ENGINE: OnceLock<SyntectEngine> = OnceLock::new();
        ENGINE.get_or_init(SyntectEngine::new)
    }

    fn name_of(handle: Option<GrammarHandle>) -> Option<String> {
        handle.map(|handle| handle.name().to_string())
    }

    #[test]
    fn resolve_by_name_accepts_names_extensions_and_aliases() {
        let engine = engine();
        let cases = [
            ("Rust", "Rust"),
            ("rust", "Rust"),
            ("go", "Go"),
            ("json", "JSON"),
            ("python", "Python"),
            ("csharp", "C#"),
            ("bash", "Bourne Again Shell (bash)"),
            ("c++", "C++"),
            ("text", "Plain Text"),
        ];
        for (input, expected) in cases {
            assert_eq!(
                name_of(engine.resolve_by_name(input)).as_deref(),
                Some(expected),
                "input: {input}"
            );
        }
    }

    #[test]
    fn resolve_by_name_rejects_unknown_and_empty_names() {
        let engine = engine();
        assert!(engine.resolve_by_name("").is_none());
        assert!(engine.resolve_by_name("   ").is_none());
        assert!(engine.resolve_by_name("python?plain").is_none());
        assert!(engine.resolve_by_name("definitely-not-a-language").is_none());
    }

    #[test]
    fn resolve_by_filename_uses_extension_and_full_name() {
        let engine = engine();
        assert_eq!(
            name_of(engine.resolve_by_filename("cmd/server/main.go")).as_deref(),
            Some("Go")
        );
        assert_eq!(
            name_of(engine.resolve_by_filename("LIB.RS")).as_deref(),
            Some("Rust")
        );
        assert_eq!(
            name_of(engine.resolve_by_filename("Makefile")).as_deref(),
            Some("Makefile")
        );
        assert!(engine.resolve_by_filename("README").is_none());
        assert!(engine.resolve_by_filename("data.customext").is_none());
    }

    #[test]
    fn handles_compare_by_registry_id() {
        let engine = engine();
        let a = engine.resolve_by_name("go").expect("go");
        let b = engine.resolve_by_filename("x.go").expect("go");
        assert_eq!(a, b);
        assert_ne!(a, engine.fallback());
    }

    #[test]
    fn tokenize_covers_input_and_appends_synthetic_newline() {
        let engine = engine();
        let go = engine.resolve_by_name("go").expect("go");
        let tokens = engine.tokenize(&go, "package main").expect("tokenize");
        let text: String = tokens.iter().map(|token| token.text.as_str()).collect();
        assert_eq!(text, "package main\n");
        assert!(tokens
            .iter()
            .any(|token| token.text == "package" && token.class.contains("keyword")));
    }

    #[test]
    fn tokenize_classes_the_text_each_scope_covers() {
        let engine = engine();
        let go = engine.resolve_by_name("go").expect("go");
        let tokens = engine.tokenize(&go, "package main\n").expect("tokenize");
        let first = tokens.iter().next().expect("first token");
        assert_eq!(first.text, "package");
        assert_eq!(first.class, "keyword control go");
        assert!(tokens
            .iter()
            .filter(|token| token.text.contains("main"))
            .all(|token| !token.class.contains("keyword")));
    }

    #[test]
    fn tokenize_plain_text_has_no_classes() {
        let engine = engine();
        let tokens = engine
            .tokenize(&engine.fallback(), "a <b>\nc")
            .expect("tokenize");
        assert!(tokens.iter().all(|token| token.class.is_empty()));
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn tokenize_rejects_foreign_handles() {
        let engine = engine();
        let bogus = GrammarHandle::new(usize::MAX, "Bogus");
        let err = engine.tokenize(&bogus, "x").expect_err("unknown id");
        assert!(matches!(err, HighlightError::Tokenize { .. }));
    }

    #[test]
    fn stylesheet_targets_spaced_classes() {
        let css = engine().stylesheet(&HtmlOptions::default()).expect("css");
        assert!(css.contains(".keyword"));
    }

    #[test]
    fn stylesheet_follows_the_configured_style() {
        let engine = engine();
        let default_css = engine.stylesheet(&HtmlOptions::default()).expect("css");
        let dark = HtmlOptions {
            style: "base16-ocean.dark".to_string(),
            ..HtmlOptions::default()
        };
        assert_ne!(engine.stylesheet(&dark).expect("css"), default_css);

        let unknown = HtmlOptions {
            style: "no-such-style".to_string(),
            ..HtmlOptions::default()
        };
        assert_eq!(engine.stylesheet(&unknown).expect("css"), default_css);
    }
}
