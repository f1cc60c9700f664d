//! Class-based HTML rendering of token streams.

use super::engine::TokenStream;
use crate::constants::{DEFAULT_STYLE, LINE_CLOSE_MARKER, LINE_OPEN_MARKER};
use crate::error::HighlightError;
use std::fmt::Write as _;

/// Formatter settings shared by inline and whole-file rendering.
///
/// Output never carries a surrounding `<pre>` block, inline styles, or line
/// numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlOptions {
    /// Visual style name read by [`SyntectEngine::stylesheet`](super::SyntectEngine::stylesheet).
    pub style: String,
    /// Prepended to every emitted class name.
    pub class_prefix: String,
    /// Wrap each source line in [`LINE_OPEN_MARKER`] / [`LINE_CLOSE_MARKER`].
    pub wrap_lines: bool,
}

impl HtmlOptions {
    /// Options for diff/blame cells: no per-line wrappers.
    pub fn inline() -> Self {
        Self {
            style: DEFAULT_STYLE.to_string(),
            class_prefix: String::new(),
            wrap_lines: false,
        }
    }

    /// Options for whole-file rendering: one wrapper per source line.
    pub fn lines() -> Self {
        Self {
            wrap_lines: true,
            ..Self::inline()
        }
    }
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self::inline()
    }
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    push_escaped(&mut escaped, text);
    escaped
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

fn write_span(
    out: &mut String,
    class: &str,
    text: &str,
    options: &HtmlOptions,
) -> Result<(), HighlightError> {
    if text.is_empty() {
        return Ok(());
    }
    if class.is_empty() {
        push_escaped(out, text);
        return Ok(());
    }
    out.push_str("<span class=\"");
    for (idx, name) in class.split_whitespace().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        write!(out, "{}{}", options.class_prefix, name)?;
    }
    out.push_str("\">");
    push_escaped(out, text);
    out.push_str("</span>");
    Ok(())
}

/// Render `tokens` as class-annotated HTML.
///
/// Line terminators are written outside token spans so that a wrapped line
/// always ends in `\n` (or `\r\n`) immediately before [`LINE_CLOSE_MARKER`].
///
/// # Errors
/// Returns [`HighlightError::Format`] if writing to the output buffer fails.
pub fn format_tokens(tokens: &TokenStream, options: &HtmlOptions) -> Result<String, HighlightError> {
    let mut out = String::new();
    let mut line_open = false;
    for token in tokens {
        for piece in token.text.split_inclusive('\n') {
            if options.wrap_lines && !line_open {
                out.push_str(LINE_OPEN_MARKER);
                line_open = true;
            }
            let Some(body) = piece.strip_suffix('\n') else {
                write_span(&mut out, &token.class, piece, options)?;
                continue;
            };
            match body.strip_suffix('\r') {
                Some(body) => {
                    write_span(&mut out, &token.class, body, options)?;
                    out.push_str("\r\n");
                }
                None => {
                    write_span(&mut out, &token.class, body, options)?;
                    out.push('\n');
                }
            }
            if options.wrap_lines {
                out.push_str(LINE_CLOSE_MARKER);
                line_open = false;
            }
        }
    }
    if line_open {
        out.push_str(LINE_CLOSE_MARKER);
    }
    Ok(out)
}
