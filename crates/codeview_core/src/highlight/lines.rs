//! Per-line reconstruction of wrapped formatter output.
//!
//! The formatter and this splitter agree on a text protocol: every source
//! line is emitted as `LINE_OPEN_MARKER`, content, line terminator,
//! `LINE_CLOSE_MARKER`. Token text is HTML-escaped, so the open marker cannot
//! appear inside highlighted content. Any change to the formatter's line
//! layout must update this module and its pinned tests together.

use crate::constants::{LINE_CLOSE_MARKER, LINE_OPEN_MARKER};

/// Strip one trailing `\n` or `\r\n`.
pub(crate) fn strip_line_terminator(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .unwrap_or(line)
}

/// Split wrapped HTML into one fragment per source line.
///
/// Text before the first open marker carries no line content and is dropped.
pub fn split_highlighted_lines(html: &str) -> Vec<String> {
    html.split(LINE_OPEN_MARKER)
        .skip(1)
        .map(|segment| {
            let segment = segment.strip_suffix(LINE_CLOSE_MARKER).unwrap_or(segment);
            strip_line_terminator(segment).to_string()
        })
        .collect()
}
