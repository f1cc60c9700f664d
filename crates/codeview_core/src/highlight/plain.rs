//! Escaped, unhighlighted rendering used as the last-resort fallback.

use super::format::escape_html;
use super::lines::strip_line_terminator;
use std::io::{BufRead, BufReader, Read};

/// Render `code` as HTML-escaped lines without highlighting.
///
/// One entry per newline-delimited line; a trailing unterminated line is kept,
/// empty input yields no lines. Invalid UTF-8 is replaced lossily.
pub fn plain_text(code: &[u8]) -> Vec<String> {
    plain_text_from_reader(code, code.iter().filter(|byte| **byte == b'\n').count() + 1)
}

/// Read failures are logged and truncate the output; lines read so far are
/// still returned.
pub(crate) fn plain_text_from_reader<R: Read>(reader: R, capacity_hint: usize) -> Vec<String> {
    let mut reader = BufReader::new(reader);
    let mut lines = Vec::with_capacity(capacity_hint);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                lines.push(escape_html(strip_line_terminator(&line)));
            }
            Err(err) => {
                tracing::error!("failed to read line for plain-text render: {}", err);
                break;
            }
        }
    }
    lines
}
