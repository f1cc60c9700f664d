//! Heuristic language detection over a bounded text sample.

const SAMPLE_MAX_BYTES: usize = 64 * 1024;
const SAMPLE_MAX_LINES: usize = 512;

/// Keyword tables scored against the lowercased sample. A language needs at
/// least `threshold` distinct hits; the highest hit count wins, first entry on
/// ties.
const SCORED_LANGUAGES: &[(&str, &[&str], usize)] = &[
    (
        "rust",
        &[
            "fn ", "impl", "crate::", "let ", "mut ", "pub ", "struct ", "enum", "match ",
            "trait", "println!",
        ],
        2,
    ),
    (
        "python",
        &["def ", "import ", "class ", "self", "async def", "elif", "print("],
        2,
    ),
    (
        "javascript",
        &[
            "function", "const ", "let ", "=>", "console.", "document.", "export ", "import ",
        ],
        2,
    ),
    (
        "typescript",
        &[
            "interface ", " type ", ": string", ": number", "implements ", "readonly ",
        ],
        2,
    ),
    (
        "go",
        &["package ", "func ", "fmt.", "defer ", "chan ", "select {", ":= "],
        2,
    ),
    (
        "java",
        &[
            "public class",
            "import java.",
            "system.out",
            " extends ",
            " void main",
        ],
        2,
    ),
    (
        "kotlin",
        &["fun ", "data class", "companion object", "val ", "when (", "println("],
        2,
    ),
    (
        "lua",
        &["local ", "function ", "require(", "elseif", "ipairs(", "pairs("],
        2,
    ),
    (
        "elixir",
        &["defmodule ", "defp ", "|>", "io.puts", " do\n"],
        2,
    ),
];

/// Best-effort language detection based on simple heuristics.
///
/// # Returns
/// Canonical-friendly language label when a strong pattern is found, otherwise
/// `None`.
pub(crate) fn detect(content: &str) -> Option<&'static str> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return None;
    }
    let sample = utf8_prefix(trimmed, SAMPLE_MAX_BYTES);
    let lower = sample.to_ascii_lowercase();

    if let Some(label) = shebang_interpreter(sample).and_then(|name| shebang_label(&name)) {
        return Some(label);
    }
    if looks_like_json(sample, sample.len() < trimmed.len()) {
        return Some("json");
    }
    if looks_like_html(sample, &lower) {
        return Some("html");
    }
    if lower.starts_with("<?xml") || (sample.starts_with('<') && lower.contains("</")) {
        return Some("xml");
    }
    if looks_like_yaml(sample) {
        return Some("yaml");
    }
    if looks_like_toml(sample) {
        return Some("toml");
    }
    if looks_like_sql(sample) {
        return Some("sql");
    }
    if lower.contains("\\documentclass")
        || count_hits(&lower, &["\\begin{", "\\end{", "\\usepackage", "\\section"]) >= 2
    {
        return Some("latex");
    }
    if looks_like_markdown(sample) {
        return Some("markdown");
    }
    if lower.contains("#include") && (lower.contains("int main") || lower.contains("printf")) {
        if lower.contains("std::") || lower.contains("using namespace std") {
            return Some("cpp");
        }
        return Some("c");
    }
    if looks_like_css(sample, &lower) {
        return Some("css");
    }

    let mut best: Option<(&'static str, usize)> = None;
    for (label, keywords, threshold) in SCORED_LANGUAGES {
        let hits = count_hits(&lower, keywords);
        if hits < *threshold {
            continue;
        }
        match best {
            Some((_, best_hits)) if best_hits >= hits => {}
            _ => best = Some((*label, hits)),
        }
    }
    best.map(|(label, _)| label)
}

fn count_hits(haystack: &str, needles: &[&str]) -> usize {
    needles
        .iter()
        .filter(|needle| haystack.contains(**needle))
        .count()
}

fn sample_lines(sample: &str) -> impl Iterator<Item = &str> {
    sample.lines().take(SAMPLE_MAX_LINES)
}

fn shebang_interpreter(sample: &str) -> Option<String> {
    let first_line = sample.lines().next()?.trim();
    let mut parts = first_line.strip_prefix("#!")?.split_whitespace();
    let mut interpreter = parts.next()?;
    if path_basename(interpreter) == "env" {
        interpreter = parts.find(|arg| !arg.starts_with('-'))?;
    }
    let basename = path_basename(interpreter).trim();
    if basename.is_empty() {
        return None;
    }
    Some(basename.to_ascii_lowercase())
}

fn shebang_label(interpreter: &str) -> Option<&'static str> {
    let interpreter = interpreter.trim_end_matches(|ch: char| ch.is_ascii_digit() || ch == '.');
    let label = match interpreter {
        "python" | "pypy" => "python",
        "node" | "nodejs" | "deno" | "bun" => "javascript",
        "sh" | "bash" | "zsh" | "ksh" | "dash" | "ash" => "shell",
        "perl" => "perl",
        "ruby" => "ruby",
        "php" => "php",
        "lua" => "lua",
        _ => return None,
    };
    Some(label)
}

fn path_basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn looks_like_json(sample: &str, truncated: bool) -> bool {
    if !(sample.starts_with('{') || sample.starts_with('[')) {
        return false;
    }
    // A truncated sample of a large document may not reach the closing delimiter.
    let closed = sample.ends_with('}') || sample.ends_with(']');
    sample.contains('"') && (sample.contains(':') || sample.starts_with('[')) && (closed || truncated)
}

fn looks_like_html(sample: &str, lower: &str) -> bool {
    if lower.contains("<!doctype html") || lower.contains("<html") {
        return true;
    }
    let tag_hits = count_hits(
        lower,
        &["<head", "<body", "<div", "<span", "<script", "<style", "<p>"],
    );
    sample.starts_with('<') && tag_hits >= 2
}

pub(crate) fn looks_like_yaml(content: &str) -> bool {
    let mut pairs = 0usize;
    let mut content_lines = 0usize;
    let mut has_doc_start = false;
    for line in sample_lines(content) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if content_lines == 0 && !has_doc_start && trimmed == "---" {
            has_doc_start = true;
            continue;
        }
        content_lines += 1;
        if is_yaml_pair(trimmed) {
            pairs += 1;
        }
    }
    pairs >= 2 || (has_doc_start && pairs >= 1)
}

fn is_yaml_pair(line: &str) -> bool {
    if let Some(item) = line.strip_prefix("- ") {
        return !item.contains(';');
    }
    if line.len() > 1 && line.ends_with(':') && !line.contains(' ') {
        return true;
    }
    let Some((key, value)) = line.split_once(": ") else {
        return false;
    };
    let key = key.trim();
    let value = value.trim();
    !key.is_empty()
        && !key.contains(['(', '{', '"', '='])
        && key.split_whitespace().count() <= 2
        && !value.ends_with(';')
        && !value.ends_with('{')
}

fn looks_like_toml(sample: &str) -> bool {
    let has_header = sample_lines(sample).any(|line| {
        let t = line.trim();
        t.len() > 2 && t.starts_with('[') && t.ends_with(']')
    });
    let assignments = sample_lines(sample)
        .map(str::trim)
        .filter(|t| !t.is_empty() && !t.starts_with(['#', '[']))
        .filter(|t| t.contains(" = ") && !t.contains("=="))
        .count();
    has_header && assignments >= 1
}

fn looks_like_sql(sample: &str) -> bool {
    sample_lines(sample).any(|line| {
        let lower = line.trim().to_ascii_lowercase();
        if lower.starts_with("--") {
            return false;
        }
        (lower.starts_with("select ") && lower.contains(" from "))
            || (lower.starts_with("insert into ") && lower.contains(" values"))
            || (lower.starts_with("update ") && lower.contains(" set "))
            || (lower.starts_with("delete from ") && lower.contains(" where "))
            || lower.starts_with("create table ")
            || lower.starts_with("alter table ")
            || lower.starts_with("drop table ")
    })
}

fn looks_like_css(sample: &str, lower: &str) -> bool {
    // Rule heads are selectors: no call parens, assignments, or keywords.
    let rule_heads = sample_lines(sample)
        .map(str::trim)
        .filter_map(|line| line.strip_suffix('{').or_else(|| line.split_once('{').map(|(h, _)| h)))
        .map(str::trim)
        .filter(|head| !head.is_empty() && !head.contains(['(', '=', ';']))
        .filter(|head| !head.starts_with("fn ") && !head.starts_with("func "))
        .count();
    let properties = count_hits(
        lower,
        &[
            "color:", "background", "margin", "padding", "font-", "display:", "position:",
            "flex", "grid", "border",
        ],
    );
    rule_heads >= 1 && properties >= 1 && lower.contains(':') && lower.contains(';')
}

fn looks_like_markdown(sample: &str) -> bool {
    if sample.contains("```") || sample.contains("](") {
        return true;
    }
    sample_lines(sample).any(|line| {
        let trimmed = line.trim_start();
        is_markdown_heading(trimmed) || trimmed.starts_with("> ")
    })
}

fn is_markdown_heading(line: &str) -> bool {
    let hashes = line.bytes().take_while(|byte| *byte == b'#').count();
    (1..=6).contains(&hashes) && line.as_bytes().get(hashes) == Some(&b' ')
}

fn utf8_prefix(content: &str, max_bytes: usize) -> &str {
    if content.len() <= max_bytes {
        return content;
    }
    let mut end = max_bytes;
    while end > 0 && !content.is_char_boundary(end) {
        end -= 1;
    }
    &content[..end]
}
