//! End-to-end highlighting against the bundled syntect grammars.

use codeview::constants::LINE_OPEN_MARKER;
use codeview::{
    highlight, highlight_file, plain_text, Classification, HighlightConfig, Highlighter,
    HtmlOptions, ResolutionSource, SIZE_LIMIT,
};
use std::io::Write;
use tempfile::TempDir;

fn highlighter_with(mapping: &[(&str, &str)]) -> Highlighter {
    let mut config = HighlightConfig::default();
    for (ext, grammar) in mapping {
        config.mapping.insert(ext.to_string(), grammar.to_string());
    }
    Highlighter::with_config(config)
}

#[test]
fn go_filename_is_pattern_matched_then_served_from_cache() {
    let hl = highlighter_with(&[]);
    let code = b"package main\n";

    let (first, source) = hl.resolve("main.go", "", code, Classification::Disabled);
    assert_eq!(first.name(), "Go");
    assert_eq!(source, ResolutionSource::Pattern);
    assert_eq!(hl.cache().len(), 1);
    assert_eq!(hl.cache().stats().inserts, 1);

    let (second, source) = hl.resolve("main.go", "", code, Classification::Enabled);
    assert_eq!(second, first);
    assert_eq!(source, ResolutionSource::Cache);
    assert_eq!(hl.cache().len(), 1);
    assert_eq!(hl.cache().stats().inserts, 1);
}

#[test]
fn configured_extension_resolves_without_guessing() {
    let hl = highlighter_with(&[(".customext", "json")]);
    let (grammar, source) = hl.resolve("data.customext", "", b"{}", Classification::Enabled);
    assert_eq!(grammar.name(), "JSON");
    assert_eq!(source, ResolutionSource::Override);
    assert!(hl.cache().is_empty());
    assert_eq!(hl.cache().stats().misses, 0);

    let lines = hl.highlight_file("data.customext", "", b"{}").expect("highlight");
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("<span class=\""));
}

#[test]
fn hint_with_query_suffix_resolves_prefix() {
    let hl = highlighter_with(&[]);
    let (grammar, source) = hl.resolve("x.txt", "python?plain", b"", Classification::Disabled);
    assert_eq!(grammar.name(), "Python");
    assert_eq!(source, ResolutionSource::HintPrefix);
}

#[test]
fn content_classification_picks_grammar_for_extensionless_files() {
    let hl = highlighter_with(&[]);
    let script = b"#!/usr/bin/env python3\nimport sys\nprint(sys.argv)\n";
    let (grammar, source) = hl.resolve("run", "", script, Classification::Enabled);
    assert_eq!(grammar.name(), "Python");
    assert_eq!(source, ResolutionSource::Classifier);
    assert!(hl.cache().is_empty());
}

#[test]
fn whole_file_resolution_prefers_clear_extensions_over_content() {
    let hl = highlighter_with(&[]);
    let python_looking = b"import os\ndef main():\n    print(os.name)\n";
    let (grammar, _) = hl.resolve("app.rb", "", python_looking, Classification::Enabled);
    assert_eq!(grammar.name(), "Ruby");

    let yaml_looking = b"name: app\nservices:\n  - web\n";
    let (grammar, _) = hl.resolve("notes.txt", "", yaml_looking, Classification::Enabled);
    assert_eq!(grammar.name(), "Plain Text");

    let script = b"#!/usr/bin/env python3\nprint(1)\n";
    let (grammar, source) = hl.resolve("script", "", script, Classification::Enabled);
    assert_eq!(grammar.name(), "Python");
    assert_eq!(source, ResolutionSource::Classifier);
}

#[test]
fn oversized_file_is_rendered_as_plain_text() {
    let hl = highlighter_with(&[]);
    let mut code = Vec::with_capacity(2_000_000);
    while code.len() < 2_000_000 {
        code.extend_from_slice(b"fn a() -> Vec<u8> { vec![] }\n");
    }
    code.truncate(2_000_000);
    assert!(code.len() > SIZE_LIMIT);

    let lines = hl.highlight_file("big.rs", "", &code).expect("plain");
    assert_eq!(lines, plain_text(&code));
    assert!(lines[0].contains("Vec&lt;u8&gt;"));
    assert_eq!(hl.cache().stats().misses, 0);
    assert!(hl.cache().is_empty());

    let text = String::from_utf8(code).expect("ascii");
    assert_eq!(hl.highlight("big.rs", "", &text), text);
}

#[test]
fn whole_file_fragments_line_up_with_source_lines() {
    let hl = highlighter_with(&[]);
    let sources: [(&str, &str); 4] = [
        ("lib.rs", "fn main() {\n    let x = \"<b>\";\n}\n"),
        ("main.go", "package main\n\nfunc main() {}"),
        ("notes.txt", "a & b\n\n\nc"),
        ("style.css", "a { color: red; }\r\nb { }\r\n"),
    ];
    for (name, source) in sources {
        let lines = hl.highlight_file(name, "", source.as_bytes()).expect("highlight");
        assert_eq!(
            lines.len(),
            plain_text(source.as_bytes()).len(),
            "file: {name}"
        );
        for line in &lines {
            assert!(!line.ends_with('\n'), "file: {name}, line: {line:?}");
            assert!(!line.contains(LINE_OPEN_MARKER), "file: {name}");
        }
    }

    let rust = hl
        .highlight_file("lib.rs", "", b"fn main() {\n    let x = \"<b>\";\n}\n")
        .expect("highlight");
    assert!(rust[0].contains("<span class=\""));
    assert!(rust[1].contains("&lt;b&gt;"));
}

#[test]
fn literal_line_marker_in_source_keeps_line_count() {
    let hl = highlighter_with(&[]);
    let source = format!(
        "const s = '{}';\nconst t = 1;\n",
        LINE_OPEN_MARKER.replace('"', "")
    );
    let lines = hl
        .highlight_file("marker.js", "", source.as_bytes())
        .expect("highlight");
    assert_eq!(lines.len(), 2);

    let raw = format!("{}\n{}\n", LINE_OPEN_MARKER, LINE_OPEN_MARKER);
    let lines = hl
        .highlight_file("marker.html", "", raw.as_bytes())
        .expect("highlight");
    assert_eq!(lines.len(), 2);
}

#[test]
fn snippets_round_trip_placeholders_and_strip_trailing_newline() {
    let hl = highlighter_with(&[]);
    assert_eq!(hl.highlight("a.go", "", ""), "\n");
    assert_eq!(hl.highlight("a.go", "", "\n"), "\n");

    let html = hl.highlight("a.go", "", "package main\n");
    assert!(html.contains("package"));
    assert!(html.contains("<span class=\""));
    assert!(!html.ends_with('\n'));
}

#[test]
fn keyword_class_wraps_the_keyword_text() {
    let hl = highlighter_with(&[]);
    let keyword = "<span class=\"keyword control go\">package</span>";

    let html = hl.highlight("main.go", "", "package main\n");
    assert!(html.starts_with(keyword), "snippet: {html}");

    let lines = hl
        .highlight_file("main.go", "", b"package main\n")
        .expect("highlight");
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with(keyword), "line: {}", lines[0]);
    assert!(!lines[0].contains("keyword control go\"> main"));
}

#[test]
fn settings_file_feeds_extension_overrides() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("app.toml");
    let mut file = std::fs::File::create(&path).expect("create");
    writeln!(file, "[highlight.mapping]\n\".gotmpl\" = \"go\"").expect("write");
    drop(file);

    let config = HighlightConfig::from_toml_file(&path).expect("config");
    let hl = Highlighter::with_config(config);
    let (grammar, source) = hl.resolve("page.gotmpl", "", b"", Classification::Enabled);
    assert_eq!(grammar.name(), "Go");
    assert_eq!(source, ResolutionSource::Override);
}

#[test]
fn global_entry_points_highlight_and_fall_back() {
    assert_eq!(highlight("a.rs", "", ""), "\n");
    let lines = highlight_file("a.rs", "rust", b"fn a() {}\nfn b() {}\n").expect("highlight");
    assert_eq!(lines.len(), 2);
    assert_eq!(plain_text(b"<x>\n"), vec!["&lt;x&gt;"]);
}

#[test]
fn stylesheet_is_available_for_rendered_classes() {
    let hl = highlighter_with(&[]);
    let css = hl.engine().stylesheet(&HtmlOptions::default()).expect("css");
    assert!(!css.is_empty());
}
