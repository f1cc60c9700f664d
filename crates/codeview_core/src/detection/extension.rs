//! Extension-based labels for files whose name already settles the language.

/// Extensions shared by several languages; content decides for these.
const AMBIGUOUS_EXTENSIONS: &[&str] = &[
    "h", "m", "pl", "inc", "pro", "t", "v", "cls", "fs", "in", "cgi", "sc",
];

/// Language label for an unambiguous, lowercase extension (without the dot).
fn label_for_extension(ext: &str) -> Option<&'static str> {
    let label = match ext {
        "go" => "go",
        "rs" => "rust",
        "py" | "pyw" | "pyi" => "python",
        "rb" | "rake" | "gemspec" => "ruby",
        "js" | "mjs" | "cjs" | "jsx" => "javascript",
        "ts" | "tsx" | "mts" | "cts" => "typescript",
        "json" | "jsonc" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "html" | "htm" | "xhtml" => "html",
        "xml" | "xsd" | "xsl" | "svg" | "plist" => "xml",
        "css" => "css",
        "md" | "markdown" | "mkd" => "markdown",
        "sh" | "bash" | "zsh" | "ksh" => "shell",
        "c" => "c",
        "cc" | "cpp" | "cxx" | "hpp" | "hh" | "hxx" => "cpp",
        "cs" => "cs",
        "java" => "java",
        "kt" | "kts" => "kotlin",
        "scala" => "scala",
        "swift" => "swift",
        "php" => "php",
        "lua" => "lua",
        "sql" => "sql",
        "tex" | "sty" => "latex",
        "hs" => "haskell",
        "ex" | "exs" => "elixir",
        "erl" | "hrl" => "erlang",
        "clj" | "cljs" | "edn" => "clojure",
        "ml" | "mli" => "ocaml",
        "groovy" | "gradle" => "groovy",
        "ps1" | "psm1" => "powershell",
        "diff" | "patch" => "diff",
        "mk" => "makefile",
        "txt" | "text" => "text",
        _ => return None,
    };
    Some(label)
}

/// Outcome of looking at a filename's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExtensionHint {
    /// The extension names one language.
    Known(&'static str),
    /// No extension, an ambiguous one, or one not in the table.
    Undecided,
}

/// Classify `filename` by the extension of its last path component.
pub(crate) fn classify_extension(filename: &str) -> ExtensionHint {
    let ext = crate::config::extension_of(filename)
        .trim_start_matches('.')
        .to_ascii_lowercase();
    // Dotfiles such as `.bashrc` have no real extension.
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    if ext.is_empty() || name.len() == ext.len() + 1 {
        return ExtensionHint::Undecided;
    }
    if AMBIGUOUS_EXTENSIONS.contains(&ext.as_str()) {
        return ExtensionHint::Undecided;
    }
    match label_for_extension(&ext) {
        Some(label) => ExtensionHint::Known(label),
        None => ExtensionHint::Undecided,
    }
}
