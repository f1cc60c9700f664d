//! Language label canonicalization shared by detection and grammar lookup.

/// Convert aliases/legacy names to canonical labels.
///
/// # Returns
/// Canonical, lowercase label (or empty string for empty/whitespace input).
pub fn canonicalize(language: &str) -> String {
    let lowered = language.trim().to_ascii_lowercase();
    let canonical = match lowered.as_str() {
        "csharp" | "c#" => "cs",
        "c++" | "cxx" | "hpp" => "cpp",
        "bash" | "sh" | "zsh" | "ksh" => "shell",
        "pwsh" | "ps1" => "powershell",
        "yml" => "yaml",
        "jsonl" | "jsonc" => "json",
        "js" | "mjs" | "cjs" => "javascript",
        "ts" | "tsx" => "typescript",
        "md" | "mkd" => "markdown",
        "plaintext" | "plain text" | "plain" | "txt" => "text",
        "py" => "python",
        "rs" => "rust",
        "rb" => "ruby",
        "kt" | "kts" => "kotlin",
        "m" | "mm" | "objc" | "objective-c" => "objectivec",
        "pl" => "perl",
        "ex" | "exs" => "elixir",
        "tex" => "latex",
        "golang" => "go",
        _ => return lowered,
    };
    canonical.to_string()
}
