//! Highlight settings loading (environment or TOML settings document).

use crate::constants::{HIGHLIGHT_MAPPING_ENV, HIGHLIGHT_TRACE_ENV};
use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::env;
use std::path::Path;

/// Runtime configuration for the highlighter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// File extension (with leading dot) to grammar name.
    pub mapping: BTreeMap<String, String>,
    /// Emit an `info` event with timing for every highlight call.
    pub trace: bool,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsDocument {
    #[serde(default)]
    highlight: HighlightConfig,
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

/// Parse `ext=grammar` pairs separated by commas or newlines.
///
/// Malformed pairs are skipped with a warning.
pub fn parse_mapping_list(value: &str) -> BTreeMap<String, String> {
    let mut mapping = BTreeMap::new();
    for pair in value.split([',', '\n']) {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        match pair.split_once('=') {
            Some((ext, grammar)) => {
                mapping.insert(ext.trim().to_string(), grammar.trim().to_string());
            }
            None => {
                tracing::warn!("ignoring malformed highlight mapping entry: {:?}", pair);
            }
        }
    }
    mapping
}

impl HighlightConfig {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`HighlightConfig`]; an unset mapping variable yields an
    /// empty mapping.
    pub fn from_env() -> Self {
        Self {
            mapping: env::var(HIGHLIGHT_MAPPING_ENV)
                .map(|value| parse_mapping_list(&value))
                .unwrap_or_default(),
            trace: env_flag_enabled(HIGHLIGHT_TRACE_ENV),
        }
    }

    /// Parse the `[highlight]` section of a TOML settings document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] when the document is not valid TOML or
    /// the section has the wrong shape.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let document: SettingsDocument = toml::from_str(raw)?;
        Ok(document.highlight)
    }

    /// Read and parse a TOML settings file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Read`] when the file cannot be read, otherwise
    /// the same errors as [`HighlightConfig::from_toml_str`].
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }
}

/// Return the extension of the last path component, including the leading dot.
///
/// `src/main.go` gives `.go`, `.bashrc` gives `.bashrc`, `Makefile` gives `""`.
pub fn extension_of(filename: &str) -> &str {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match name.rfind('.') {
        Some(idx) => &name[idx..],
        None => "",
    }
}

/// Administrator-configured extension to grammar overrides.
///
/// Built once from [`HighlightConfig`] and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionOverrideMap {
    entries: HashMap<String, String>,
}

impl ExtensionOverrideMap {
    /// Normalize configured keys and drop unusable entries.
    pub fn from_config(config: &HighlightConfig) -> Self {
        let mut entries = HashMap::with_capacity(config.mapping.len());
        for (ext, grammar) in &config.mapping {
            let ext = ext.trim();
            let grammar = grammar.trim();
            if ext.is_empty() || ext == "." || grammar.is_empty() {
                tracing::warn!(
                    "ignoring highlight mapping with empty key or value: {:?} = {:?}",
                    ext,
                    grammar
                );
                continue;
            }
            let key = if ext.starts_with('.') {
                ext.to_string()
            } else {
                format!(".{}", ext)
            };
            entries.insert(key, grammar.to_string());
        }
        Self { entries }
    }

    /// Grammar name configured for `filename`'s extension, if any.
    pub fn lookup(&self, filename: &str) -> Option<&str> {
        let ext = extension_of(filename);
        if ext.is_empty() {
            return None;
        }
        self.entries.get(ext).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_env_flag_accepts_truthy_values() {
        for value in ["1", "true", "TRUE", " yes ", "on"] {
            assert_eq!(parse_env_flag(value), Some(true), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_accepts_falsy_values() {
        for value in ["", "0", "false", "FALSE", " no ", "off"] {
            assert_eq!(parse_env_flag(value), Some(false), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_rejects_unknown_values() {
        assert_eq!(parse_env_flag("maybe"), None);
        assert_eq!(parse_env_flag("enabled"), None);
    }

    #[test]
    fn parse_mapping_list_splits_pairs_and_skips_garbage() {
        let mapping = parse_mapping_list(".customext=json, .tmpl = html\n.bad\n\n");
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get(".customext").map(String::as_str), Some("json"));
        assert_eq!(mapping.get(".tmpl").map(String::as_str), Some("html"));
    }

    #[test]
    fn extension_of_matches_last_path_component() {
        let cases = [
            ("main.go", ".go"),
            ("src/lib.rs", ".rs"),
            ("archive.tar.gz", ".gz"),
            (".bashrc", ".bashrc"),
            ("Makefile", ""),
            ("dir.d/Makefile", ""),
            ("dir\\win.PS1", ".PS1"),
            ("", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(extension_of(input), expected, "input: {input}");
        }
    }

    #[test]
    fn override_map_normalizes_keys_and_drops_empty_entries() {
        let mut config = HighlightConfig::default();
        config.mapping.insert("customext".to_string(), "json".to_string());
        config.mapping.insert(".tmpl".to_string(), " html ".to_string());
        config.mapping.insert(".empty".to_string(), "   ".to_string());
        config.mapping.insert(" ".to_string(), "rust".to_string());

        let map = ExtensionOverrideMap::from_config(&config);
        assert_eq!(map.len(), 2);
        assert_eq!(map.lookup("data.customext"), Some("json"));
        assert_eq!(map.lookup("views/index.tmpl"), Some("html"));
        assert_eq!(map.lookup("index.TMPL"), None);
        assert_eq!(map.lookup("notes.empty"), None);
        assert_eq!(map.lookup("Makefile"), None);
    }

    #[test]
    fn from_toml_str_reads_highlight_mapping_section() {
        let raw = r#"
[server]
port = 3000

[highlight]
trace = true

[highlight.mapping]
".customext" = "json"
".tpl" = "html"
"#;
        let config = HighlightConfig::from_toml_str(raw).expect("parse");
        assert!(config.trace);
        assert_eq!(config.mapping.len(), 2);
        assert_eq!(
            config.mapping.get(".customext").map(String::as_str),
            Some("json")
        );
    }

    #[test]
    fn from_toml_str_without_section_is_empty() {
        let config = HighlightConfig::from_toml_str("[server]\nport = 1\n").expect("parse");
        assert_eq!(config, HighlightConfig::default());
    }

    #[test]
    fn from_toml_str_rejects_wrong_shape() {
        let err = HighlightConfig::from_toml_str("[highlight]\nmapping = 3\n")
            .expect_err("mapping must be a table");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn from_toml_file_reads_and_reports_missing_files() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("settings.toml");
        let mut file = std::fs::File::create(&path).expect("create");
        writeln!(file, "[highlight.mapping]\n\".gox\" = \"go\"").expect("write");
        drop(file);

        let config = HighlightConfig::from_toml_file(&path).expect("load");
        assert_eq!(config.mapping.get(".gox").map(String::as_str), Some("go"));

        let missing = dir.path().join("missing.toml");
        let err = HighlightConfig::from_toml_file(&missing).expect_err("missing file");
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
