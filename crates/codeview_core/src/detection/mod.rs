//! Content-based language classification with Magika and heuristic fallback.

/// Language label canonicalization.
pub mod canonical;
mod extension;
mod heuristic;
#[cfg(feature = "magika")]
mod magika;

use extension::{classify_extension, ExtensionHint};

/// Best-guess grammar name from a filename and its bytes.
///
/// Implementations must be cheap to call concurrently; the highlighter
/// consults them only for whole-file renders that no hint or override
/// settled.
pub trait LanguageClassifier: Send + Sync {
    /// Returns a grammar name, or `None` when nothing stands out.
    fn classify(&self, filename: &str, content: &[u8]) -> Option<String>;
}

/// Default classifier: well-known filenames and unambiguous extensions first;
/// content detection only for names that leave the language open.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentClassifier;

impl LanguageClassifier for ContentClassifier {
    fn classify(&self, filename: &str, content: &[u8]) -> Option<String> {
        if let Some(label) = classify_filename(filename) {
            return Some(label.to_string());
        }
        if let ExtensionHint::Known(label) = classify_extension(filename) {
            return Some(label.to_string());
        }
        let text = String::from_utf8_lossy(content);
        detect_language(&text)
    }
}

/// Classifier that never guesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClassifier;

impl LanguageClassifier for NoClassifier {
    fn classify(&self, _filename: &str, _content: &[u8]) -> Option<String> {
        None
    }
}

/// Map extension-less build/config filenames to a grammar label.
fn classify_filename(filename: &str) -> Option<&'static str> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let label = match name {
        "Dockerfile" | "Containerfile" => "dockerfile",
        "Makefile" | "GNUmakefile" | "makefile" => "makefile",
        "CMakeLists.txt" => "cmake",
        "Jenkinsfile" => "groovy",
        "Rakefile" | "Gemfile" | "Vagrantfile" | "Podfile" => "ruby",
        _ => return None,
    };
    Some(label)
}

/// Detect language/type of text content.
///
/// # Returns
/// Canonicalized language label when detection succeeds, otherwise `None`.
pub fn detect_language(content: &str) -> Option<String> {
    #[cfg(feature = "magika")]
    {
        if let Some(label) = magika::detect(content.as_bytes()) {
            let canonical = canonical::canonicalize(&label);
            if let Some(refined) = refine_magika_label(&canonical, content) {
                return Some(refined);
            }
        }
    }

    heuristic::detect(content)
        .map(|label| canonical::canonicalize(label))
        .filter(|label| !label.is_empty() && label != "text")
}

#[cfg(feature = "magika")]
fn refine_magika_label(label: &str, content: &str) -> Option<String> {
    if label.is_empty() || label == "text" {
        return None;
    }
    // The model over-reports YAML for short prose with colons.
    if label == "yaml" && !heuristic::looks_like_yaml(content) {
        return None;
    }
    Some(label.to_string())
}

/// Initialize the Magika model session early when available.
pub fn prewarm() {
    #[cfg(feature = "magika")]
    {
        magika::prewarm();
    }
}
