//! Shared constants used across codeview crates.

/// Inputs larger than this many bytes are never tokenized.
pub const SIZE_LIMIT: usize = 1024 * 1024;

/// Upper bound on memoized filename-pattern resolutions.
pub const RESOLUTION_CACHE_CAPACITY: usize = 512;

/// Marker the HTML formatter writes at the start of every rendered line.
pub const LINE_OPEN_MARKER: &str = r#"<span class="line"><span class="cl">"#;
/// Marker the HTML formatter writes at the end of every rendered line.
pub const LINE_CLOSE_MARKER: &str = "</span></span>";

/// Visual style handed to the formatter. Output is class-based, so the style
/// only matters for [`crate::SyntectEngine::stylesheet`].
pub const DEFAULT_STYLE: &str = "InspiredGitHub";

/// Extension overrides as `ext=grammar` pairs separated by commas or newlines.
pub const HIGHLIGHT_MAPPING_ENV: &str = "CODEVIEW_HIGHLIGHT_MAPPING";
/// Enables per-call timing events.
pub const HIGHLIGHT_TRACE_ENV: &str = "CODEVIEW_HIGHLIGHT_TRACE";

/// Tracing target for highlight events.
pub const TRACE_TARGET: &str = "codeview::highlight";
