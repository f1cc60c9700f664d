//! Magika-powered content classification.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};

/// Labels that carry no grammar information.
const GENERIC_LABELS: &[&str] = &["txt", "randomtxt", "unknown", "empty", "undefined"];

static SESSION: OnceLock<Option<Mutex<magika::Session>>> = OnceLock::new();
static IDENTIFY_WARNED: AtomicBool = AtomicBool::new(false);

fn session() -> Option<&'static Mutex<magika::Session>> {
    SESSION
        .get_or_init(|| match magika::Session::new() {
            Ok(session) => Some(Mutex::new(session)),
            Err(err) => {
                tracing::warn!("magika session init failed: {}", err);
                None
            }
        })
        .as_ref()
}

pub(crate) fn prewarm() {
    let _ = session();
}

pub(crate) fn detect(content: &[u8]) -> Option<String> {
    let session = session()?;
    let mut guard = session
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let result = match guard.identify_content_sync(content) {
        Ok(result) => result,
        Err(err) => {
            if !IDENTIFY_WARNED.swap(true, Ordering::Relaxed) {
                tracing::warn!("magika inference failed; using heuristics only: {}", err);
            }
            return None;
        }
    };
    let info = result.info();
    if !info.is_text {
        return None;
    }
    let label = info.label;
    if GENERIC_LABELS
        .iter()
        .any(|generic| generic.eq_ignore_ascii_case(label))
    {
        return None;
    }
    Some(label.to_string())
}
