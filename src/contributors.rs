//! Best-effort contributor fetch
//!
//! Downloads the upstream contributor registry and persists the subset
//! credited for translation work. The fetch runs on a detached thread that is
//! never joined: nothing downstream depends on it, and any failure inside it
//! is swallowed rather than allowed to touch the pipeline.

use std::path::{Path, PathBuf};
use std::thread;

use serde::Serialize;
use serde_json::Value;

use crate::error::{MirrorError, MirrorResult};

/// Contribution tag that marks a translator
const TRANSLATION_TAG: &str = "translation";

/// Keep the entries of `contributors` credited with translation work
pub fn filter_translators(doc: &Value) -> Vec<Value> {
    let Some(contributors) = doc.get("contributors").and_then(Value::as_array) else {
        return Vec::new();
    };

    contributors
        .iter()
        .filter(|entry| {
            entry
                .get("contributions")
                .and_then(Value::as_array)
                .map(|tags| tags.iter().any(|t| t == TRANSLATION_TAG))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

/// Fetch, filter and persist the translator list
pub fn fetch(url: &str, out_path: &Path) -> MirrorResult<()> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| MirrorError::Fetch(Box::new(e)))?;
    let doc: Value = response.into_json()?;

    let translators = filter_translators(&doc);
    write_translators(&translators, out_path)
}

/// Start the fetch on a detached thread
///
/// The handle is returned for callers that want to wait (tests); the pipeline
/// drops it and never blocks on completion.
pub fn spawn_fetch(url: String, out_path: PathBuf) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let _ = fetch(&url, &out_path);
    })
}

fn write_translators(translators: &[Value], out_path: &Path) -> MirrorResult<()> {
    // Upstream publishes this file with four-space indentation; keep it
    // diffable against theirs.
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    translators
        .serialize(&mut serializer)
        .map_err(|e| MirrorError::Json {
            file: out_path.to_path_buf(),
            source: e,
        })?;

    crate::fs::atomic_write(out_path, &buf)
}
