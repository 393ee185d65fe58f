//! Locale aggregation
//!
//! Upstream keeps one message file per addon per locale. The build wants one
//! file per locale, so every addon's fragment is merged into a single
//! mapping. Partial translations are normal: a missing or malformed fragment
//! is skipped silently and that addon's strings are simply absent for that
//! locale.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{MirrorError, MirrorResult};

/// Merge the per-addon message files of one locale directory
///
/// Addons are merged in list order; colliding keys take the value from the
/// addon processed last.
pub fn merge_locale(locale_dir: &Path, addons: &[String]) -> Map<String, Value> {
    let mut all_messages = Map::new();

    for addon in addons {
        let path = locale_dir.join(format!("{addon}.json"));
        let Ok(contents) = fs::read_to_string(&path) else {
            continue;
        };
        let Ok(Value::Object(parsed)) = serde_json::from_str(&contents) else {
            continue;
        };
        for (key, value) in parsed {
            all_messages.insert(key, value);
        }
    }

    all_messages
}

/// Write one merged message file per locale directory
///
/// Non-directory entries under the localization root (a README, for example)
/// are skipped. Returns the locale codes in sorted order.
pub fn aggregate(
    upstream_l10n: &Path,
    out_l10n: &Path,
    addons: &[String],
) -> MirrorResult<Vec<String>> {
    let mut entries = fs::read_dir(upstream_l10n)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    let mut languages = Vec::new();
    for entry in entries {
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let locale = entry.file_name().to_string_lossy().into_owned();
        let merged = merge_locale(&entry.path(), addons);

        let out_path = out_l10n.join(format!("{locale}.json"));
        let json =
            serde_json::to_string(&Value::Object(merged)).map_err(|e| MirrorError::Json {
                file: out_path.clone(),
                source: e,
            })?;
        crate::fs::atomic_write(&out_path, json.as_bytes())?;

        languages.push(locale);
    }

    Ok(languages)
}
