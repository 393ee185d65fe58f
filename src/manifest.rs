//! Generated manifests
//!
//! Two small records close out a run: a generated module mapping each
//! non-base locale to a lazy loader for its merged message file, and a JSON
//! snapshot of what was pulled (upstream version, commit, languages). The
//! snapshot is overwritten every run; no history is kept.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MirrorError, MirrorResult};
use crate::rewrite::js_string;

/// Fields read from the upstream extension manifest
#[derive(Debug, Deserialize)]
struct ExtensionManifest {
    version_name: String,
}

/// Snapshot of one mirror run
#[derive(Debug, Serialize)]
struct UpstreamMeta<'a> {
    version: &'a str,
    commit: &'a str,
    languages: &'a [String],
}

/// Generate the locale loader module
///
/// The base locale ships with the build itself, so it gets no lazy entry;
/// every other locale is loaded on demand, with a chunk-name hint for the
/// bundler.
pub fn l10n_entries(locales: &[String], base_locale: &str) -> String {
    let mut result = String::from("/* generated by addon-mirror */\n");
    result.push_str("export default {\n");
    for locale in locales {
        if locale == base_locale {
            continue;
        }
        result.push_str(&format!(
            "  {}: () => import(/* webpackChunkName: {} */ {}),\n",
            js_string(locale),
            js_string(&format!("addon-l10n-{locale}")),
            js_string(&format!("../addons-l10n/{locale}.json")),
        ));
    }
    result.push_str("};\n");
    result
}

/// Write the `{version, commit, languages}` snapshot record
///
/// The version string comes from the upstream extension manifest; an
/// unreadable manifest aborts the run.
pub fn write_upstream_meta(
    repo_dir: &Path,
    out_path: &Path,
    commit: &str,
    languages: &[String],
) -> MirrorResult<()> {
    let manifest_path = repo_dir.join("manifest.json");
    let contents = fs::read_to_string(&manifest_path)?;
    let manifest: ExtensionManifest =
        serde_json::from_str(&contents).map_err(|e| MirrorError::Json {
            file: manifest_path,
            source: e,
        })?;

    let meta = UpstreamMeta {
        version: &manifest.version_name,
        commit,
        languages,
    };
    let json = serde_json::to_string(&meta).map_err(|e| MirrorError::Json {
        file: out_path.to_path_buf(),
        source: e,
    })?;

    crate::fs::atomic_write(out_path, json.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn locales(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_l10n_entries_excludes_base_locale() {
        let module = l10n_entries(&locales(&["de", "en", "nl"]), "en");

        assert!(module.contains("\"de\":"));
        assert!(module.contains("\"nl\":"));
        assert!(!module.contains("\"en\":"));
    }

    #[test]
    fn test_l10n_entries_exact_entry_format() {
        let module = l10n_entries(&locales(&["de", "en"]), "en");

        assert_eq!(
            module,
            "/* generated by addon-mirror */\n\
             export default {\n\
             \x20 \"de\": () => import(/* webpackChunkName: \"addon-l10n-de\" */ \"../addons-l10n/de.json\"),\n\
             };\n"
        );
    }

    #[test]
    fn test_l10n_entries_no_locales() {
        let module = l10n_entries(&[], "en");
        assert_eq!(module, "/* generated by addon-mirror */\nexport default {\n};\n");
    }

    #[test]
    fn test_write_upstream_meta() {
        let dir = tempdir().unwrap();
        let repo = dir.path().join("upstream");
        fs::create_dir_all(&repo).unwrap();
        fs::write(
            repo.join("manifest.json"),
            r#"{"version_name": "1.29.0", "name": "addons"}"#,
        )
        .unwrap();

        let out = dir.path().join("upstream-meta.json");
        write_upstream_meta(&repo, &out, "abc1234", &locales(&["de", "en"])).unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert_eq!(
            written,
            r#"{"version":"1.29.0","commit":"abc1234","languages":["de","en"]}"#
        );
    }

    #[test]
    fn test_write_upstream_meta_missing_manifest_is_fatal() {
        let dir = tempdir().unwrap();
        let repo = dir.path().join("upstream");
        fs::create_dir_all(&repo).unwrap();

        let result = write_upstream_meta(&repo, &dir.path().join("meta.json"), "abc", &[]);
        assert!(matches!(result, Err(MirrorError::Io(_))));
    }

    #[test]
    fn test_write_upstream_meta_manifest_without_version_is_fatal() {
        let dir = tempdir().unwrap();
        let repo = dir.path().join("upstream");
        fs::create_dir_all(&repo).unwrap();
        fs::write(repo.join("manifest.json"), r#"{"name": "addons"}"#).unwrap();

        let result = write_upstream_meta(&repo, &dir.path().join("meta.json"), "abc", &[]);
        assert!(matches!(result, Err(MirrorError::Json { .. })));
    }
}
