//! Per-addon copy and transform
//!
//! Recreates one addon's upstream files under the output tree. Script files
//! are decoded as text (lossy, matching upstream), checked for shared-library
//! imports, and rewritten through the asset pass when they reference the
//! dynamic resource root. Everything else is copied byte for byte.

use std::fs;
use std::path::Path;

use crate::error::MirrorResult;
use crate::{libraries, rewrite};

/// What happened while processing one addon
#[derive(Debug, Clone, Default)]
pub struct AddonOutcome {
    /// Files written to the output tree
    pub files: usize,
    /// Scripts that went through the asset rewrite
    pub rewritten: usize,
    /// Shared library files copied on behalf of this addon
    pub libraries: usize,
}

/// Mirror a single addon directory into the output tree
pub fn process_addon(
    upstream_dir: &Path,
    out_dir: &Path,
    upstream_libraries: &Path,
    out_libraries: &Path,
    asset_extensions: &[String],
) -> MirrorResult<AddonOutcome> {
    let mut outcome = AddonOutcome::default();

    for file in crate::walk::walk(upstream_dir)? {
        let old_path = upstream_dir.join(&file);
        let new_path = out_dir.join(&file);

        if file.ends_with(".js") {
            let bytes = fs::read(&old_path)?;
            let text = String::from_utf8_lossy(&bytes);

            outcome.libraries +=
                libraries::copy_imported(&text, upstream_libraries, out_libraries)?;

            if rewrite::has_dynamic_reference(&text) {
                let rewritten = rewrite::rewrite_source(upstream_dir, &text, asset_extensions)?;
                crate::fs::atomic_write(&new_path, rewritten.as_bytes())?;
                outcome.rewritten += 1;
            } else {
                crate::fs::atomic_write(&new_path, text.as_bytes())?;
            }
        } else {
            crate::fs::copy_bytes(&old_path, &new_path)?;
        }

        outcome.files += 1;
    }

    Ok(outcome)
}
