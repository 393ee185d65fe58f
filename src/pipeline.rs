//! Mirror pipeline
//!
//! Strictly sequential: sync the checkout, wipe the output directories,
//! resolve the commit, start the detached contributor fetch, process each
//! configured addon, aggregate locales, emit the generated manifests. Each
//! step completes before the next begins; the contributor fetch is the one
//! exception and nothing waits for it.
//!
//! The wipe is not conditioned on later steps succeeding. A run that fails
//! midway leaves the output directories partially populated, exactly like a
//! crashed run of the upstream script.

use std::path::Path;

use crate::config::MirrorConfig;
use crate::error::MirrorResult;
use crate::{addons, contributors, l10n, manifest, repo};

/// Options for one pipeline run
#[derive(Debug, Clone, Default)]
pub struct PullOptions {
    /// Reuse the existing checkout instead of re-cloning
    pub skip_clone: bool,
}

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub struct PullSummary {
    /// Short commit hash of the mirrored checkout
    pub commit: String,
    /// Addons processed
    pub addons: usize,
    /// Files written under `addons/`
    pub files: usize,
    /// Scripts that went through the asset rewrite
    pub rewritten: usize,
    /// Shared library files copied
    pub libraries: usize,
    /// Locale codes discovered under the upstream localization root
    pub languages: Vec<String>,
}

/// Run the full mirror pipeline rooted at `root`
pub fn run(root: &Path, config: &MirrorConfig, options: &PullOptions) -> MirrorResult<PullSummary> {
    let repo_dir = if options.skip_clone {
        root.join(&config.upstream.dir)
    } else {
        repo::sync(&config.upstream, root)?
    };

    let out_addons = root.join("addons");
    let out_l10n = root.join("addons-l10n");
    let out_libraries = root.join("libraries");
    let out_generated = root.join("generated");
    for dir in [&out_addons, &out_l10n, &out_libraries, &out_generated] {
        crate::fs::clear_dir(dir)?;
    }

    let commit = repo::resolve_commit(&repo_dir)?;

    // Best-effort enrichment; never joined, never allowed to fail the run.
    drop(contributors::spawn_fetch(
        config.contributors_url.clone(),
        root.join("translators.json"),
    ));

    let upstream_addons = repo_dir.join("addons");
    let upstream_libraries = repo_dir.join("libraries");

    let mut files = 0;
    let mut rewritten = 0;
    let mut libraries = 0;
    for addon in &config.addons {
        let outcome = addons::process_addon(
            &upstream_addons.join(addon),
            &out_addons.join(addon),
            &upstream_libraries,
            &out_libraries,
            &config.asset_extensions,
        )?;
        files += outcome.files;
        rewritten += outcome.rewritten;
        libraries += outcome.libraries;
    }

    let languages = l10n::aggregate(&repo_dir.join("addons-l10n"), &out_l10n, &config.addons)?;

    crate::fs::atomic_write(
        &out_generated.join("l10n-entries.js"),
        manifest::l10n_entries(&languages, &config.base_locale).as_bytes(),
    )?;
    manifest::write_upstream_meta(
        &repo_dir,
        &root.join("upstream-meta.json"),
        &commit,
        &languages,
    )?;

    Ok(PullSummary {
        commit,
        addons: config.addons.len(),
        files,
        rewritten,
        libraries,
        languages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_run_skip_clone_without_checkout_is_fatal() {
        let dir = tempdir().unwrap();
        let config = MirrorConfig::default();
        let options = PullOptions { skip_clone: true };

        let result = run(dir.path(), &config, &options);
        assert!(result.is_err());

        // The wipe is unconditional: output directories were recreated even
        // though the run failed.
        assert!(dir.path().join("addons").is_dir());
        assert!(dir.path().join("addons-l10n").is_dir());
    }
}
