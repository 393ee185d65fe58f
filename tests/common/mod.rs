//! Common test utilities for mirror integration tests.
//!
//! Provides `UpstreamFixture`: a temp directory laid out like a mirror root
//! with an `upstream/` checkout inside it, plus helpers to turn the checkout
//! into a real git repository so commit resolution works offline.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use addon_mirror::{MirrorConfig, UpstreamConfig};

/// Mirror root with a synthetic upstream checkout
pub struct UpstreamFixture {
    root: TempDir,
}

impl UpstreamFixture {
    pub fn new() -> Self {
        let root = TempDir::new().expect("create fixture root");
        std::fs::create_dir_all(root.path().join("upstream")).expect("create upstream dir");
        Self { root }
    }

    /// Mirror root directory (where outputs land)
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// The synthetic upstream checkout
    pub fn upstream_path(&self) -> PathBuf {
        self.root.path().join("upstream")
    }

    /// Write a file under the upstream checkout, creating parents
    pub fn write_upstream_file(&self, relative: &str, content: &str) {
        let path = self.upstream_path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).expect("create parent dirs");
        std::fs::write(&path, content).expect("write upstream file");
    }

    /// Write the upstream extension manifest
    pub fn write_manifest(&self, version: &str) {
        self.write_upstream_file(
            "manifest.json",
            &format!(r#"{{"version_name": "{version}"}}"#),
        );
    }

    /// Turn the upstream checkout into a single-commit git repository
    pub fn commit_upstream(&self) {
        let dir = self.upstream_path();
        git(&dir, &["init", "-q"]);
        git(&dir, &["add", "."]);
        git(
            &dir,
            &[
                "-c",
                "user.name=mirror-tests",
                "-c",
                "user.email=mirror-tests@example.com",
                "-c",
                "commit.gpgsign=false",
                "commit",
                "-q",
                "-m",
                "snapshot",
            ],
        );
    }

    /// Configuration pointing at the fixture checkout
    ///
    /// The contributor endpoint points at an unused local port so runs stay
    /// offline and the detached fetch fails harmlessly.
    pub fn config(&self, addons: &[&str]) -> MirrorConfig {
        MirrorConfig {
            upstream: UpstreamConfig {
                url: "https://invalid.example/addons".to_string(),
                branch: "main".to_string(),
                dir: "upstream".to_string(),
            },
            contributors_url: "http://127.0.0.1:9/contributors".to_string(),
            addons: addons.iter().map(|s| s.to_string()).collect(),
            base_locale: "en".to_string(),
            asset_extensions: vec!["svg".to_string(), "png".to_string()],
        }
    }
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .current_dir(dir)
        .args(args)
        .status()
        .expect("failed to run git");
    assert!(status.success(), "git {args:?} failed");
}
