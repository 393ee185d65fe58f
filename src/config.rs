//! Mirror configuration
//!
//! The addon list is static, checked-in data: upstream is never scanned for
//! addon ids. Everything the pipeline needs - upstream location, addon list,
//! base locale, recognized asset extensions - travels in one explicit
//! `MirrorConfig` value.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MirrorError, MirrorResult};

/// Upstream repository settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Git remote to clone
    #[serde(default = "default_url")]
    pub url: String,

    /// Branch to check out (shallow, single branch)
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Directory name of the local checkout, relative to the mirror root
    #[serde(default = "default_dir")]
    pub dir: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            branch: default_branch(),
            dir: default_dir(),
        }
    }
}

fn default_url() -> String {
    "https://github.com/GarboMuffin/ScratchAddons".to_string()
}

fn default_branch() -> String {
    "tw".to_string()
}

fn default_dir() -> String {
    "ScratchAddons".to_string()
}

fn default_contributors_url() -> String {
    "https://raw.githubusercontent.com/ScratchAddons/contributors/master/.all-contributorsrc"
        .to_string()
}

fn default_base_locale() -> String {
    "en".to_string()
}

fn default_asset_extensions() -> Vec<String> {
    vec!["svg".to_string(), "png".to_string()]
}

fn default_addons() -> Vec<String> {
    [
        "cat-blocks",
        "editor-devtools",
        "data-category-tweaks-v2",
        "block-switching",
        "custom-block-shape",
        "editor-theme3",
        "find-bar",
        "folders",
        "hide-flyout",
        "mediarecorder",
        "mute-project",
        "onion-skinning",
        "pause",
        "progress-bar",
        "remove-sprite-confirm",
        "variable-manager",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Top-level mirror configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Endpoint for the best-effort contributor fetch
    #[serde(default = "default_contributors_url")]
    pub contributors_url: String,

    /// Addon ids to mirror, in processing order
    #[serde(default = "default_addons")]
    pub addons: Vec<String>,

    /// Locale excluded from the generated lazy-loader module
    #[serde(default = "default_base_locale")]
    pub base_locale: String,

    /// File extensions treated as dynamic assets inside addon directories
    #[serde(default = "default_asset_extensions")]
    pub asset_extensions: Vec<String>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            upstream: UpstreamConfig::default(),
            contributors_url: default_contributors_url(),
            addons: default_addons(),
            base_locale: default_base_locale(),
            asset_extensions: default_asset_extensions(),
        }
    }
}

impl MirrorConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> MirrorResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| MirrorError::InvalidConfig {
            file: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load configuration, falling back to defaults when no file exists
    ///
    /// A present-but-malformed file is an error: silently mirroring the
    /// default addon list instead of the configured one is worse than failing.
    pub fn load_or_default(path: &Path) -> MirrorResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }
}
