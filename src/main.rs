//! addon-mirror CLI - mirror the upstream addon repository
//!
//! Usage: addon-mirror [--skip-clone] [--root <dir>] [--config <file>] [--json]

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use addon_mirror::{pipeline, MirrorConfig, PullOptions};

/// Mirror the upstream addon repository into the local build tree
#[derive(Parser, Debug)]
#[command(name = "addon-mirror")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Reuse the existing checkout instead of cloning upstream again
    #[arg(long)]
    skip_clone: bool,

    /// Directory holding the checkout and the generated output
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Path to the mirror configuration file
    #[arg(long, default_value = "mirror.toml")]
    config: PathBuf,

    /// Output format for CI
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = MirrorConfig::load_or_default(&cli.config)?;
    let options = PullOptions {
        skip_clone: cli.skip_clone,
    };

    if !cli.json {
        println!("📦 addon-mirror");
        println!("Upstream: {} ({})", config.upstream.url, config.upstream.branch);
        if cli.skip_clone {
            println!("Mode: reusing existing checkout");
        }
    }

    let summary = pipeline::run(&cli.root, &config, &options)?;

    if cli.json {
        let output = serde_json::json!({
            "event": "pull",
            "commit": summary.commit,
            "addons": summary.addons,
            "files": summary.files,
            "rewritten": summary.rewritten,
            "libraries": summary.libraries,
            "languages": summary.languages,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!();
        println!(
            "✓ Mirrored {} addons ({} files, {} rewritten)",
            summary.addons, summary.files, summary.rewritten
        );
        println!("✓ Copied {} library files", summary.libraries);
        println!("✓ Wrote locale bundles for {} languages", summary.languages.len());
        println!("Commit: {}", summary.commit);
    }

    Ok(())
}
