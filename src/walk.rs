//! Recursive directory listing
//!
//! Produces every file under a root as a relative path with forward-slash
//! separators, the form the rewriter matches against and the generated asset
//! table embeds. Entries are sorted per directory so output is deterministic
//! regardless of readdir order. Symlinks are skipped entirely, which also
//! rules out traversal cycles.

use std::fs;
use std::path::Path;

use crate::error::{MirrorError, MirrorResult};

/// List all files under `dir` as relative forward-slash paths
pub fn walk(dir: &Path) -> MirrorResult<Vec<String>> {
    if !dir.is_dir() {
        return Err(MirrorError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    walk_into(dir, "", &mut files)?;
    Ok(files)
}

fn walk_into(dir: &Path, prefix: &str, files: &mut Vec<String>) -> MirrorResult<()> {
    let mut entries = fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let file_type = entry.file_type()?;
        if file_type.is_symlink() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let relative = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };

        if file_type.is_dir() {
            walk_into(&entry.path(), &relative, files)?;
        } else {
            files.push(relative);
        }
    }

    Ok(())
}
