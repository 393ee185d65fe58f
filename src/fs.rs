//! Filesystem helpers
//!
//! Generated text files go through a temp-file-and-rename write so a crashed
//! run never leaves a torn file behind. Output directories are wiped and
//! recreated wholesale; the tree is a pure function of the upstream snapshot.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::MirrorResult;

/// Write content to a file atomically, creating parent directories
pub fn atomic_write(path: &Path, content: &[u8]) -> MirrorResult<()> {
    let parent = parent_dir(path);
    fs::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(content)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Copy a file's bytes verbatim, creating parent directories
pub fn copy_bytes(from: &Path, to: &Path) -> MirrorResult<()> {
    fs::create_dir_all(parent_dir(to))?;
    fs::copy(from, to)?;
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Delete a directory tree if present, then recreate it empty
pub fn clear_dir(path: &Path) -> MirrorResult<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    fs::create_dir_all(path)?;
    Ok(())
}
