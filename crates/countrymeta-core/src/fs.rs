//! File output with atomic tmp→rename

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `bytes` to `path` in a single call.
///
/// The data lands in `<path>.tmp` first and is renamed over the destination,
/// so readers never observe a half-written file. Parent directories are
/// created as needed.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}

/// Remove stale .tmp files in a directory
///
/// Returns the number of files removed.
pub fn cleanup_tmp_files(dir: &Path) -> io::Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }
    let pattern = dir.join("*.tmp");
    let pattern = pattern.to_string_lossy();
    let paths = glob::glob(&pattern).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let mut removed = 0;
    for path in paths.filter_map(Result::ok) {
        log::warn!("Removing stale tmp file: {}", path.display());
        fs::remove_file(&path)?;
        removed += 1;
    }
    Ok(removed)
}
