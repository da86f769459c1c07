use std::path::{Path, PathBuf};

use crate::error::{PamError, Result};

/// File-name fragment the instrument puts in every CSV export.
pub const DEFAULT_FILE_FILTER: &str = ").CSV";

/// List the regular files in `dir` whose name contains `filter`.
///
/// The result is sorted by file name so processing order, aggregate order and
/// legend order are the same on every platform.
pub fn discover_files(dir: &Path, filter: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PamError::DirectoryNotFound(dir.to_path_buf()));
    }

    let entries = std::fs::read_dir(dir).map_err(|e| PamError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PamError::io(dir, e))?;
        let path = entry.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.contains(filter));
        if matches && path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    log::debug!("Discovered {} files in {}", files.len(), dir.display());
    Ok(files)
}
