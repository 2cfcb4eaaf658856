use crate::error::{McServerError, Result};
use std::path::{Path, PathBuf};

pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => McServerError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => McServerError::from(e),
        })?;
    }
    Ok(())
}

/// Directory a file at `path` lives in; bare file names resolve to ".".
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
