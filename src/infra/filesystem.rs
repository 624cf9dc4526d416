//! Filesystem operations
//!
//! Handles file and directory operations.

use std::path::Path;

use crate::error::FilesystemError;

/// Create a directory and all parent directories
pub fn create_dir_all(path: &Path) -> Result<(), FilesystemError> {
    std::fs::create_dir_all(path).map_err(|e| FilesystemError::CreateDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Remove a directory and all its contents
///
/// Returns `true` if something was removed.
pub fn remove_dir_all(path: &Path) -> Result<bool, FilesystemError> {
    if path.symlink_metadata().is_err() {
        return Ok(false);
    }
    std::fs::remove_dir_all(path).map_err(|e| FilesystemError::RemoveDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    Ok(true)
}

/// Remove a file or symlink
///
/// Returns `true` if something was removed.
pub fn remove_file(path: &Path) -> Result<bool, FilesystemError> {
    if path.symlink_metadata().is_err() {
        return Ok(false);
    }
    std::fs::remove_file(path).map_err(|e| FilesystemError::RemoveFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    Ok(true)
}

/// Remove whatever is at `path`: trees recursively, files and symlinks directly
///
/// Symlinks are never followed. Returns `true` if something was removed.
pub fn remove_any(path: &Path) -> Result<bool, FilesystemError> {
    match path.symlink_metadata() {
        Err(_) => Ok(false),
        Ok(meta) if meta.is_dir() => remove_dir_all(path),
        Ok(_) => remove_file(path),
    }
}

/// Remove a directory only if it is empty
///
/// Returns `true` if the directory was removed.
pub fn remove_dir_if_empty(path: &Path) -> Result<bool, FilesystemError> {
    let Ok(mut entries) = std::fs::read_dir(path) else {
        return Ok(false);
    };
    if entries.next().is_some() {
        return Ok(false);
    }
    std::fs::remove_dir(path).map_err(|e| FilesystemError::RemoveDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    Ok(true)
}

/// Write content to a file
pub fn write_file(path: &Path, content: &str) -> Result<(), FilesystemError> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    std::fs::write(path, content).map_err(|e| FilesystemError::WriteFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Read content from a file
pub fn read_file(path: &Path) -> Result<String, FilesystemError> {
    std::fs::read_to_string(path).map_err(|e| FilesystemError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}
