use std::path::{Path, PathBuf};

use crate::core::error::{Error, Result};

/// Expand `~` in a user-supplied path.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

pub fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(format!("read {}", path.display()))))
}

/// Write a file, creating parent directories as needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::internal_io(e.to_string(), Some(format!("create {}", parent.display())))
            })?;
        }
    }
    std::fs::write(path, contents)
        .map_err(|e| Error::internal_io(e.to_string(), Some(format!("write {}", path.display()))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_path_passes_absolute_paths_through() {
        assert_eq!(expand_path("/tmp/manifest.json"), PathBuf::from("/tmp/manifest.json"));
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/manifest.json");

        write_string(&path, "{}").unwrap();
        assert_eq!(read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn read_missing_file_is_io_error() {
        let err = read_to_string(Path::new("/nonexistent/cutover.toml")).unwrap_err();
        assert_eq!(err.code, crate::core::error::ErrorCode::InternalIoError);
    }
}
