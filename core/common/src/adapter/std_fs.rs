//! std::fs による FileSystem

use crate::error::Error;
use crate::ports::outbound::FileSystem;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct StdFileSystem;

fn io_error(action: &str, path: &Path, e: std::io::Error) -> Error {
    Error::io_msg(format!("Failed to {} '{}': {}", action, path.display(), e))
}

/// 同じディレクトリに置く一時ファイル名（rename が同一ファイルシステム内で済むように）
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}

impl FileSystem for StdFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> Result<String, Error> {
        fs::read_to_string(path).map_err(|e| io_error("read", path, e))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), Error> {
        let staging = staging_path(path);
        fs::write(&staging, contents).map_err(|e| io_error("write", &staging, e))?;
        fs::rename(&staging, path).map_err(|e| {
            let _ = fs::remove_file(&staging);
            io_error("write", path, e)
        })
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), Error> {
        fs::create_dir_all(path).map_err(|e| io_error("create directory", path, e))
    }

    fn open_append(&self, path: &Path) -> Result<Box<dyn Write + Send>, Error> {
        let f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| io_error("open for append", path, e))?;
        Ok(Box::new(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_replaces_whole_note() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conversation_summary.txt");
        let fs = StdFileSystem;
        fs.write(&path, "S: 頭痛\nO: なし\n").unwrap();
        fs.write(&path, "S: 腹痛\n").unwrap();
        assert_eq!(fs.read_to_string(&path).unwrap(), "S: 腹痛\n");
        assert!(!staging_path(&path).exists());
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/summary.txt");
        let err = StdFileSystem.write(&path, "x").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        StdFileSystem.create_dir_all(path.parent().unwrap()).unwrap();
        StdFileSystem.write(&path, "x").unwrap();
        assert!(StdFileSystem.exists(&path));
    }

    #[test]
    fn test_open_append_keeps_previous_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monshin.jsonl");
        for line in ["{\"n\":1}\n", "{\"n\":2}\n"] {
            let mut w = StdFileSystem.open_append(&path).unwrap();
            w.write_all(line.as_bytes()).unwrap();
        }
        assert_eq!(
            StdFileSystem.read_to_string(&path).unwrap(),
            "{\"n\":1}\n{\"n\":2}\n"
        );
    }

    #[test]
    fn test_read_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("interview.json");
        assert!(!StdFileSystem.exists(&missing));
        assert!(matches!(StdFileSystem.read_to_string(&missing), Err(Error::Io(_))));
    }
}
