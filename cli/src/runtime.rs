use std::fs;
use std::path::Path;

use anyhow::Context;
use mktree::path::Path as OsPath;
use mktree::runtime::{self, DirEntry};

/// The local filesystem.
pub struct Fs;

impl runtime::Runtime for Fs {
    fn is_dir(&self, path: &OsPath) -> runtime::Result<bool> {
        Ok(Path::new(path.as_str()).is_dir())
    }

    fn canonicalize(&self, path: &OsPath) -> runtime::Result<OsPath> {
        let canonical = fs::canonicalize(path.as_str())
            .with_context(|| format!("Failed to canonicalize {path}"))?;
        Ok(OsPath::from(canonical.to_string_lossy().into_owned()))
    }

    fn read_dir(&self, path: &OsPath) -> runtime::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path.as_str()).with_context(|| format!("Failed to list {path}"))? {
            let entry = entry?;
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                // follows symlinks
                is_dir: entry.path().is_dir(),
            });
        }
        Ok(entries)
    }

    fn write_file(&self, path: &OsPath, data: &[u8]) -> runtime::Result<()> {
        fs::write(path.as_str(), data).with_context(|| format!("Failed to write {path}"))
    }
}
