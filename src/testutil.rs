use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use anyhow::bail;

use crate::path::{Path, SEP, segments};
use crate::runtime::{DirEntry, Result, Runtime};

/// In-memory filesystem for tests.
#[derive(Default)]
pub struct MemFs {
    dirs: RefCell<BTreeSet<String>>,
    files: RefCell<BTreeMap<String, Vec<u8>>>,
    read_only: RefCell<Option<String>>,
}

fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in segments(path) {
        match segment {
            "." => {}
            ".." => {
                parts.pop();
            }
            _ => parts.push(segment),
        }
    }
    format!("{SEP}{}", parts.join(SEP))
}

impl MemFs {
    pub fn new() -> Self {
        Self::default().dir("/")
    }

    /// Adds a directory and all of its ancestors.
    pub fn dir(self, path: &str) -> Self {
        let mut current = String::new();
        self.dirs.borrow_mut().insert(SEP.into());
        for segment in segments(path) {
            current.push_str(SEP);
            current.push_str(segment);
            self.dirs.borrow_mut().insert(current.clone());
        }
        self
    }

    /// Adds an empty file and all of its ancestors.
    pub fn file(self, path: &str) -> Self {
        let parent = Path::from(path).parent().unwrap_or_default();
        let fs = self.dir(parent.as_str());
        fs.files.borrow_mut().insert(path.into(), Vec::new());
        fs
    }

    /// Makes every later write below `path` fail.
    pub fn fail_writes_under(&self, path: &str) {
        *self.read_only.borrow_mut() = Some(path.into());
    }

    pub fn exists(&self, path: &str) -> bool {
        self.files.borrow().contains_key(path) || self.dirs.borrow().contains(path)
    }

    pub fn read(&self, path: &str) -> String {
        let files = self.files.borrow();
        let data = files.get(path).unwrap_or_else(|| panic!("no file {path}"));
        String::from_utf8(data.clone()).unwrap()
    }

    pub fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        self.files.borrow().clone()
    }
}

impl Runtime for MemFs {
    fn is_dir(&self, path: &Path) -> Result<bool> {
        Ok(self.dirs.borrow().contains(&normalize(path.as_str())))
    }

    fn canonicalize(&self, path: &Path) -> Result<Path> {
        let path = normalize(path.as_str());
        if !self.exists(&path) {
            bail!("no such file or directory: {path}");
        }
        Ok(Path::from(path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let dir = normalize(path.as_str());
        let is_child = |p: &str| Path::from(p).parent().is_some_and(|parent| parent.as_str() == dir);

        let mut entries = Vec::new();
        // reverse order, so callers cannot rely on it
        for d in self.dirs.borrow().iter().rev().filter(|d| is_child(d)) {
            entries.push(DirEntry {
                name: Path::from(d.as_str()).file_name().into(),
                is_dir: true,
            });
        }
        for f in self.files.borrow().keys().rev().filter(|f| is_child(f)) {
            entries.push(DirEntry {
                name: Path::from(f.as_str()).file_name().into(),
                is_dir: false,
            });
        }
        Ok(entries)
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(read_only) = self.read_only.borrow().as_deref() {
            if Path::from(path.as_str()).strip_prefix(&Path::from(read_only)).is_some() {
                bail!("failed to write {path}: read-only file system");
            }
        }
        let parent = path.parent().unwrap_or_default();
        if !self.is_dir(&parent)? {
            bail!("failed to write {path}: no parent directory");
        }
        self.files.borrow_mut().insert(path.to_string(), data.to_vec());
        Ok(())
    }
}
