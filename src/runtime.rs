use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

pub use crate::path::Path;

pub type Result<T> = anyhow::Result<T>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Filesystem access used while populating and generating a project.
///
/// The library never touches the filesystem directly; the caller supplies
/// an implementation, usually a thin wrapper over `std::fs`.
pub trait Runtime: 'static {
    fn is_dir(&self, path: &Path) -> Result<bool>;

    /// Absolute path with every symlink and `.`/`..` component resolved.
    fn canonicalize(&self, path: &Path) -> Result<Path>;

    /// Direct entries of a directory, in no particular order.
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;

    /// Creates or truncates `path` and writes `data` to it.
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
}

impl<R: Runtime + ?Sized> Runtime for Rc<R> {
    fn is_dir(&self, path: &Path) -> Result<bool> {
        (**self).is_dir(path)
    }
    fn canonicalize(&self, path: &Path) -> Result<Path> {
        (**self).canonicalize(path)
    }
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        (**self).read_dir(path)
    }
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        (**self).write_file(path, data)
    }
}
