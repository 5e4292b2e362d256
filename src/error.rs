use alloc::string::String;

use thiserror::Error;

use crate::path::Path;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{path} is not a directory")]
    NotADirectory { path: Path },

    #[error("{path} is not a descendant of {root}")]
    NotDescendant { path: Path, root: Path },

    #[error("subdirectory {name} was already added")]
    DuplicateSubdir { name: String },

    #[error("attempted unindent while there was no indentation")]
    UnindentUnderflow,
}
