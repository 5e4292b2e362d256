//! Generates one Makefile per directory of a C/C++ project, mirroring its
//! directory tree, plus a `common.mk` with the toolchain definitions.
//!
//! Objects are derived from the source files found on disk, each directory
//! archives its own objects, and the subdirectories are built and cleaned
//! by recursive `make -C` invocations. Custom rules (binaries, external
//! repositories, copies) can be attached to any directory before
//! generation.
//!
//! ```no_run
//! # fn run(runtime: impl mktree::runtime::Runtime) -> anyhow::Result<()> {
//! let mut project = mktree::Project::new(runtime, ".")?;
//! project.populate_full()?;
//! project.generate()?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod directory;
mod error;
pub mod path;
mod project;
mod repository;
mod rule;
pub mod runtime;
mod source;
mod toolchain;
mod writer;

#[cfg(test)]
mod testutil;

pub use directory::Directory;
pub use error::Error;
pub use project::{COMMON_NAME, INCLUDE_NAME, MAKEFILE_NAME, Project};
pub use repository::Repository;
pub use rule::{Recipe, Rule};
pub use source::{Language, Source};
pub use toolchain::Toolchain;
pub use writer::MakeWriter;
