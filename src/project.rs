use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use crate::directory::Directory;
use crate::error::Error;
use crate::path::{Path, segments};
use crate::runtime::{Result, Runtime};
use crate::toolchain::Toolchain;
use crate::writer::MakeWriter;

/// Common resource file, relative to the root directory
pub const COMMON_NAME: &str = "common.mk";
/// Shared include directory, relative to the root directory
pub const INCLUDE_NAME: &str = "include";
pub const MAKEFILE_NAME: &str = "Makefile";

/// Relative path from a directory to its parent
const TOWARDS_PARENT: &str = "../";

/// The root directory of a project, together with everything shared by all
/// the Makefiles below it: the toolchain written to [`COMMON_NAME`] and
/// whether there is an [`INCLUDE_NAME`] directory to put in the
/// preprocessor flags.
///
/// This is the entry point to generate all the Makefiles of a project.
pub struct Project {
    runtime: Rc<dyn Runtime>,
    toolchain: Toolchain,
    has_include: bool,
    root: Directory,
}

impl Project {
    pub fn new(runtime: impl Runtime, path: impl AsRef<str>) -> Result<Self> {
        let runtime: Rc<dyn Runtime> = Rc::new(runtime);
        let root = Directory::open(&*runtime, &Path::from(path.as_ref()))?;
        let has_include = runtime.is_dir(&root.path().join(INCLUDE_NAME))?;

        Ok(Self {
            runtime,
            toolchain: Toolchain::default(),
            has_include,
            root,
        })
    }

    pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = toolchain;
        self
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    pub fn runtime(&self) -> &dyn Runtime {
        &*self.runtime
    }

    pub fn has_include(&self) -> bool {
        self.has_include
    }

    pub fn root(&self) -> &Directory {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Directory {
        &mut self.root
    }

    /// Opens a directory right below the root, to be configured before it
    /// is added with [`Directory::add_subdir`].
    pub fn open_dir(&self, name: &str) -> Result<Directory> {
        self.root.open_child(&*self.runtime, name)
    }

    pub fn populate(&mut self, subdir_names: &[&str]) -> Result<Vec<Path>> {
        self.root.populate(&*self.runtime, subdir_names)
    }

    pub fn populate_full(&mut self) -> Result<Vec<Path>> {
        self.root.populate_full(&*self.runtime)
    }

    /// Path from `descendant` back up to the root: one `../` per level
    /// below the root, empty for the root itself.
    pub fn relative_path_to(&self, descendant: &Directory) -> Result<String> {
        let root_path = self.root.path();
        let rest = descendant
            .path()
            .strip_prefix(root_path)
            .ok_or_else(|| Error::NotDescendant {
                path: descendant.path().clone(),
                root: root_path.clone(),
            })?;

        Ok(TOWARDS_PARENT.repeat(segments(rest).count()))
    }

    /// Writes the common resource file, then the Makefiles of the whole
    /// tree, depth first.
    pub fn generate(&self) -> Result<()> {
        tracing::info!(root = %self.root.path(), "generating Makefiles");

        let mut output = MakeWriter::new();
        self.toolchain.write_definitions(&mut output);
        output.close(&*self.runtime, &self.root.path().join(COMMON_NAME))?;

        self.root.generate(self)
    }
}
